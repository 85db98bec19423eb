//! Formatting helpers shared by the list and detail views.

use chrono::{DateTime, Utc};

const FLAG_CDN: &str = "https://flagcdn.com/24x18";

/// Offset from a regional indicator symbol to its ASCII capital letter.
const REGIONAL_INDICATOR_OFFSET: u32 = 127397;

/// Strip the `(the)` suffix some country and city names carry.
pub fn display_name(raw: &str) -> String {
    raw.replacen("(the)", "", 1).trim().to_string()
}

/// URL of the small flag image for a country code.
///
/// Two-letter codes are lowercased in any case. A regional indicator pair
/// (`🇵🇹`) is converted back to its letters first; anything else is used
/// lowercased as-is.
pub fn flag_url(code: &str) -> String {
    let code = code.trim();
    let name = if is_alpha2(code) {
        code.to_ascii_lowercase()
    } else {
        match from_regional_indicators(code) {
            Some(letters) => letters,
            None => code.to_lowercase(),
        }
    };
    format!("{FLAG_CDN}/{name}.png")
}

fn is_alpha2(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_alphabetic())
}

fn from_regional_indicators(flag: &str) -> Option<String> {
    let letters: Option<String> = flag
        .chars()
        .map(|c| {
            (c as u32)
                .checked_sub(REGIONAL_INDICATOR_OFFSET)
                .and_then(char::from_u32)
                .filter(char::is_ascii_uppercase)
                .map(|l| l.to_ascii_lowercase())
        })
        .collect();
    letters.filter(|l| l.len() == 2)
}

/// Render an ISO-8601 timestamp as `Wednesday, May 1, 2024`.
///
/// The day is taken in UTC, not the viewer's local time zone, so a
/// timestamp near midnight can render as the neighbouring day for viewers
/// far from UTC. Returns `None` when `iso` does not parse.
pub fn format_visit_date(iso: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(iso).ok()?;
    Some(
        parsed
            .with_timezone(&Utc)
            .format("%A, %B %-d, %Y")
            .to_string(),
    )
}
