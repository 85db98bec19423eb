//! Mock authentication: one hardcoded account, login and logout.

use tracing::{info, warn};

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub email: String,
    pub avatar: String,
}

const FAKE_NAME: &str = "Jack";
const FAKE_EMAIL: &str = "jack@example.com";
const FAKE_PASSWORD: &str = "qwerty";
const FAKE_AVATAR: &str = "https://i.pravatar.cc/100?u=zz";

fn fake_user() -> User {
    User {
        name: FAKE_NAME.to_string(),
        email: FAKE_EMAIL.to_string(),
        avatar: FAKE_AVATAR.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    Login(User),
    Logout,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn reduce(self, action: AuthAction) -> Self {
        match action {
            AuthAction::Login(user) => Self { user: Some(user) },
            AuthAction::Logout => Self { user: None },
        }
    }
}

/// Outcome of guarding a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    RedirectToLogin,
}

#[derive(Debug, Default)]
pub struct FakeAuth {
    state: AuthState,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, ApiError> {
        if email != FAKE_EMAIL || password != FAKE_PASSWORD {
            warn!(email, "rejected login");
            return Err(ApiError::InvalidCredentials);
        }
        info!(email, "logged in");
        self.dispatch(AuthAction::Login(fake_user()));
        self.state.user.as_ref().ok_or(ApiError::InvalidCredentials)
    }

    pub fn logout(&mut self) {
        info!("logged out");
        self.dispatch(AuthAction::Logout);
    }

    pub fn guard(&self) -> Access {
        if self.state.is_authenticated() {
            Access::Granted
        } else {
            Access::RedirectToLogin
        }
    }

    fn dispatch(&mut self, action: AuthAction) {
        self.state = std::mem::take(&mut self.state).reduce(action);
    }
}
