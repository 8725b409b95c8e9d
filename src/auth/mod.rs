pub mod hosted;
pub mod local;

pub use hosted::HostedIdentityProvider;
pub use local::LocalIdentityProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email not confirmed")]
    EmailNotConfirmed,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("username must be at least 3 characters (letters, digits, - _ .)")]
    InvalidUsername,
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("session token rejected: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("auth request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Provider(String),
    #[error("local accounts unavailable: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

/// The signed-in user. `user_id` keys their journal history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.user_id)
    }
}

#[derive(Debug, Clone)]
pub struct SignUp {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUp {
    pub fn validate(&self) -> Result<(), AuthError> {
        let username_ok = self.username.chars().count() >= MIN_USERNAME_LEN
            && self
                .username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !username_ok {
            return Err(AuthError::InvalidUsername);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Sign-in lifecycle. Failures never touch journal data.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, request: &SignUp) -> Result<Identity, AuthError>;
    async fn sign_in(&self, login: &str, password: &str) -> Result<Identity, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
    async fn current_user(&self) -> Option<Identity>;
}
