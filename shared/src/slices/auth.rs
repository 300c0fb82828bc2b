use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::UserId;
use crate::{AppError, ErrorKind};

pub const DEMO_EMAIL: &str = "demo@doctorai.com";
pub const DEMO_PASSWORD: &str = "password";
pub const MOCK_TOKEN: &str = "mock-jwt-token";

const USER_ID_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Patient,
    Doctor,
    Admin,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// A signed-in user plus the bearer token issued for them.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: SecretString,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => {
                AppError::new(ErrorKind::Authentication, "Invalid credentials")
            }
            AuthError::MissingField { field } => {
                AppError::new(ErrorKind::Validation, "Please fill in all required fields")
                    .with_context("field", field)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct AuthState {
    pub user: Option<User>,
    token: Option<SecretString>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.expose_secret().as_str())
    }

    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn set_credentials(&mut self, session: Session) {
        self.user = Some(session.user);
        self.token = Some(session.token);
        self.is_authenticated = true;
        self.is_loading = false;
    }

    pub fn clear_credentials(&mut self) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(message.into());
    }

    pub fn logout(&mut self) {
        self.clear_credentials();
        self.is_loading = false;
        self.error = None;
    }
}

/// In-memory stand-in for an identity provider: only the demo account signs in.
pub fn authenticate(email: &str, password: &str) -> Result<Session, AuthError> {
    if email.trim() == DEMO_EMAIL && password == DEMO_PASSWORD {
        Ok(Session {
            user: User {
                id: UserId::new("1"),
                email: DEMO_EMAIL.to_string(),
                name: "Demo User".to_string(),
                role: Role::Patient,
            },
            token: SecretString::new(MOCK_TOKEN.to_string()),
        })
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

pub fn register(name: &str, email: &str, password: &str) -> Result<Session, AuthError> {
    let name = name.trim();
    let email = email.trim();

    for (field, value) in [("name", name), ("email", email), ("password", password)] {
        if value.is_empty() {
            return Err(AuthError::MissingField { field });
        }
    }

    Ok(Session {
        user: User {
            id: UserId::new(random_user_id(&mut rand::thread_rng())),
            email: email.to_string(),
            name: name.to_string(),
            role: Role::Patient,
        },
        token: SecretString::new(MOCK_TOKEN.to_string()),
    })
}

fn random_user_id<R: Rng>(rng: &mut R) -> String {
    (0..USER_ID_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect()
}
