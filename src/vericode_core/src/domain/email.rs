use std::{
    hash::{Hash, Hasher},
    sync::LazyLock,
};

use regex::Regex;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

/// Longest address accepted, in bytes (RFC 5321 forward-path limit minus brackets).
const MAX_EMAIL_LENGTH: usize = 254;

// WHATWG "valid e-mail address" production.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email address is empty")]
    Empty,
    #[error("Email address is too long")]
    TooLong,
    #[error("Invalid email address format")]
    InvalidFormat,
}

/// An email address used as the identifier that verification codes are bound to.
///
/// The address is kept exactly as supplied; comparisons and hashing are over
/// the raw string, so `Bob@example.com` and `bob@example.com` are different
/// identifiers.
#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        Self::try_from(Secret::from(raw.to_string()))
    }

    /// Substring before the `@`.
    pub fn local_part(&self) -> &str {
        self.split().0
    }

    /// Substring after the `@`.
    pub fn domain(&self) -> &str {
        self.split().1
    }

    fn split(&self) -> (&str, &str) {
        // Construction guarantees exactly one '@'.
        self.0
            .expose_secret()
            .split_once('@')
            .unwrap_or_default()
    }
}

impl TryFrom<Secret<String>> for Email {
    type Error = EmailError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        let raw = value.expose_secret();
        if raw.is_empty() {
            return Err(EmailError::Empty);
        }
        if raw.len() > MAX_EMAIL_LENGTH {
            return Err(EmailError::TooLong);
        }
        if !EMAIL_REGEX.is_match(raw) {
            return Err(EmailError::InvalidFormat);
        }
        Ok(Self(value))
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}
