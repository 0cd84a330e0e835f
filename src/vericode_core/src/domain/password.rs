use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must be at least 8 characters long")]
    TooShort,
}

/// An account password.
///
/// User-supplied passwords go through `TryFrom`; replacement passwords minted
/// by the code generator are built with [`Password::generated`].
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub(crate) fn generated(value: String) -> Self {
        Self(Secret::from(value))
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if value.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        Ok(Self(value))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
