use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    email::Email, password::Password, purpose::Purpose, verification_code::VerificationCode,
};

// CodeStore port trait and errors
#[derive(Debug, Error)]
pub enum CodeStoreError {
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
}

/// Keyed, expiring repository of live codes. At most one record exists per
/// `(identifier, purpose)`.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Insert or replace the code for the key. A replaced code stops verifying
    /// immediately.
    async fn register(
        &self,
        identifier: Email,
        purpose: Purpose,
        code: VerificationCode,
        ttl: Duration,
    ) -> Result<(), CodeStoreError>;

    /// Atomically check and consume. Returns `true` exactly once for a live,
    /// matching code; a failed attempt leaves the stored record untouched.
    async fn verify_and_consume(
        &self,
        identifier: &Email,
        code: &VerificationCode,
        purpose: Purpose,
    ) -> Result<bool, CodeStoreError>;

    /// Remove the key if present. Deleting an absent key is not an error.
    async fn delete(&self, identifier: &Email, purpose: Purpose) -> Result<(), CodeStoreError>;
}

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserAlreadyExists, Self::UserAlreadyExists) => true,
            (Self::UserNotFound, Self::UserNotFound) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn is_identifier_taken(&self, identifier: &Email) -> Result<bool, UserStoreError>;
    async fn reset_password(
        &self,
        identifier: &Email,
        new_password: Password,
    ) -> Result<(), UserStoreError>;
    async fn mark_email_verified(&self, identifier: &Email) -> Result<(), UserStoreError>;
}
