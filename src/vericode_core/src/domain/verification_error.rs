use thiserror::Error;

use crate::ports::repositories::{CodeStoreError, UserStoreError};

/// Every outcome other than success that issuing or verifying a code can produce.
///
/// Policy and validation variants are ordinary business results. Only
/// `NotifierFailure` and `PersistenceFailure` signal infrastructure faults.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Invalid email address")]
    InvalidIdentifier,
    #[error("Email domain is not on the allow-list")]
    DomainNotAllowed,
    #[error("Email aliases are not allowed")]
    AliasNotAllowed,
    #[error("Email address is already registered")]
    AlreadyRegistered,
    #[error("Email address is not registered")]
    NotRegistered,
    #[error("Code length must be greater than zero")]
    InvalidLength,
    // Missing and expired codes share this variant with wrong ones.
    #[error("Verification code is invalid or has expired")]
    CodeExpiredOrMismatch,
    #[error("Failed to send notification: {0}")]
    NotifierFailure(String),
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
}

impl VerificationError {
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::NotifierFailure(_) | Self::PersistenceFailure(_)
        )
    }
}

impl PartialEq for VerificationError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidIdentifier, Self::InvalidIdentifier) => true,
            (Self::DomainNotAllowed, Self::DomainNotAllowed) => true,
            (Self::AliasNotAllowed, Self::AliasNotAllowed) => true,
            (Self::AlreadyRegistered, Self::AlreadyRegistered) => true,
            (Self::NotRegistered, Self::NotRegistered) => true,
            (Self::InvalidLength, Self::InvalidLength) => true,
            (Self::CodeExpiredOrMismatch, Self::CodeExpiredOrMismatch) => true,
            (Self::NotifierFailure(_), Self::NotifierFailure(_)) => true,
            (Self::PersistenceFailure(_), Self::PersistenceFailure(_)) => true,
            _ => false,
        }
    }
}

impl From<CodeStoreError> for VerificationError {
    fn from(error: CodeStoreError) -> Self {
        match error {
            CodeStoreError::PersistenceFailure(e) => Self::PersistenceFailure(e),
        }
    }
}

impl From<UserStoreError> for VerificationError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::UserAlreadyExists => Self::AlreadyRegistered,
            UserStoreError::UserNotFound => Self::NotRegistered,
            UserStoreError::UnexpectedError(e) => Self::PersistenceFailure(e),
        }
    }
}
