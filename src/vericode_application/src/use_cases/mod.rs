pub mod check_identifier;
pub mod reset_password;
pub mod verify_email;

// Re-export for convenience
pub use check_identifier::CheckIdentifierUseCase;
pub use reset_password::ResetPasswordUseCase;
pub use verify_email::VerifyEmailUseCase;
