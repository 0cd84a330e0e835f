use async_trait::async_trait;

use crate::domain::{
    email::Email, password::Password, purpose::Purpose, verification_code::VerificationCode,
    verification_error::VerificationError,
};

/// Port trait for message delivery. Templating and transport are the
/// implementation's business; the caller only supplies the text.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, recipient: &Email, body: &str) -> Result<(), String>;
}

/// Source of unpredictable codes and replacement passwords.
pub trait CodeGenerator: Send + Sync {
    /// A code of `length` characters from the purpose's alphabet.
    fn generate(
        &self,
        length: usize,
        purpose: Purpose,
    ) -> Result<VerificationCode, VerificationError>;

    /// A one-time alphanumeric password.
    fn generate_password(&self, length: usize) -> Result<Password, VerificationError>;
}
