use vericode_core::{
    CodeStore, Email, Purpose, UserStore, VerificationCode, VerificationError,
};

use crate::code_verifier::CodeVerifier;

/// Verify email use case - consumes an email verification code and marks the
/// address as verified
pub struct VerifyEmailUseCase<S, U>
where
    S: CodeStore,
    U: UserStore,
{
    verifier: CodeVerifier<S>,
    user_store: U,
}

impl<S, U> VerifyEmailUseCase<S, U>
where
    S: CodeStore,
    U: UserStore,
{
    pub fn new(code_store: S, user_store: U) -> Self {
        Self {
            verifier: CodeVerifier::new(code_store),
            user_store,
        }
    }

    /// Execute the verify email use case
    ///
    /// # Arguments
    /// * `identifier` - The email address the code was sent to
    /// * `code` - The code the user typed in
    ///
    /// # Returns
    /// The verified Email, or VerificationError
    #[tracing::instrument(name = "VerifyEmailUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        identifier: &str,
        code: VerificationCode,
    ) -> Result<Email, VerificationError> {
        let email = Email::parse(identifier).map_err(|_| VerificationError::InvalidIdentifier)?;

        if !self
            .verifier
            .verify(&email, &code, Purpose::EmailVerification)
            .await?
        {
            return Err(VerificationError::CodeExpiredOrMismatch);
        }

        self.user_store.mark_email_verified(&email).await?;

        Ok(email)
    }
}
