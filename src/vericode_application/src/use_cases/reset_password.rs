use vericode_core::{
    CodeGenerator, CodeStore, Email, Password, Purpose, UserStore, VerificationCode,
    VerificationError,
};

use crate::{code_verifier::CodeVerifier, settings_handle::SettingsHandle};

/// Reset password use case - redeems a reset token for a freshly generated
/// one-time password
pub struct ResetPasswordUseCase<S, U, G>
where
    S: CodeStore,
    U: UserStore,
    G: CodeGenerator,
{
    verifier: CodeVerifier<S>,
    user_store: U,
    generator: G,
    settings: SettingsHandle,
}

impl<S, U, G> ResetPasswordUseCase<S, U, G>
where
    S: CodeStore,
    U: UserStore,
    G: CodeGenerator,
{
    pub fn new(code_store: S, user_store: U, generator: G, settings: SettingsHandle) -> Self {
        Self {
            verifier: CodeVerifier::new(code_store),
            user_store,
            generator,
            settings,
        }
    }

    /// Execute the reset password use case
    ///
    /// # Arguments
    /// * `identifier` - The email address from the reset link
    /// * `token` - The reset token from the reset link
    ///
    /// # Returns
    /// The new password, which the caller shows to the user once
    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        identifier: &str,
        token: VerificationCode,
    ) -> Result<Password, VerificationError> {
        if identifier.is_empty() {
            return Err(VerificationError::InvalidIdentifier);
        }
        if token.is_empty() {
            return Err(VerificationError::CodeExpiredOrMismatch);
        }
        let email = Email::parse(identifier).map_err(|_| VerificationError::InvalidIdentifier)?;

        if !self
            .verifier
            .verify(&email, &token, Purpose::PasswordReset)
            .await?
        {
            return Err(VerificationError::CodeExpiredOrMismatch);
        }

        let length = self.settings.snapshot().reset_password_length;
        let password = self.generator.generate_password(length)?;

        self.user_store
            .reset_password(&email, password.clone())
            .await?;

        // The token was consumed above; delete again so stores that keep
        // records around after consumption cannot replay it.
        self.verifier.discard(&email, Purpose::PasswordReset).await?;

        tracing::info!(event = "password_reset", "Password reset completed");

        Ok(password)
    }
}
