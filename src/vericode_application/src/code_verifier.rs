use vericode_core::{CodeStore, Email, Purpose, VerificationCode, VerificationError};

/// Checks presented codes against the store, consuming them on success.
pub struct CodeVerifier<S>
where
    S: CodeStore,
{
    code_store: S,
}

impl<S> CodeVerifier<S>
where
    S: CodeStore,
{
    pub fn new(code_store: S) -> Self {
        Self { code_store }
    }

    /// `Ok(true)` at most once per issued code. Missing, wrong and expired
    /// codes all yield `Ok(false)`; `Err` is reserved for store faults.
    #[tracing::instrument(name = "CodeVerifier::verify", skip(self, identifier, code))]
    pub async fn verify(
        &self,
        identifier: &Email,
        code: &VerificationCode,
        purpose: Purpose,
    ) -> Result<bool, VerificationError> {
        let verified = self
            .code_store
            .verify_and_consume(identifier, code, purpose)
            .await?;

        if verified {
            tracing::info!(event = "code_verified", "Verification code accepted");
        } else {
            tracing::warn!(event = "code_rejected", "Verification code rejected");
        }
        Ok(verified)
    }

    /// Drop whatever is stored for the key, independent of its TTL.
    #[tracing::instrument(name = "CodeVerifier::discard", skip(self, identifier))]
    pub async fn discard(
        &self,
        identifier: &Email,
        purpose: Purpose,
    ) -> Result<(), VerificationError> {
        self.code_store.delete(identifier, purpose).await?;
        Ok(())
    }
}
