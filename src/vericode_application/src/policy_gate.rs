use vericode_core::{Email, PolicyConfig, Purpose, UserStore, VerificationError};

/// Pre-issuance checks, applied in order and stopping at the first rejection:
/// syntax, domain allow-list, alias restriction, registration status.
pub struct PolicyGate<U>
where
    U: UserStore,
{
    user_store: U,
}

impl<U> PolicyGate<U>
where
    U: UserStore,
{
    pub fn new(user_store: U) -> Self {
        Self { user_store }
    }

    /// Run every check for `purpose` against the given policy snapshot.
    ///
    /// # Returns
    /// The parsed identifier when every check passes.
    #[tracing::instrument(name = "PolicyGate::check", skip(self, identifier, policy))]
    pub async fn check(
        &self,
        identifier: &str,
        purpose: Purpose,
        policy: &PolicyConfig,
    ) -> Result<Email, VerificationError> {
        let result = self.run_checks(identifier, purpose, policy).await;
        if let Err(e) = &result {
            if e.is_infrastructure() {
                tracing::error!(error = %e, event = "policy_check_failed", "Policy check could not complete");
            } else {
                tracing::warn!(reason = %e, event = "issuance_rejected", "Identifier rejected by policy");
            }
        }
        result
    }

    async fn run_checks(
        &self,
        identifier: &str,
        purpose: Purpose,
        policy: &PolicyConfig,
    ) -> Result<Email, VerificationError> {
        let email = Email::parse(identifier).map_err(|_| VerificationError::InvalidIdentifier)?;

        policy.check_domain(&email)?;
        policy.check_alias(&email)?;

        let taken = self.user_store.is_identifier_taken(&email).await?;
        match (purpose, taken) {
            (Purpose::EmailVerification, true) => Err(VerificationError::AlreadyRegistered),
            (Purpose::PasswordReset, false) => Err(VerificationError::NotRegistered),
            _ => Ok(email),
        }
    }
}
