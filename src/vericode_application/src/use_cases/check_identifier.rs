use vericode_core::{Email, UserStore, VerificationError};

/// Check identifier use case - reports whether an address already belongs to
/// an account so a front end can choose between sign-in and registration
pub struct CheckIdentifierUseCase<U>
where
    U: UserStore,
{
    user_store: U,
}

impl<U> CheckIdentifierUseCase<U>
where
    U: UserStore,
{
    pub fn new(user_store: U) -> Self {
        Self { user_store }
    }

    #[tracing::instrument(name = "CheckIdentifierUseCase::execute", skip_all)]
    pub async fn execute(&self, identifier: &str) -> Result<bool, VerificationError> {
        let email = Email::parse(identifier).map_err(|_| VerificationError::InvalidIdentifier)?;
        Ok(self.user_store.is_identifier_taken(&email).await?)
    }
}
