use vericode_core::{
    CodeGenerator, CodeStore, Notifier, Purpose, UserStore, VerificationCode, VerificationError,
};

use crate::{notification::Notification, policy_gate::PolicyGate, settings_handle::SettingsHandle};

/// Issues codes: policy gate, then generator, then store, then notifier.
pub struct CodeIssuer<U, S, N, G>
where
    U: UserStore,
    S: CodeStore,
    N: Notifier,
    G: CodeGenerator,
{
    policy_gate: PolicyGate<U>,
    code_store: S,
    notifier: N,
    generator: G,
    settings: SettingsHandle,
}

impl<U, S, N, G> CodeIssuer<U, S, N, G>
where
    U: UserStore,
    S: CodeStore,
    N: Notifier,
    G: CodeGenerator,
{
    pub fn new(
        user_store: U,
        code_store: S,
        notifier: N,
        generator: G,
        settings: SettingsHandle,
    ) -> Self {
        Self {
            policy_gate: PolicyGate::new(user_store),
            code_store,
            notifier,
            generator,
            settings,
        }
    }

    /// Issue a fresh code for `identifier` and send it out.
    ///
    /// Re-issuing replaces any earlier unconsumed code for the same purpose.
    /// When delivery fails the new code stays registered and
    /// `NotifierFailure` is returned; calling `issue` again is safe.
    ///
    /// # Returns
    /// The generated code, or the first policy/infrastructure error hit.
    #[tracing::instrument(name = "CodeIssuer::issue", skip(self, identifier))]
    pub async fn issue(
        &self,
        identifier: &str,
        purpose: Purpose,
    ) -> Result<VerificationCode, VerificationError> {
        let settings = self.settings.snapshot();

        let email = self
            .policy_gate
            .check(identifier, purpose, &settings.policy)
            .await?;

        let purpose_settings = settings.for_purpose(purpose);
        let code = self.generator.generate(purpose_settings.code_length, purpose)?;

        self.code_store
            .register(email.clone(), purpose, code.clone(), purpose_settings.ttl())
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, event = "code_storage_failed", "Failed to store verification code");
            })?;

        tracing::info!(
            ttl_minutes = purpose_settings.ttl_minutes,
            event = "code_issued",
            "Issued verification code"
        );

        let notification = Notification::compose(purpose, &email, &code, &settings);
        self.notifier
            .send(&notification.subject, &email, &notification.body)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, event = "notification_failed", "Failed to deliver verification code");
                VerificationError::NotifierFailure(e)
            })?;

        Ok(code)
    }
}
