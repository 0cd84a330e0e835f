pub mod code_issuer;
pub mod code_verifier;
pub mod notification;
pub mod policy_gate;
pub mod settings_handle;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use code_issuer::CodeIssuer;
pub use code_verifier::CodeVerifier;
pub use notification::Notification;
pub use policy_gate::PolicyGate;
pub use settings_handle::SettingsHandle;
pub use use_cases::{CheckIdentifierUseCase, ResetPasswordUseCase, VerifyEmailUseCase};
