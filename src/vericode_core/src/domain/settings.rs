use std::time::Duration;

use serde::{Deserialize, Deserializer};

use super::{policy::PolicyConfig, purpose::Purpose};

pub const DEFAULT_VERIFICATION_CODE_LENGTH: usize = 6;
pub const DEFAULT_RESET_TOKEN_LENGTH: usize = 32;
pub const DEFAULT_RESET_PASSWORD_LENGTH: usize = 12;
pub const DEFAULT_CODE_TTL_MINUTES: u64 = 10;

/// Length and lifetime of the codes issued for one purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurposeSettings {
    pub code_length: usize,
    pub ttl_minutes: u64,
}

impl PurposeSettings {
    pub fn email_verification() -> Self {
        Self {
            code_length: DEFAULT_VERIFICATION_CODE_LENGTH,
            ttl_minutes: DEFAULT_CODE_TTL_MINUTES,
        }
    }

    pub fn password_reset() -> Self {
        Self {
            code_length: DEFAULT_RESET_TOKEN_LENGTH,
            ttl_minutes: DEFAULT_CODE_TTL_MINUTES,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }
}

/// A per-purpose section as written in configuration; absent fields keep the
/// purpose's own default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PurposeOverrides {
    code_length: Option<usize>,
    ttl_minutes: Option<u64>,
}

impl PurposeOverrides {
    fn apply_to(self, defaults: PurposeSettings) -> PurposeSettings {
        PurposeSettings {
            code_length: self.code_length.unwrap_or(defaults.code_length),
            ttl_minutes: self.ttl_minutes.unwrap_or(defaults.ttl_minutes),
        }
    }
}

fn email_verification_section<'de, D>(deserializer: D) -> Result<PurposeSettings, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(PurposeOverrides::deserialize(deserializer)?.apply_to(PurposeSettings::email_verification()))
}

fn password_reset_section<'de, D>(deserializer: D) -> Result<PurposeSettings, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(PurposeOverrides::deserialize(deserializer)?.apply_to(PurposeSettings::password_reset()))
}

/// Immutable snapshot of everything the issuer reads at issuance time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VerificationSettings {
    #[serde(deserialize_with = "email_verification_section")]
    pub email_verification: PurposeSettings,
    #[serde(deserialize_with = "password_reset_section")]
    pub password_reset: PurposeSettings,
    /// Length of the replacement password handed out after a reset.
    pub reset_password_length: usize,
    pub policy: PolicyConfig,
    /// Public base URL that reset links point at.
    pub server_address: String,
    /// Product name used in message subjects.
    pub system_name: String,
}

impl VerificationSettings {
    pub fn for_purpose(&self, purpose: Purpose) -> &PurposeSettings {
        match purpose {
            Purpose::EmailVerification => &self.email_verification,
            Purpose::PasswordReset => &self.password_reset,
        }
    }
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            email_verification: PurposeSettings::email_verification(),
            password_reset: PurposeSettings::password_reset(),
            reset_password_length: DEFAULT_RESET_PASSWORD_LENGTH,
            policy: PolicyConfig::default(),
            server_address: "http://localhost:3000".to_string(),
            system_name: "Vericode".to_string(),
        }
    }
}
