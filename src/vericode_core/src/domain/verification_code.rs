use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

/// A one-time code or reset token.
///
/// Equality is constant-time over the bytes.
#[derive(Debug, Clone)]
pub struct VerificationCode(Secret<String>);

impl VerificationCode {
    pub fn new(value: String) -> Self {
        Self(Secret::from(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// Constant-time comparison against a raw presented value.
    pub fn matches(&self, presented: &str) -> bool {
        self.as_str().as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl From<Secret<String>> for VerificationCode {
    fn from(value: Secret<String>) -> Self {
        Self(value)
    }
}

impl AsRef<Secret<String>> for VerificationCode {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for VerificationCode {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other.as_str())
    }
}

impl Eq for VerificationCode {}
