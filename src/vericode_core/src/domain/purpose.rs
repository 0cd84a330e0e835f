use std::fmt;

use serde::{Deserialize, Serialize};

/// What a verification code authorises. Codes for different purposes live in
/// separate namespaces even when they share an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    EmailVerification,
    PasswordReset,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::EmailVerification => "email_verification",
            Purpose::PasswordReset => "password_reset",
        }
    }

    /// Alphabet codes for this purpose are drawn from.
    pub fn alphabet(&self) -> CodeAlphabet {
        match self {
            Purpose::EmailVerification => CodeAlphabet::Numeric,
            Purpose::PasswordReset => CodeAlphabet::Alphanumeric,
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeAlphabet {
    /// `0`-`9`
    Numeric,
    /// `0`-`9`, `A`-`Z`, `a`-`z` (base62)
    Alphanumeric,
}

impl CodeAlphabet {
    pub fn symbols(&self) -> &'static [u8] {
        match self {
            CodeAlphabet::Numeric => b"0123456789",
            CodeAlphabet::Alphanumeric => {
                b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz"
            }
        }
    }

    pub fn contains(&self, c: char) -> bool {
        match self {
            CodeAlphabet::Numeric => c.is_ascii_digit(),
            CodeAlphabet::Alphanumeric => c.is_ascii_alphanumeric(),
        }
    }
}
