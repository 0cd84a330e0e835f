use std::collections::HashSet;

use secrecy::ExposeSecret;
use serde::Deserialize;

use super::{email::Email, verification_error::VerificationError};

/// Anti-abuse rules applied to an identifier before a code is issued.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub domain_restriction_enabled: bool,
    pub domain_whitelist: HashSet<String>,
    pub alias_restriction_enabled: bool,
}

impl PolicyConfig {
    /// When domain restriction is on, the domain part must be on the allow-list
    /// (exact, case-sensitive match).
    pub fn check_domain(&self, email: &Email) -> Result<(), VerificationError> {
        if !self.domain_restriction_enabled {
            return Ok(());
        }
        let (_, domain) = split_identifier(email)?;
        if !self.domain_whitelist.contains(domain) {
            return Err(VerificationError::DomainNotAllowed);
        }
        Ok(())
    }

    /// When alias restriction is on, the local part may not contain `+` or `.`,
    /// which many providers collapse into the same mailbox.
    pub fn check_alias(&self, email: &Email) -> Result<(), VerificationError> {
        if !self.alias_restriction_enabled {
            return Ok(());
        }
        let (local, _) = split_identifier(email)?;
        if local.contains('+') || local.contains('.') {
            return Err(VerificationError::AliasNotAllowed);
        }
        Ok(())
    }
}

fn split_identifier(email: &Email) -> Result<(&str, &str), VerificationError> {
    let raw = email.as_ref().expose_secret();
    let mut parts = raw.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => Ok((local, domain)),
        _ => Err(VerificationError::InvalidIdentifier),
    }
}
