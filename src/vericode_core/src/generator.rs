use rand::Rng;

use crate::{
    domain::{
        password::Password,
        purpose::{CodeAlphabet, Purpose},
        verification_code::VerificationCode,
        verification_error::VerificationError,
    },
    ports::services::CodeGenerator,
};

/// Generator backed by the thread-local CSPRNG. Every character is an
/// independent uniform draw from the alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl RandomCodeGenerator {
    pub fn new() -> Self {
        Self
    }

    fn random_string(
        &self,
        length: usize,
        alphabet: CodeAlphabet,
    ) -> Result<String, VerificationError> {
        if length == 0 {
            return Err(VerificationError::InvalidLength);
        }
        let symbols = alphabet.symbols();
        let mut rng = rand::rng();
        Ok((0..length)
            .map(|_| symbols[rng.random_range(0..symbols.len())] as char)
            .collect())
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(
        &self,
        length: usize,
        purpose: Purpose,
    ) -> Result<VerificationCode, VerificationError> {
        self.random_string(length, purpose.alphabet())
            .map(VerificationCode::new)
    }

    fn generate_password(&self, length: usize) -> Result<Password, VerificationError> {
        self.random_string(length, CodeAlphabet::Alphanumeric)
            .map(Password::generated)
    }
}
