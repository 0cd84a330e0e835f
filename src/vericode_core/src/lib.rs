pub mod domain;
pub mod generator;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    email::{Email, EmailError},
    password::{Password, PasswordError},
    policy::PolicyConfig,
    purpose::{CodeAlphabet, Purpose},
    settings::{PurposeSettings, VerificationSettings},
    verification_code::VerificationCode,
    verification_error::VerificationError,
};

pub use generator::RandomCodeGenerator;

pub use ports::{
    repositories::{CodeStore, CodeStoreError, UserStore, UserStoreError},
    services::{CodeGenerator, Notifier},
};
