pub mod email;
pub mod password;
pub mod policy;
pub mod purpose;
pub mod settings;
pub mod verification_code;
pub mod verification_error;
