//! # Vericode - Verification Code Service Library
//!
//! Facade crate re-exporting the public APIs of the vericode workspace:
//! issuing short-lived codes for email verification and password reset,
//! and redeeming them exactly once.
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Purpose`, `VerificationCode`, `VerificationSettings`, etc.
//! - **Ports**: `CodeStore`, `UserStore`, `Notifier`, `CodeGenerator`
//! - **Application**: `CodeIssuer`, `CodeVerifier` and the flow use cases
//! - **Adapters**: `HashMapCodeStore`, `RedisCodeStore`, `PostmarkNotifier`, configuration, telemetry

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use vericode_core::*;
}

pub use vericode_core::{
    CodeAlphabet, Email, EmailError, Password, PasswordError, PolicyConfig, Purpose,
    PurposeSettings, RandomCodeGenerator, VerificationCode, VerificationError,
    VerificationSettings,
};

// ============================================================================
// Ports
// ============================================================================

/// Repository and service trait definitions
pub mod repositories {
    pub use vericode_core::{
        CodeGenerator, CodeStore, CodeStoreError, Notifier, UserStore, UserStoreError,
    };
}

pub use repositories::{
    CodeGenerator, CodeStore, CodeStoreError, Notifier, UserStore, UserStoreError,
};

// ============================================================================
// Application Layer
// ============================================================================

/// Issuing, verifying and the flows built on top of them
pub mod use_cases {
    pub use vericode_application::*;
}

pub use vericode_application::{
    CheckIdentifierUseCase, CodeIssuer, CodeVerifier, Notification, PolicyGate,
    ResetPasswordUseCase, SettingsHandle, VerifyEmailUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Code and user store implementations
    pub mod persistence {
        pub use vericode_adapters::persistence::*;
    }

    /// Notifier implementations
    pub mod email {
        pub use vericode_adapters::email::*;
    }

    /// Configuration
    pub mod config {
        pub use vericode_adapters::config::*;
    }

    pub use vericode_adapters::telemetry::init_tracing;
}

pub use vericode_adapters::{
    config::VericodeSettings,
    email::{MockNotifier, PostmarkNotifier},
    persistence::{HashMapCodeStore, HashMapUserStore, RedisCodeStore},
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the ports
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
