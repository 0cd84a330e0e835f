use std::sync::Arc;

use arc_swap::ArcSwap;
use vericode_core::VerificationSettings;

/// Shared, atomically swappable settings.
///
/// Readers take an immutable snapshot per operation; a configuration reload
/// swaps the whole snapshot so no reader ever sees a half-applied change.
#[derive(Clone)]
pub struct SettingsHandle {
    current: Arc<ArcSwap<VerificationSettings>>,
}

impl SettingsHandle {
    pub fn new(settings: VerificationSettings) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(settings)),
        }
    }

    pub fn snapshot(&self) -> Arc<VerificationSettings> {
        self.current.load_full()
    }

    #[tracing::instrument(name = "SettingsHandle::replace", skip_all)]
    pub fn replace(&self, settings: VerificationSettings) {
        self.current.store(Arc::new(settings));
        tracing::info!(event = "settings_replaced", "Verification settings replaced");
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(VerificationSettings::default())
    }
}
