pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{PostmarkSettings, RedisSettings, SettingsError, VericodeSettings};
