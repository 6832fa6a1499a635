//! Application services for system settings.

mod settings;

pub use settings::{SettingsService, SettingsServiceError, SettingsServiceResult};
