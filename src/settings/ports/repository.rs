//! Repository port for the settings document.

use crate::settings::domain::SystemSettings;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for settings repository operations.
pub type SettingsRepositoryResult<T> = Result<T, SettingsRepositoryError>;

/// Settings persistence contract: one document, fixed key.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Loads the stored settings document, if one exists.
    async fn load(&self) -> SettingsRepositoryResult<Option<SystemSettings>>;

    /// Inserts or replaces the settings document.
    async fn save(&self, settings: &SystemSettings) -> SettingsRepositoryResult<()>;
}

/// Errors returned by settings repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SettingsRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SettingsRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
