//! Service layer for reading and updating system settings.

use crate::settings::{
    domain::SystemSettings,
    ports::{SettingsRepository, SettingsRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for settings operations.
#[derive(Debug, Error)]
pub enum SettingsServiceError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] SettingsRepositoryError),
}

/// Result type for settings service operations.
pub type SettingsServiceResult<T> = Result<T, SettingsServiceError>;

/// System settings orchestration service.
#[derive(Clone)]
pub struct SettingsService {
    repository: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    /// Creates a new settings service.
    #[must_use]
    pub const fn new(repository: Arc<dyn SettingsRepository>) -> Self {
        Self { repository }
    }

    /// Returns the current settings, initialising defaults on first read.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsServiceError::Repository`] when persistence
    /// fails.
    pub async fn current(&self) -> SettingsServiceResult<SystemSettings> {
        if let Some(settings) = self.repository.load().await? {
            return Ok(settings);
        }
        let defaults = SystemSettings::default();
        self.repository.save(&defaults).await?;
        Ok(defaults)
    }

    /// Replaces the stored settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsServiceError::Repository`] when persistence
    /// fails.
    pub async fn update(&self, settings: SystemSettings) -> SettingsServiceResult<SystemSettings> {
        self.repository.save(&settings).await?;
        Ok(settings)
    }
}
