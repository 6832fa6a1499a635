//! Thread-safe in-memory settings repository.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::settings::{
    domain::SystemSettings,
    ports::{SettingsRepository, SettingsRepositoryError, SettingsRepositoryResult},
};

/// In-memory single-document adapter for settings.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsRepository {
    state: Arc<RwLock<Option<SystemSettings>>>,
}

impl InMemorySettingsRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> SettingsRepositoryError {
    SettingsRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load(&self) -> SettingsRepositoryResult<Option<SystemSettings>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.clone())
    }

    async fn save(&self, settings: &SystemSettings) -> SettingsRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        *state = Some(settings.clone());
        Ok(())
    }
}
