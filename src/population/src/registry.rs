use std::sync::Arc;

use ahash::AHashMap;

use crate::{error::PopulationError, mouse::{Mouse, MouseId}};

/// Append-only record of every mouse ever created by a population, retired ancestors included.
#[derive(Debug, Clone, Default)]
pub struct Registry(AHashMap<MouseId, Arc<Mouse>>);

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// `PopulationError::DuplicateMouse` if the identifier is already registered.
    pub fn insert(&mut self, mouse: Arc<Mouse>) -> Result<(), PopulationError> {
        let id = mouse.id();
        if self.0.contains_key(&id) {
            return Err(PopulationError::DuplicateMouse(id))
        }
        self.0.insert(id, mouse);
        Ok(())
    }

    /// # Errors
    /// `PopulationError::UnknownMouse` if no mouse carries this identifier.
    pub fn get(&self, id: MouseId) -> Result<&Arc<Mouse>, PopulationError> {
        self.0.get(&id).ok_or(PopulationError::UnknownMouse(id))
    }

    #[must_use]
    pub fn contains(&self, id: MouseId) -> bool {
        self.0.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every registered mouse, sorted by identifier.
    #[must_use]
    pub fn mice(&self) -> Vec<&Arc<Mouse>> {
        let mut mice: Vec<_> = self.0.values().collect();
        mice.sort_by_key(|m| m.id());
        mice
    }
}
