use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::core::status::StatusMap;
use crate::core::storage::{KeyValueStore, keys};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub emoji: String,
}

pub const DEFAULT_PROFILE_NAME: &str = "me";
pub const DEFAULT_PROFILE_EMOJI: &str = "👤";

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("a profile named \"{0}\" already exists")]
    DuplicateName(String),
    #[error("profile name must not be empty")]
    EmptyName,
    #[error("cannot delete the last remaining profile")]
    LastProfile,
    #[error("no profile named \"{0}\"")]
    UnknownProfile(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Owns the profile list and the active-profile selector, and routes
/// status reads/writes to the active profile's storage slot. At least one
/// profile exists at all times; the profile name is its identity key.
#[derive(Debug)]
pub struct ProfileManager<S> {
    store: S,
    profiles: Vec<UserProfile>,
    active: String,
}

impl<S: KeyValueStore> ProfileManager<S> {
    /// Restore the profile list and selector from the store, seeding a
    /// single default profile on first run (or after corrupt state).
    pub fn load(store: S) -> Self {
        let mut profiles: Vec<UserProfile> = store
            .get(keys::USERS)
            .and_then(|v| match serde_json::from_value(v) {
                Ok(list) => Some(list),
                Err(e) => {
                    warn!(error = %e, "persisted profile list is malformed, resetting");
                    None
                }
            })
            .unwrap_or_default();

        if profiles.is_empty() {
            profiles.push(UserProfile {
                name: DEFAULT_PROFILE_NAME.to_string(),
                emoji: DEFAULT_PROFILE_EMOJI.to_string(),
            });
        }

        let active = store
            .get(keys::CURRENT_USER)
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|name| profiles.iter().any(|p| &p.name == name))
            .unwrap_or_else(|| profiles[0].name.clone());

        Self {
            store,
            profiles,
            active,
        }
    }

    /// Profiles in insertion order.
    pub fn profiles(&self) -> &[UserProfile] {
        &self.profiles
    }

    pub fn active_name(&self) -> &str {
        &self.active
    }

    pub fn active_profile(&self) -> &UserProfile {
        // The constructor and every mutation keep `active` pointing at a
        // list member.
        self.profiles
            .iter()
            .find(|p| p.name == self.active)
            .unwrap_or(&self.profiles[0])
    }

    /// Append a profile and make it active. The trimmed name must be
    /// non-empty and unique.
    pub fn add_profile(&mut self, name: &str, emoji: &str) -> Result<StatusMap, ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if self.profiles.iter().any(|p| p.name == name) {
            return Err(ProfileError::DuplicateName(name.to_string()));
        }

        let emoji = emoji.trim();
        self.profiles.push(UserProfile {
            name: name.to_string(),
            emoji: if emoji.is_empty() {
                "🌍".to_string()
            } else {
                emoji.to_string()
            },
        });
        self.persist_profiles()?;
        debug!(profile = name, "profile added");
        self.set_active_profile(name)
    }

    /// Remove a profile and its status slot. Deleting the sole remaining
    /// profile is rejected; caller-side confirmation is expected before
    /// invoking this. Returns the statuses to show afterwards (unchanged
    /// active map, or the fallback profile's map if the active profile
    /// was the one deleted).
    pub fn delete_profile(&mut self, name: &str) -> Result<Option<StatusMap>, ProfileError> {
        if self.profiles.len() == 1 {
            return Err(ProfileError::LastProfile);
        }
        let idx = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ProfileError::UnknownProfile(name.to_string()))?;

        self.profiles.remove(idx);
        self.persist_profiles()?;
        self.store
            .remove(&keys::statuses(name))
            .map_err(ProfileError::Storage)?;
        debug!(profile = name, "profile deleted");

        if self.active == name {
            let fallback = self.profiles[0].name.clone();
            return self.set_active_profile(&fallback).map(Some);
        }
        Ok(None)
    }

    /// Switch the active profile and load its StatusMap. This is the one
    /// place where the in-memory status map is swapped wholesale.
    pub fn set_active_profile(&mut self, name: &str) -> Result<StatusMap, ProfileError> {
        if !self.profiles.iter().any(|p| p.name == name) {
            return Err(ProfileError::UnknownProfile(name.to_string()));
        }
        self.active = name.to_string();
        self.store
            .set(keys::CURRENT_USER, json!(name))
            .map_err(ProfileError::Storage)?;
        Ok(self.load_statuses())
    }

    /// The active profile's persisted StatusMap; malformed persisted data
    /// reads as empty.
    pub fn load_statuses(&self) -> StatusMap {
        self.store
            .get(&keys::statuses(&self.active))
            .and_then(|v| match serde_json::from_value(v) {
                Ok(map) => Some(map),
                Err(e) => {
                    warn!(profile = %self.active, error = %e,
                        "persisted statuses are malformed, starting empty");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Write-through of the active profile's StatusMap.
    pub fn save_statuses(&mut self, statuses: &StatusMap) -> anyhow::Result<()> {
        let key = keys::statuses(&self.active);
        self.store.set(&key, serde_json::to_value(statuses)?)
    }

    fn persist_profiles(&mut self) -> Result<(), ProfileError> {
        let value = serde_json::to_value(&self.profiles)
            .map_err(|e| ProfileError::Storage(e.into()))?;
        self.store
            .set(keys::USERS, value)
            .map_err(ProfileError::Storage)
    }
}
