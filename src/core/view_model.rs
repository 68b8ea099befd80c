use tracing::debug;

use crate::core::catalog::{Catalog, Country};
use crate::core::profile::{ProfileError, ProfileManager, UserProfile};
use crate::core::snapshot::{self, SnapshotEntry, SnapshotError};
use crate::core::status::{CountryStatus, StatusFilter, StatusMap, next_in_cycle};
use crate::core::storage::KeyValueStore;

/// Aggregate counters over the active profile's StatusMap. Percentages
/// are rounded independently per bucket, so the three of them can sum to
/// 99 or 101; that is the documented behavior, not something to correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub visited: usize,
    pub wishlist: usize,
    pub remaining: usize,
    pub visited_percent: u32,
    pub wishlist_percent: u32,
    pub remaining_percent: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Parse(#[from] SnapshotError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// The application's single source of truth: the catalog, the profile
/// set, and the active profile's StatusMap. The list and the map are two
/// presentations of this one state.
pub struct ViewModel<S> {
    catalog: Catalog,
    profiles: ProfileManager<S>,
    statuses: StatusMap,
}

impl<S: KeyValueStore> ViewModel<S> {
    pub fn new(catalog: Catalog, store: S) -> Self {
        let profiles = ProfileManager::load(store);
        let statuses = profiles.load_statuses();
        Self {
            catalog,
            profiles,
            statuses,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn statuses(&self) -> &StatusMap {
        &self.statuses
    }

    pub fn status_of(&self, country_id: &str) -> Option<CountryStatus> {
        self.statuses.get(country_id).copied()
    }

    /// Set or clear one country's status and write through. Clearing
    /// removes the entry outright; a `None` is never stored.
    pub fn set_status(
        &mut self,
        country_id: &str,
        status: Option<CountryStatus>,
    ) -> anyhow::Result<()> {
        match status {
            Some(status) => {
                self.statuses.insert(country_id.to_string(), status);
            }
            None => {
                self.statuses.remove(country_id);
            }
        }
        debug!(country = country_id, ?status, "status changed");
        self.profiles.save_statuses(&self.statuses)
    }

    /// Advance one country along the click cycle, returning the status it
    /// ended up with.
    pub fn cycle_status(&mut self, country_id: &str) -> anyhow::Result<Option<CountryStatus>> {
        let next = next_in_cycle(self.status_of(country_id));
        self.set_status(country_id, next)?;
        Ok(next)
    }

    /// Countries matching `query` (case-insensitive substring on the
    /// name) and `filter`, ascending by display name. Pure over the
    /// current state.
    pub fn filtered_countries(&self, query: &str, filter: StatusFilter) -> Vec<&Country> {
        let query = query.trim().to_lowercase();
        // The catalog is already name-sorted, so filtering preserves the
        // display order.
        self.catalog
            .countries()
            .iter()
            .filter(|c| query.is_empty() || c.name.to_lowercase().contains(&query))
            .filter(|c| filter.matches(self.status_of(&c.id)))
            .collect()
    }

    pub fn stats(&self) -> Stats {
        compute_stats(&self.statuses, self.catalog.len())
    }

    pub fn export_snapshot(&self) -> Vec<SnapshotEntry> {
        snapshot::export_rows(&self.catalog, &self.statuses)
    }

    /// Replace the whole StatusMap from an import payload and persist.
    /// Malformed payloads fail before any mutation.
    pub fn import_snapshot(&mut self, raw: &str) -> Result<(), ImportError> {
        let parsed = snapshot::parse_snapshot(raw)?;
        self.statuses = parsed;
        self.profiles.save_statuses(&self.statuses)?;
        Ok(())
    }

    // Profile operations delegate to the manager; the ones that change
    // the active profile swap the in-memory StatusMap wholesale.

    pub fn profiles(&self) -> &[UserProfile] {
        self.profiles.profiles()
    }

    pub fn active_profile(&self) -> &UserProfile {
        self.profiles.active_profile()
    }

    pub fn active_profile_name(&self) -> &str {
        self.profiles.active_name()
    }

    pub fn add_profile(&mut self, name: &str, emoji: &str) -> Result<(), ProfileError> {
        self.statuses = self.profiles.add_profile(name, emoji)?;
        Ok(())
    }

    pub fn delete_profile(&mut self, name: &str) -> Result<(), ProfileError> {
        if let Some(statuses) = self.profiles.delete_profile(name)? {
            self.statuses = statuses;
        }
        Ok(())
    }

    pub fn set_active_profile(&mut self, name: &str) -> Result<(), ProfileError> {
        self.statuses = self.profiles.set_active_profile(name)?;
        Ok(())
    }
}

/// Exact counts plus independently rounded percentages.
pub fn compute_stats(statuses: &StatusMap, total: usize) -> Stats {
    let visited = statuses
        .values()
        .filter(|s| **s == CountryStatus::Visited)
        .count();
    let wishlist = statuses
        .values()
        .filter(|s| **s == CountryStatus::Wishlist)
        .count();
    let remaining = total.saturating_sub(visited);

    let percent = |count: usize| -> u32 {
        if total == 0 {
            0
        } else {
            (count as f64 / total as f64 * 100.0).round() as u32
        }
    };

    Stats {
        visited,
        wishlist,
        remaining,
        visited_percent: percent(visited),
        wishlist_percent: percent(wishlist),
        remaining_percent: percent(remaining),
    }
}
