use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Marking a user can put on a country. Absence of a marking is the
/// implicit third state: an unmarked country never gets a map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountryStatus {
    Visited,
    Wishlist,
}

/// Country id -> status. Keys are sorted, so exports are deterministic.
pub type StatusMap = BTreeMap<String, CountryStatus>;

/// The fixed click cycle: unmarked -> Visited -> Wishlist -> unmarked.
pub fn next_in_cycle(current: Option<CountryStatus>) -> Option<CountryStatus> {
    match current {
        None => Some(CountryStatus::Visited),
        Some(CountryStatus::Visited) => Some(CountryStatus::Wishlist),
        Some(CountryStatus::Wishlist) => None,
    }
}

/// Predicate selecting which countries the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Visited,
    Wishlist,
    None,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Visited,
        StatusFilter::Wishlist,
        StatusFilter::None,
    ];

    pub fn matches(self, status: Option<CountryStatus>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Visited => status == Some(CountryStatus::Visited),
            StatusFilter::Wishlist => status == Some(CountryStatus::Wishlist),
            StatusFilter::None => status.is_none(),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StatusFilter::All => "All",
            StatusFilter::Visited => "Visited",
            StatusFilter::Wishlist => "Wishlist",
            StatusFilter::None => "Not marked",
        };
        f.write_str(label)
    }
}
