use anyhow::Context;
use serde::{Deserialize, Serialize};

/// One row of the bundled country table. `id` is the ISO 3166-1 alpha-2
/// code and doubles as the region identifier in the map topology; `code`
/// is the alpha-3 code carried along in export files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub code: String,
    pub name: String,
}

/// Immutable country table, sorted ascending by display name.
#[derive(Debug, Clone)]
pub struct Catalog {
    countries: Vec<Country>,
}

const BUNDLED_COUNTRIES: &str = include_str!("../../assets/countries.json");

impl Catalog {
    /// Parse the bundled dataset. Called once at startup; the catalog
    /// never changes afterwards.
    pub fn bundled() -> anyhow::Result<Self> {
        Self::from_json(BUNDLED_COUNTRIES).context("Failed to parse bundled country catalog")
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let mut countries: Vec<Country> = serde_json::from_str(json)?;
        countries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(Self { countries })
    }

    /// All countries in display (name) order.
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}
