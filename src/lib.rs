pub mod core;
pub mod map;

pub use crate::core::{
    Catalog, Country, CountryStatus, JsonFileStore, KeyValueStore, MemoryStore, ProfileError,
    ProfileManager, StatusFilter, StatusMap, UserProfile, ViewModel,
};
pub use crate::map::{MapScene, Viewport, WorldTopology};

#[cfg(feature = "gui")]
pub mod gui;
