pub mod catalog;
pub mod profile;
pub mod snapshot;
pub mod status;
pub mod storage;
pub mod view_model;

pub use catalog::{Catalog, Country};
pub use profile::{ProfileError, ProfileManager, UserProfile};
pub use snapshot::{SnapshotEntry, SnapshotError, export_file_name, parse_snapshot};
pub use status::{CountryStatus, StatusFilter, StatusMap, next_in_cycle};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use view_model::{ImportError, Stats, ViewModel, compute_stats};
