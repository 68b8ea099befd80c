use travelmarks::core::catalog::Catalog;
use travelmarks::core::status::{CountryStatus, StatusMap};
use travelmarks::core::storage::{JsonFileStore, MemoryStore};
use travelmarks::core::view_model::ViewModel;
use travelmarks::map::topology::WorldTopology;

/// A view model over the bundled catalog and an in-memory store.
pub fn memory_vm() -> ViewModel<MemoryStore> {
    ViewModel::new(
        Catalog::bundled().expect("bundled catalog parses"),
        MemoryStore::new(),
    )
}

/// A view model persisting into a temp directory. Returns the directory
/// so the caller can reopen the store and verify durability.
pub fn file_vm() -> (ViewModel<JsonFileStore>, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let store = JsonFileStore::open(dir.path()).expect("Failed to open store");
    let vm = ViewModel::new(Catalog::bundled().expect("bundled catalog parses"), store);
    (vm, dir)
}

/// The small topology shipped with the repo, decoded.
pub fn mini_topology() -> WorldTopology {
    WorldTopology::from_json(include_str!("../../assets/world-mini.geo.json"))
        .expect("bundled mini topology parses")
}

/// Build a StatusMap from literal pairs.
pub fn status_map(entries: &[(&str, CountryStatus)]) -> StatusMap {
    entries
        .iter()
        .map(|(id, status)| (id.to_string(), *status))
        .collect()
}
