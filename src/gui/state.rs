use iced::widget::canvas;

use crate::core::status::StatusFilter;
use crate::core::storage::JsonFileStore;
use crate::core::view_model::ViewModel;
use crate::map::scene::MapScene;

/// Lifecycle of the map panel. The topology fetch happens once per app
/// start; a failed fetch shows a visible "map unavailable" panel instead
/// of a blank canvas.
#[derive(Debug)]
pub enum MapState {
    Loading,
    Ready(MapScene),
    Unavailable(String),
}

pub struct AppState {
    pub vm: ViewModel<JsonFileStore>,
    pub map: MapState,
    /// Cached map geometry; cleared whenever a fill changes.
    pub map_cache: canvas::Cache,

    pub query: String,
    pub filter: StatusFilter,

    pub new_profile_name: String,
    pub new_profile_emoji: String,
    /// Profile name awaiting delete confirmation.
    pub pending_delete: Option<String>,

    /// User-visible error/info line, dismissable.
    pub banner: Option<String>,
}

impl AppState {
    pub fn new(vm: ViewModel<JsonFileStore>) -> Self {
        Self {
            vm,
            map: MapState::Loading,
            map_cache: canvas::Cache::new(),
            query: String::new(),
            filter: StatusFilter::All,
            new_profile_name: String::new(),
            new_profile_emoji: String::new(),
            pending_delete: None,
            banner: None,
        }
    }
}
