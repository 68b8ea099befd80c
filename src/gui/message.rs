use crate::core::status::{CountryStatus, StatusFilter};
use crate::map::topology::WorldTopology;

#[derive(Debug, Clone)]
pub enum Message {
    /// One-time topology fetch finished (or failed).
    TopologyLoaded(Result<WorldTopology, String>),

    /// The map published a click: the region and the status its cycle
    /// proposes. The shell owns the authoritative mutation.
    RegionActivated {
        id: String,
        next: Option<CountryStatus>,
    },
    /// A sidebar row was clicked; same cycle, same mutation path.
    CountryRowClicked(String),

    SearchChanged(String),
    FilterChanged(StatusFilter),

    ProfileSelected(String),
    NewProfileNameChanged(String),
    NewProfileEmojiChanged(String),
    AddProfile,
    DeleteRequested,
    DeleteConfirmed,
    DeleteCancelled,

    ExportRequested,
    ExportFinished(Result<Option<String>, String>),
    ImportRequested,
    /// `None` when the file dialog was dismissed.
    ImportLoaded(Option<Result<String, String>>),

    /// Redraw driver while recolor fades are running.
    FadeTick,
    DismissBanner,
}
