use std::path::PathBuf;
use std::time::{Duration, Instant};

use iced::widget::{column, row};
use iced::{Element, Length, Subscription, Task, Theme};
use rfd::AsyncFileDialog;
use tracing::{error, info};

use crate::core::catalog::Catalog;
use crate::core::snapshot::export_file_name;
use crate::core::storage::JsonFileStore;
use crate::core::view_model::ViewModel;
use crate::gui::message::Message;
use crate::gui::state::{AppState, MapState};
use crate::gui::widgets;
use crate::map::scene::MapScene;
use crate::map::topology::WorldTopology;

#[derive(Debug, Clone)]
pub struct GuiConfig {
    pub data_dir: PathBuf,
    pub topology_path: PathBuf,
}

pub fn run(config: GuiConfig) -> iced::Result {
    iced::application(move || boot(config.clone()), update, view)
        .title(title)
        .theme(|_: &AppState| Theme::Dark)
        .subscription(subscription)
        .run()
}

fn boot(config: GuiConfig) -> (AppState, Task<Message>) {
    // Both of these only fail on a broken installation (bad bundled data,
    // unwritable data directory); there is nothing to recover to.
    let catalog = Catalog::bundled().expect("bundled country catalog is valid");
    let store =
        JsonFileStore::open(&config.data_dir).expect("data directory exists or can be created");

    let state = AppState::new(ViewModel::new(catalog, store));
    let load = Task::perform(WorldTopology::load(config.topology_path), |result| {
        Message::TopologyLoaded(result.map_err(|e| format!("{e:#}")))
    });
    (state, load)
}

fn title(state: &AppState) -> String {
    format!(
        "Travelmarks — {} {}",
        state.vm.active_profile().emoji,
        state.vm.active_profile().name
    )
}

/// Push the authoritative StatusMap into the map scene and invalidate the
/// cached geometry if any fill changed.
fn sync_map(state: &mut AppState) {
    if let MapState::Ready(scene) = &mut state.map {
        let changed = scene.apply_statuses(state.vm.statuses(), Instant::now());
        if !changed.is_empty() {
            state.map_cache.clear();
        }
    }
}

fn update(state: &mut AppState, message: Message) -> Task<Message> {
    match message {
        Message::TopologyLoaded(Ok(topology)) => {
            state.map = MapState::Ready(MapScene::new(&topology, state.vm.statuses()));
            state.map_cache.clear();
            Task::none()
        }
        Message::TopologyLoaded(Err(reason)) => {
            error!(%reason, "topology load failed");
            state.map = MapState::Unavailable(reason);
            Task::none()
        }

        Message::RegionActivated { id, next } => {
            if let Err(e) = state.vm.set_status(&id, next) {
                state.banner = Some(format!("Could not save change: {e:#}"));
            }
            sync_map(state);
            Task::none()
        }
        Message::CountryRowClicked(id) => {
            if let Err(e) = state.vm.cycle_status(&id) {
                state.banner = Some(format!("Could not save change: {e:#}"));
            }
            sync_map(state);
            Task::none()
        }

        Message::SearchChanged(query) => {
            state.query = query;
            Task::none()
        }
        Message::FilterChanged(filter) => {
            state.filter = filter;
            Task::none()
        }

        Message::ProfileSelected(name) => {
            state.pending_delete = None;
            if name != state.vm.active_profile_name() {
                if let Err(e) = state.vm.set_active_profile(&name) {
                    state.banner = Some(e.to_string());
                }
                sync_map(state);
            }
            Task::none()
        }
        Message::NewProfileNameChanged(name) => {
            state.new_profile_name = name;
            Task::none()
        }
        Message::NewProfileEmojiChanged(emoji) => {
            state.new_profile_emoji = emoji;
            Task::none()
        }
        Message::AddProfile => {
            let name = state.new_profile_name.clone();
            let emoji = state.new_profile_emoji.clone();
            match state.vm.add_profile(&name, &emoji) {
                Ok(()) => {
                    state.new_profile_name.clear();
                    state.new_profile_emoji.clear();
                    state.banner = None;
                    sync_map(state);
                }
                Err(e) => state.banner = Some(e.to_string()),
            }
            Task::none()
        }
        Message::DeleteRequested => {
            // The destructive call only happens after explicit confirmation.
            state.pending_delete = Some(state.vm.active_profile_name().to_string());
            Task::none()
        }
        Message::DeleteCancelled => {
            state.pending_delete = None;
            Task::none()
        }
        Message::DeleteConfirmed => {
            if let Some(name) = state.pending_delete.take() {
                match state.vm.delete_profile(&name) {
                    Ok(()) => sync_map(state),
                    Err(e) => state.banner = Some(e.to_string()),
                }
            }
            Task::none()
        }

        Message::ExportRequested => {
            let rows = state.vm.export_snapshot();
            let payload = match serde_json::to_string_pretty(&rows) {
                Ok(payload) => payload,
                Err(e) => {
                    state.banner = Some(format!("Export failed: {e}"));
                    return Task::none();
                }
            };
            let file_name = export_file_name(state.vm.active_profile_name());
            Task::perform(
                async move {
                    let Some(handle) = AsyncFileDialog::new()
                        .set_title("Export travel map")
                        .set_file_name(&file_name)
                        .add_filter("JSON", &["json"])
                        .save_file()
                        .await
                    else {
                        return Ok(None);
                    };
                    tokio::fs::write(handle.path(), payload)
                        .await
                        .map_err(|e| e.to_string())?;
                    Ok(Some(handle.path().display().to_string()))
                },
                Message::ExportFinished,
            )
        }
        Message::ExportFinished(Ok(Some(path))) => {
            info!(%path, "snapshot exported");
            state.banner = Some(format!("Exported to {path}"));
            Task::none()
        }
        Message::ExportFinished(Ok(None)) => Task::none(),
        Message::ExportFinished(Err(e)) => {
            state.banner = Some(format!("Export failed: {e}"));
            Task::none()
        }

        Message::ImportRequested => Task::perform(
            async {
                let handle = AsyncFileDialog::new()
                    .set_title("Import travel map")
                    .add_filter("JSON", &["json"])
                    .pick_file()
                    .await?;
                Some(
                    tokio::fs::read_to_string(handle.path())
                        .await
                        .map_err(|e| e.to_string()),
                )
            },
            Message::ImportLoaded,
        ),
        Message::ImportLoaded(None) => Task::none(),
        Message::ImportLoaded(Some(Err(e))) => {
            state.banner = Some(format!("Import failed: {e}"));
            Task::none()
        }
        Message::ImportLoaded(Some(Ok(raw))) => {
            match state.vm.import_snapshot(&raw) {
                Ok(()) => {
                    state.banner = None;
                    sync_map(state);
                }
                Err(e) => state.banner = Some(format!("Import failed: {e}")),
            }
            Task::none()
        }

        Message::FadeTick => {
            if let MapState::Ready(scene) = &mut state.map {
                state.map_cache.clear();
                let now = Instant::now();
                if !scene.has_active_fades(now) {
                    scene.prune_fades(now);
                }
            }
            Task::none()
        }
        Message::DismissBanner => {
            state.banner = None;
            Task::none()
        }
    }
}

fn subscription(state: &AppState) -> Subscription<Message> {
    match &state.map {
        MapState::Ready(scene) if scene.has_active_fades(Instant::now()) => {
            iced::time::every(Duration::from_millis(16)).map(|_| Message::FadeTick)
        }
        _ => Subscription::none(),
    }
}

fn view(state: &AppState) -> Element<'_, Message> {
    let mut page = column![widgets::profile_bar(state)];
    if let Some(message) = &state.banner {
        page = page.push(widgets::banner(message));
    }
    page.push(
        row![widgets::sidebar(state), widgets::map_panel(state)]
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .into()
}
