mod app;
mod map_view;
mod message;
mod state;
mod widgets;

pub use app::{GuiConfig, run};
pub use message::Message;
pub use state::AppState;
