mod renderer;
mod state;
pub mod table;
pub mod theme;

pub use renderer::render;
pub use state::{AppState, InputMode};
pub use theme::Theme;
