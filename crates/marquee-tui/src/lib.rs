pub mod app;
pub mod event;
pub mod host;
pub mod input;
pub mod keymap;
pub mod theme;
pub mod themes;
pub mod widgets;

pub use app::App;
pub use host::{Chip, TerminalMarquee, TerminalPlatform, TerminalViewport};
pub use theme::Theme;
pub use themes::load_theme;
