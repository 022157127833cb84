mod control_panel;
mod popup;
mod status_bar;
mod strip;

pub use control_panel::ControlPanelWidget;
pub use popup::PopupWidget;
pub use status_bar::StatusBarWidget;
pub use strip::StripWidget;
