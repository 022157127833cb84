//! Theme registry
//!
//! Built-in palettes selected by name from `ui.theme`.

use ratatui::style::Color;
use tracing::warn;

use crate::theme::Theme;

/// Names accepted by [`load_theme`]
pub const THEME_NAMES: [&str; 3] = ["gruvbox-dark", "nord", "dracula"];

/// Load a theme by name, falling back to gruvbox-dark
pub fn load_theme(name: &str) -> Theme {
    match name.trim().to_lowercase().as_str() {
        "gruvbox-dark" | "gruvbox" => gruvbox_dark(),
        "nord" => nord(),
        "dracula" => dracula(),
        other => {
            warn!("Unknown theme '{}', using gruvbox-dark", other);
            gruvbox_dark()
        }
    }
}

/// Gruvbox Material dark
pub fn gruvbox_dark() -> Theme {
    Theme {
        bg0: Color::Rgb(0x28, 0x28, 0x28),
        bg1: Color::Rgb(0x32, 0x30, 0x2f),
        bg2: Color::Rgb(0x45, 0x40, 0x3d),
        fg0: Color::Rgb(0xd4, 0xbe, 0x98),
        fg1: Color::Rgb(0xdd, 0xc7, 0xa1),
        grey: Color::Rgb(0x92, 0x83, 0x74),
        accent: Color::Rgb(0x89, 0xb4, 0x82),
        active: Color::Rgb(0xa9, 0xb6, 0x65),
        warning: Color::Rgb(0xe7, 0x8a, 0x4e),
        chips: vec![
            Color::Rgb(0xea, 0x69, 0x62),
            Color::Rgb(0xd8, 0xa6, 0x57),
            Color::Rgb(0xa9, 0xb6, 0x65),
            Color::Rgb(0x7d, 0xae, 0xa3),
            Color::Rgb(0xd3, 0x86, 0x9b),
        ],
        chip_fg: Color::Rgb(0x1d, 0x20, 0x21),
    }
}

/// Nord (https://www.nordtheme.com/)
pub fn nord() -> Theme {
    Theme {
        bg0: Color::Rgb(0x2e, 0x34, 0x40), // nord0
        bg1: Color::Rgb(0x3b, 0x42, 0x52), // nord1
        bg2: Color::Rgb(0x43, 0x4c, 0x5e), // nord2
        fg0: Color::Rgb(0xec, 0xef, 0xf4), // nord6
        fg1: Color::Rgb(0xe5, 0xe9, 0xf0), // nord5
        grey: Color::Rgb(0x61, 0x6e, 0x88),
        accent: Color::Rgb(0x88, 0xc0, 0xd0), // nord8
        active: Color::Rgb(0xa3, 0xbe, 0x8c), // nord14
        warning: Color::Rgb(0xd0, 0x87, 0x70), // nord12
        chips: vec![
            Color::Rgb(0x8f, 0xbc, 0xbb), // nord7
            Color::Rgb(0x81, 0xa1, 0xc1), // nord9
            Color::Rgb(0xeb, 0xcb, 0x8b), // nord13
            Color::Rgb(0xb4, 0x8e, 0xad), // nord15
        ],
        chip_fg: Color::Rgb(0x2e, 0x34, 0x40),
    }
}

/// Dracula (https://draculatheme.com/)
pub fn dracula() -> Theme {
    Theme {
        bg0: Color::Rgb(0x28, 0x2a, 0x36),
        bg1: Color::Rgb(0x34, 0x37, 0x46),
        bg2: Color::Rgb(0x44, 0x47, 0x5a),
        fg0: Color::Rgb(0xf8, 0xf8, 0xf2),
        fg1: Color::Rgb(0xe2, 0xe2, 0xdc),
        grey: Color::Rgb(0x62, 0x72, 0xa4),
        accent: Color::Rgb(0xbd, 0x93, 0xf9),
        active: Color::Rgb(0x50, 0xfa, 0x7b),
        warning: Color::Rgb(0xff, 0xb8, 0x6c),
        chips: vec![
            Color::Rgb(0xff, 0x79, 0xc6),
            Color::Rgb(0x8b, 0xe9, 0xfd),
            Color::Rgb(0xf1, 0xfa, 0x8c),
            Color::Rgb(0xbd, 0x93, 0xf9),
        ],
        chip_fg: Color::Rgb(0x28, 0x2a, 0x36),
    }
}
