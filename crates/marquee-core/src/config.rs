use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::marquee::{Direction, MarqueeOptions};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub marquee: MarqueeConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Initial marquee options. Units are whatever the host measures in
/// (terminal cells for the TUI).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarqueeConfig {
    /// "left" or "right"
    #[serde(default)]
    pub direction: Direction,
    /// Spacing between items
    #[serde(default = "default_gap")]
    pub gap: f64,
    /// Hold autoscroll while the pointer is over the strip
    #[serde(default = "default_true")]
    pub pause_on_hover: bool,
    /// Advance per frame
    #[serde(default = "default_speed")]
    pub speed: f64,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            gap: default_gap(),
            pause_on_hover: default_true(),
            speed: default_speed(),
        }
    }
}

impl MarqueeConfig {
    /// Every field set explicitly
    pub fn to_options(&self) -> MarqueeOptions {
        MarqueeOptions::new()
            .direction(self.direction)
            .gap(self.gap)
            .pause_on_hover(self.pause_on_hover)
            .speed(self.speed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Frames per second driving the marquee
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Theme name (e.g., "gruvbox-dark", "nord", "dracula")
    #[serde(default = "default_theme_name")]
    pub theme: String,
    /// Labels shown in the strip
    #[serde(default = "default_items")]
    pub items: Vec<String>,
    /// Speed slider step
    #[serde(default = "default_speed_step")]
    pub speed_step: f64,
    /// Gap slider step
    #[serde(default = "default_gap_step")]
    pub gap_step: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            theme: default_theme_name(),
            items: default_items(),
            speed_step: default_speed_step(),
            gap_step: default_gap_step(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "q", "+", "<C-c>" (Ctrl+c), "<S-Tab>" (Shift+Tab), "<Space>", "<Esc>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Toggle autoscroll (speed 0 while off; drag still works)
    #[serde(default = "default_key_toggle_play")]
    pub toggle_play: String,
    /// Suspend or resume the whole frame loop
    #[serde(default = "default_key_toggle_loop")]
    pub toggle_loop: String,
    #[serde(default = "default_key_speed_up")]
    pub speed_up: String,
    #[serde(default = "default_key_speed_down")]
    pub speed_down: String,
    #[serde(default = "default_key_gap_up")]
    pub gap_up: String,
    #[serde(default = "default_key_gap_down")]
    pub gap_down: String,
    #[serde(default = "default_key_toggle_direction")]
    pub toggle_direction: String,
    #[serde(default = "default_key_toggle_hover_pause")]
    pub toggle_hover_pause: String,
    /// Tear the marquee down and attach a fresh one
    #[serde(default = "default_key_reset")]
    pub reset: String,
    #[serde(default = "default_key_help")]
    pub help: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            toggle_play: default_key_toggle_play(),
            toggle_loop: default_key_toggle_loop(),
            speed_up: default_key_speed_up(),
            speed_down: default_key_speed_down(),
            gap_up: default_key_gap_up(),
            gap_down: default_key_gap_down(),
            toggle_direction: default_key_toggle_direction(),
            toggle_hover_pause: default_key_toggle_hover_pause(),
            reset: default_key_reset(),
            help: default_key_help(),
        }
    }
}

// Default keymap values (Vim-style notation)
fn default_key_quit() -> String { "q".to_string() }
fn default_key_toggle_play() -> String { "<Space>".to_string() }
fn default_key_toggle_loop() -> String { "p".to_string() }
fn default_key_speed_up() -> String { "l".to_string() }
fn default_key_speed_down() -> String { "h".to_string() }
fn default_key_gap_up() -> String { "k".to_string() }
fn default_key_gap_down() -> String { "j".to_string() }
fn default_key_toggle_direction() -> String { "d".to_string() }
fn default_key_toggle_hover_pause() -> String { "H".to_string() }
fn default_key_reset() -> String { "r".to_string() }
fn default_key_help() -> String { "?".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marquee")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_gap() -> f64 {
    4.0
}

fn default_speed() -> f64 {
    0.5
}

fn default_frame_rate() -> u32 {
    30
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

fn default_items() -> Vec<String> {
    [
        "Aurora", "Basalt", "Cirrus", "Delta", "Ember", "Fjord", "Glacier", "Harbor",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_speed_step() -> f64 {
    0.1
}

fn default_gap_step() -> f64 {
    4.0
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from an explicit path, defaults when missing
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse TOML content
    pub fn parse(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Serialize as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to an explicit path, creating parent directories
    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/marquee/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("marquee")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("marquee.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.marquee.direction, Direction::Forward);
        assert_eq!(config.marquee.gap, 4.0);
        assert!(config.marquee.pause_on_hover);
        assert_eq!(config.ui.frame_rate, 30);
        assert_eq!(config.ui.items.len(), 8);
        assert_eq!(config.keymap.quit, "q");
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::parse(
            r#"
            [marquee]
            direction = "right"
            speed = 2.5

            [ui]
            items = ["one", "two"]
            "#,
        )
        .unwrap();

        assert_eq!(config.marquee.direction, Direction::Reverse);
        assert_eq!(config.marquee.speed, 2.5);
        assert_eq!(config.marquee.gap, 4.0);
        assert_eq!(config.ui.items, vec!["one", "two"]);
        assert_eq!(config.ui.theme, "gruvbox-dark");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::parse("[marquee\nspeed = ").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_to_options_sets_every_field() {
        let options = MarqueeConfig::default().to_options();
        assert_eq!(options.direction, Some(Direction::Forward));
        assert_eq!(options.gap, Some(4.0));
        assert_eq!(options.pause_on_hover, Some(true));
        assert_eq!(options.speed, Some(0.5));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = AppConfig::default();
        config.marquee.direction = Direction::Reverse;
        let text = config.to_toml().unwrap();
        assert!(text.contains("direction = \"right\""));

        let parsed = AppConfig::parse(&text).unwrap();
        assert_eq!(parsed.marquee.direction, Direction::Reverse);
    }

    #[test]
    fn test_expand_tilde_passthrough() {
        let path = PathBuf::from("/var/tmp/marquee");
        assert_eq!(expand_tilde(&path), path);
    }
}
