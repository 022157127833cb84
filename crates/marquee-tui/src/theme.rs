use ratatui::style::Color;

/// Runtime theme
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey: Color,

    // Semantic colors
    pub accent: Color,
    pub active: Color,
    pub warning: Color,

    /// Chip backgrounds, indexed by `Chip::tone`
    pub chips: Vec<Color>,
    /// Label color drawn on chips
    pub chip_fg: Color,
}

impl Theme {
    /// Background for a chip tone
    pub fn chip_bg(&self, tone: usize) -> Color {
        if self.chips.is_empty() {
            self.bg2
        } else {
            self.chips[tone % self.chips.len()]
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        crate::themes::gruvbox_dark()
    }
}
