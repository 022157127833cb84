//! L4 Atomic Layer: Marquee options
//!
//! Partial options supplied by callers and the fully resolved set the engine
//! runs with.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default autoscroll advance, in units per frame
pub const DEFAULT_SPEED: f64 = 1.0;

/// Default spacing between consecutive items, in units
pub const DEFAULT_GAP: f64 = 20.0;

/// Autoscroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Content travels toward the left edge (position increases)
    #[default]
    #[serde(rename = "left", alias = "forward")]
    Forward,
    /// Content travels toward the right edge (position decreases)
    #[serde(rename = "right", alias = "reverse")]
    Reverse,
}

impl Direction {
    /// Sign applied to the autoscroll speed
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// Short label used by hosts
    pub fn label(self) -> &'static str {
        match self {
            Direction::Forward => "left",
            Direction::Reverse => "right",
        }
    }
}

/// Caller-supplied options. `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarqueeOptions {
    pub direction: Option<Direction>,
    pub gap: Option<f64>,
    pub pause_on_hover: Option<bool>,
    pub speed: Option<f64>,
}

impl MarqueeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn gap(mut self, gap: f64) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn pause_on_hover(mut self, pause_on_hover: bool) -> Self {
        self.pause_on_hover = Some(pause_on_hover);
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// Fully populated options
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedOptions {
    pub direction: Direction,
    pub gap: f64,
    pub pause_on_hover: bool,
    pub speed: f64,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Forward,
            gap: DEFAULT_GAP,
            pause_on_hover: true,
            speed: DEFAULT_SPEED,
        }
    }
}

impl ResolvedOptions {
    /// Resolve a partial set against the defaults
    pub fn resolve(partial: &MarqueeOptions) -> Self {
        let mut resolved = Self::default();
        resolved.merge(partial);
        resolved
    }

    /// Merge explicit values over the current ones.
    ///
    /// Returns `true` when the gap changed, since that invalidates measured
    /// widths. Non-finite numbers are ignored and a negative gap is clamped
    /// to zero.
    pub fn merge(&mut self, partial: &MarqueeOptions) -> bool {
        let previous_gap = self.gap;

        if let Some(direction) = partial.direction {
            self.direction = direction;
        }
        if let Some(pause_on_hover) = partial.pause_on_hover {
            self.pause_on_hover = pause_on_hover;
        }
        if let Some(speed) = partial.speed {
            if speed.is_finite() {
                self.speed = speed;
            } else {
                warn!("Ignoring non-finite marquee speed: {}", speed);
            }
        }
        if let Some(gap) = partial.gap {
            if gap.is_finite() {
                self.gap = gap.max(0.0);
            } else {
                warn!("Ignoring non-finite marquee gap: {}", gap);
            }
        }

        self.gap != previous_gap
    }

    /// Signed autoscroll advance for one frame.
    /// The sign of `speed` is ignored; `direction` decides it.
    #[inline]
    pub fn autoscroll_delta(&self) -> f64 {
        self.speed.abs() * self.direction.sign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ResolvedOptions::default();
        assert_eq!(options.direction, Direction::Forward);
        assert_eq!(options.gap, 20.0);
        assert!(options.pause_on_hover);
        assert_eq!(options.speed, 1.0);
    }

    #[test]
    fn test_merge_keeps_omitted_fields() {
        let mut options = ResolvedOptions::resolve(&MarqueeOptions::new().speed(3.0).gap(8.0));
        let gap_changed = options.merge(&MarqueeOptions::new().direction(Direction::Reverse));

        assert!(!gap_changed);
        assert_eq!(options.direction, Direction::Reverse);
        assert_eq!(options.speed, 3.0);
        assert_eq!(options.gap, 8.0);
    }

    #[test]
    fn test_merge_reports_gap_change() {
        let mut options = ResolvedOptions::default();
        assert!(options.merge(&MarqueeOptions::new().gap(40.0)));
        assert!(!options.merge(&MarqueeOptions::new().gap(40.0)));
    }

    #[test]
    fn test_merge_sanitizes_numbers() {
        let mut options = ResolvedOptions::default();
        options.merge(&MarqueeOptions::new().gap(-5.0).speed(f64::NAN));
        assert_eq!(options.gap, 0.0);
        assert_eq!(options.speed, DEFAULT_SPEED);
    }

    #[test]
    fn test_autoscroll_delta_uses_magnitude() {
        let mut options = ResolvedOptions::default();
        options.merge(&MarqueeOptions::new().speed(-2.0));
        assert_eq!(options.autoscroll_delta(), 2.0);

        options.merge(&MarqueeOptions::new().direction(Direction::Reverse));
        assert_eq!(options.autoscroll_delta(), -2.0);
    }

    #[test]
    fn test_direction_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            direction: Direction,
        }

        let parsed: Wrapper = toml::from_str("direction = \"right\"").unwrap();
        assert_eq!(parsed.direction, Direction::Reverse);
        let parsed: Wrapper = toml::from_str("direction = \"forward\"").unwrap();
        assert_eq!(parsed.direction, Direction::Forward);
    }
}
