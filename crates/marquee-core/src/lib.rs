pub mod config;
pub mod error;
pub mod headless;
pub mod marquee;

pub use config::{AppConfig, MarqueeConfig};
pub use error::{Error, Result};
pub use marquee::{Direction, Marquee, MarqueeOptions};
