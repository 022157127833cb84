use std::str::FromStr;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::info;

use marquee_core::config::MarqueeConfig;
use marquee_core::headless::HeadlessMarquee;
use marquee_core::marquee::{
    BuildOutcome, Direction, InputEvent, Marquee, MarqueeSnapshot, ResolvedOptions,
};
use marquee_core::AppConfig;

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Number of frames to trace
    #[arg(short = 'n', long, default_value_t = 60)]
    pub frames: usize,

    /// Viewport width in units
    #[arg(short = 'w', long, default_value_t = 300.0)]
    pub width: f64,

    /// Item widths, comma separated
    #[arg(short = 'i', long, value_delimiter = ',', default_value = "80,120,60")]
    pub items: Vec<f64>,

    /// Advance per frame (defaults to the configured speed)
    #[arg(long)]
    pub speed: Option<f64>,

    /// Spacing between items (defaults to the configured gap)
    #[arg(long, allow_negative_numbers = true)]
    pub gap: Option<f64>,

    /// Autoscroll direction (defaults to the configured direction)
    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Keep autoscrolling while hovered
    #[arg(long)]
    pub no_hover_pause: bool,

    /// Hold the pointer over the viewport for the whole run
    #[arg(long)]
    pub hover: bool,

    /// Scripted drag as START:DISTANCE:FRAMES, e.g. 10:-120:4
    #[arg(long, value_name = "START:DISTANCE:FRAMES", allow_hyphen_values = true)]
    pub drag: Option<DragScript>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Left,
    Right,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Left => Direction::Forward,
            DirectionArg::Right => Direction::Reverse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// A drag that starts before frame `start`, moves the pointer by
/// `distance` spread evenly over `frames` frames, then releases
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragScript {
    pub start: usize,
    pub distance: f64,
    pub frames: usize,
}

impl DragScript {
    /// Pointer events delivered before the given frame
    fn events_before(&self, frame: usize) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let start = self.start.max(1);
        let end = start + self.frames;

        if frame == start {
            events.push(InputEvent::PointerDown { x: 0.0 });
        }
        if frame >= start && frame < end {
            let step = self.distance / self.frames as f64;
            let x = step * (frame - start + 1) as f64;
            events.push(InputEvent::PointerMove { x });
        }
        if frame == end {
            events.push(InputEvent::PointerUp);
        }
        events
    }
}

impl FromStr for DragScript {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [start, distance, frames] = parts.as_slice() else {
            return Err(format!("expected START:DISTANCE:FRAMES, got '{}'", s));
        };

        let start = start
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid start frame '{}': {}", start, e))?;
        let distance = distance
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid distance '{}': {}", distance, e))?;
        let frames = frames
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid frame count '{}': {}", frames, e))?;

        if !distance.is_finite() {
            return Err("distance must be finite".to_string());
        }
        if frames == 0 {
            return Err("drag must last at least one frame".to_string());
        }

        Ok(Self {
            start,
            distance,
            frames,
        })
    }
}

/// Full result of a headless run
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub options: ResolvedOptions,
    pub viewport_width: f64,
    pub item_widths: Vec<f64>,
    pub outcome: &'static str,
    pub loop_length: f64,
    pub instances: usize,
    pub frames: Vec<MarqueeSnapshot>,
}

pub fn run(config: &AppConfig, args: &SimulateArgs) -> Result<()> {
    if !args.width.is_finite() || args.width < 0.0 {
        bail!("viewport width must be a non-negative number");
    }

    let trace = simulate(&config.marquee, args);
    info!(
        "Simulated {} frames, loop length {}",
        trace.frames.len(),
        trace.loop_length
    );

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&trace)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trace)?),
    }
    Ok(())
}

/// Drive a headless marquee for `args.frames` frames. The first entry is the
/// frame run synchronously on construction.
pub fn simulate(base: &MarqueeConfig, args: &SimulateArgs) -> Trace {
    let mut options = base.to_options();
    if let Some(speed) = args.speed {
        options = options.speed(speed);
    }
    if let Some(gap) = args.gap {
        options = options.gap(gap);
    }
    if let Some(direction) = args.direction {
        options = options.direction(direction.into());
    }
    if args.no_hover_pause {
        options = options.pause_on_hover(false);
    }

    let mut marquee: HeadlessMarquee = Marquee::headless(args.width, &args.items, options);
    let mut frames = Vec::with_capacity(args.frames);

    if args.frames > 0 {
        frames.push(marquee.snapshot());
    }
    if args.hover {
        marquee.handle_input(InputEvent::PointerEnter);
    }

    for frame in 1..args.frames {
        if let Some(drag) = &args.drag {
            for event in drag.events_before(frame) {
                marquee.handle_input(event);
            }
        }
        if !marquee.advance_frame() {
            break;
        }
        frames.push(marquee.snapshot());
    }

    Trace {
        options: *marquee.options(),
        viewport_width: args.width,
        item_widths: args.items.clone(),
        outcome: outcome_label(marquee.build_outcome()),
        loop_length: marquee.loop_length(),
        instances: marquee.strip().len(),
        frames,
    }
}

fn outcome_label(outcome: BuildOutcome) -> &'static str {
    match outcome {
        BuildOutcome::Empty => "empty",
        BuildOutcome::Degenerate => "degenerate",
        BuildOutcome::Complete => "complete",
        BuildOutcome::Truncated => "truncated",
    }
}

fn render_text(trace: &Trace) -> String {
    let mut out = format!(
        "viewport {} | items {} | gap {} | speed {} {} | loop {} | {} instances ({})\n",
        trace.viewport_width,
        trace.item_widths.len(),
        trace.options.gap,
        trace.options.speed,
        trace.options.direction.label(),
        trace.loop_length,
        trace.instances,
        trace.outcome,
    );

    for snapshot in &trace.frames {
        let flags = match (snapshot.dragging, snapshot.hovered) {
            (true, true) => " dragging hovered",
            (true, false) => " dragging",
            (false, true) => " hovered",
            (false, false) => "",
        };
        out.push_str(&format!(
            "frame {:>5}  pos {:>10.3}  vel {:>8.3}  {:<7}{}\n",
            snapshot.frame,
            snapshot.position,
            snapshot.velocity,
            snapshot.step.unwrap_or("-"),
            flags
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SimulateArgs,
    }

    fn parse(argv: &[&str]) -> SimulateArgs {
        let mut full = vec!["simulate"];
        full.extend_from_slice(argv);
        TestCli::parse_from(full).args
    }

    fn base() -> MarqueeConfig {
        MarqueeConfig {
            speed: 1.0,
            gap: 20.0,
            ..MarqueeConfig::default()
        }
    }

    #[test]
    fn test_parse_defaults() {
        let args = parse(&[]);
        assert_eq!(args.frames, 60);
        assert_eq!(args.width, 300.0);
        assert_eq!(args.items, vec![80.0, 120.0, 60.0]);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.drag.is_none());
    }

    #[test]
    fn test_parse_drag_script() {
        let args = parse(&["--drag", "5:-40:4", "--direction", "right", "--format", "json"]);
        assert_eq!(
            args.drag,
            Some(DragScript {
                start: 5,
                distance: -40.0,
                frames: 4
            })
        );
        assert_eq!(args.direction, Some(DirectionArg::Right));
        assert_eq!(args.format, OutputFormat::Json);

        assert!("1:2".parse::<DragScript>().is_err());
        assert!("1:x:2".parse::<DragScript>().is_err());
        assert!("1:10:0".parse::<DragScript>().is_err());
    }

    #[test]
    fn test_autoscroll_trace() {
        let args = parse(&["-n", "5", "-w", "100", "-i", "50,50"]);
        let trace = simulate(&base(), &args);

        // (50 + 20) * 2 = 140 per set; two sets clear 100 + 100
        assert_eq!(trace.loop_length, 280.0);
        assert_eq!(trace.outcome, "complete");
        let positions: Vec<f64> = trace.frames.iter().map(|f| f.position).collect();
        assert_eq!(positions, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(trace.frames.iter().all(|f| f.step == Some("auto")));
    }

    #[test]
    fn test_hover_holds_position() {
        let args = parse(&["-n", "4", "--hover"]);
        let trace = simulate(&base(), &args);
        let positions: Vec<f64> = trace.frames.iter().map(|f| f.position).collect();
        assert_eq!(positions, vec![1.0, 1.0, 1.0, 1.0]);

        let args = parse(&["-n", "4", "--hover", "--no-hover-pause"]);
        let trace = simulate(&base(), &args);
        assert_eq!(trace.frames.last().map(|f| f.position), Some(4.0));
    }

    #[test]
    fn test_drag_then_inertia() {
        let args = parse(&["-n", "8", "--speed", "0", "--drag", "2:-30:3"]);
        let trace = simulate(&base(), &args);

        let steps: Vec<&str> = trace.frames.iter().map(|f| f.step.unwrap_or("-")).collect();
        assert_eq!(
            steps,
            vec!["auto", "auto", "drag", "drag", "drag", "inertia", "inertia", "inertia"]
        );
        // Three moves of -10 each push the strip forward by 30
        assert_eq!(trace.frames[4].position, 30.0);
        assert!(trace.frames[5].position > 30.0);
        assert!(trace.frames[7].velocity.abs() < 10.0);
    }

    #[test]
    fn test_empty_items_stop_cleanly() {
        let mut args = parse(&["-n", "3"]);
        args.items.clear();
        let trace = simulate(&base(), &args);
        assert_eq!(trace.outcome, "empty");
        assert_eq!(trace.loop_length, 0.0);
        assert_eq!(trace.instances, 0);
        assert_eq!(trace.frames.len(), 3);
    }

    #[test]
    fn test_text_and_json_output() {
        let args = parse(&["-n", "2"]);
        let trace = simulate(&base(), &args);

        let text = render_text(&trace);
        assert!(text.starts_with("viewport 300 | items 3"));
        assert_eq!(text.lines().count(), 3);

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&trace).unwrap()).unwrap();
        assert_eq!(json["options"]["direction"], "left");
        assert_eq!(json["frames"].as_array().map(|f| f.len()), Some(2));
    }
}
