use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// How long the reader thread blocks before checking for shutdown
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Application events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse motion, button or wheel
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// The terminal lost focus
    FocusLost,
}

impl AppEvent {
    /// Map a raw terminal event, dropping the ones the app ignores
    pub fn from_terminal(event: Event) -> Option<Self> {
        match event {
            // Only key presses; crossterm also reports releases on some systems
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            Event::Mouse(mouse) => Some(Self::Mouse(mouse)),
            Event::Resize(w, h) => Some(Self::Resize(w, h)),
            Event::FocusLost => Some(Self::FocusLost),
            _ => None,
        }
    }
}

/// Terminal events read on a dedicated thread and handed to the async loop
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    /// Start the reader thread. It exits once the handler is dropped.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        thread::spawn(move || {
            if let Err(e) = read_loop(&tx) {
                warn!("Terminal event reader stopped: {}", e);
            }
            debug!("Terminal event reader exited");
        });
        Self { rx }
    }

    /// Handler fed by an existing channel
    pub fn from_receiver(rx: mpsc::UnboundedReceiver<AppEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next event. `None` once the reader is gone.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

fn read_loop(tx: &mpsc::UnboundedSender<AppEvent>) -> Result<()> {
    while !tx.is_closed() {
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Some(event) = AppEvent::from_terminal(event::read()?) {
            if tx.send(event).is_err() {
                break;
            }
        }
    }
    Ok(())
}
