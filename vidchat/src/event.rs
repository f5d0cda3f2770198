//! Event bus for vidchat.
//!
//! Terminal input, timer ticks, finished backend calls, and file reads all arrive
//! as an [`AppEvent`] on one unbounded channel owned by the main loop. Backend
//! completions get here through a [`vidchat_core::Dispatcher<AppEvent>`], which
//! relies on the `From<Completion>` impl below.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use vidchat_core::{Completion, VideoUpload};

#[derive(Debug)]
pub enum AppEvent {
    /// Key press. Release and repeat events are dropped in [`spawn_event_task`].
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// Logic tick (250 ms); ages the status-bar message.
    Tick,
    /// Render tick (33 ms).
    Render,
    /// A backend call finished.
    Completion(Box<Completion>),
    /// The file named in the path prompt was read, or the read failed.
    FileLoaded(Result<VideoUpload, String>),
}

impl From<Completion> for AppEvent {
    fn from(completion: Completion) -> Self {
        AppEvent::Completion(Box::new(completion))
    }
}

/// Both ends of the event channel. `tx` is cloned into every producer.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the task that turns crossterm input and the two timers into events.
///
/// The crossterm future is fused so a terminated stream is never polled again.
/// The task stops once the receiving side is gone.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(250));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let event = tokio::select! {
                _ = tick_interval.tick() => Some(AppEvent::Tick),
                _ = render_interval.tick() => Some(AppEvent::Render),
                maybe_event = reader.next().fuse() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        Some(AppEvent::Key(key))
                    }
                    Some(Ok(Event::Resize(w, h))) => Some(AppEvent::Resize(w, h)),
                    Some(Ok(Event::Mouse(mouse))) => Some(AppEvent::Mouse(mouse)),
                    _ => None,
                },
            };
            if let Some(event) = event {
                if tx.send(event).is_err() {
                    break;
                }
            }
        }
    });
}
