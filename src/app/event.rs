//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a reader thread that
//! forwards them over a channel so the frame loop stays non-blocking.
//! Frame pacing is the loop's job; the reader only reports input.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// How long one poll waits before checking whether the receiver is gone.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Translate a crossterm event; key releases and repeats-as-release on
/// some platforms are dropped.
pub fn translate(ev: CtEvent) -> Option<AppEvent> {
    match ev {
        CtEvent::Key(k) if k.kind != KeyEventKind::Release => Some(AppEvent::Key(k)),
        CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
        CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

/// Spawns a thread that reads terminal events and sends them through the
/// returned channel.  The thread exits once the receiver is dropped.
pub fn spawn_event_reader() -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                tracing::warn!("terminal poll failed: {e}");
                break;
            }
        }
        match event::read() {
            Ok(ev) => {
                if let Some(app_event) = translate(ev) {
                    if tx.send(app_event).is_err() {
                        break; // receiver dropped
                    }
                }
            }
            Err(e) => tracing::debug!("terminal read failed: {e}"),
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn drops_key_releases() {
        let press = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert!(matches!(translate(CtEvent::Key(press)), Some(AppEvent::Key(_))));
        assert!(translate(CtEvent::Key(release)).is_none());
        assert!(matches!(translate(CtEvent::Resize(80, 24)), Some(AppEvent::Resize(80, 24))));
        assert!(translate(CtEvent::FocusGained).is_none());
    }
}
