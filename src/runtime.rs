use std::io;
use std::sync::mpsc::Receiver;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind};
use tracing::debug;

use crate::session::{Attempt, KeyOutcome, TypingSession};

/// Source of key presses. `None` means the source is exhausted.
pub trait KeyEventSource {
    /// Block until the next key press arrives.
    fn next_key(&self) -> Option<KeyEvent>;
}

/// Production key source reading crossterm events directly
#[derive(Debug, Default)]
pub struct CrosstermEventSource;

impl CrosstermEventSource {
    pub fn new() -> Self {
        Self
    }
}

impl KeyEventSource for CrosstermEventSource {
    fn next_key(&self) -> Option<KeyEvent> {
        loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => return Some(key),
                Ok(_) => {}
                Err(e) => {
                    debug!(error = %e, "terminal event stream closed");
                    return None;
                }
            }
        }
    }
}

/// Test key source fed through a channel
pub struct TestEventSource {
    rx: Receiver<KeyEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<KeyEvent>) -> Self {
        Self { rx }
    }
}

impl KeyEventSource for TestEventSource {
    fn next_key(&self) -> Option<KeyEvent> {
        self.rx.recv().ok()
    }
}

/// Block until any key is pressed. Returns false if the source ran dry.
pub fn wait_for_any_key<E: KeyEventSource>(source: &E) -> bool {
    while let Some(key) = source.next_key() {
        if key.kind != KeyEventKind::Release {
            return true;
        }
    }
    false
}

/// Block until Enter is pressed or the source runs dry.
pub fn wait_for_enter<E: KeyEventSource>(source: &E) {
    while let Some(key) = source.next_key() {
        if key.kind != KeyEventKind::Release && key.code == KeyCode::Enter {
            return;
        }
    }
}

/// Feed keys into `session` until the user submits, echoing each accepted
/// character through `echo`. An exhausted source counts as a submit.
pub fn collect_attempt<E, F>(source: &E, mut session: TypingSession, mut echo: F) -> io::Result<Attempt>
where
    E: KeyEventSource,
    F: FnMut(char) -> io::Result<()>,
{
    if !session.has_started() {
        session.start();
    }

    while let Some(key) = source.next_key() {
        match session.handle_key(&key) {
            KeyOutcome::Accepted(c) => echo(c)?,
            KeyOutcome::Ignored => {}
            KeyOutcome::Submit => break,
        }
    }

    let attempt = session.finish();
    debug!(
        typed_chars = attempt.typed.chars().count(),
        elapsed_secs = attempt.elapsed_secs(),
        "attempt collected"
    );
    Ok(attempt)
}
