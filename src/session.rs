use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

/// What a key press did to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    Accepted(char),
    Ignored,
    Submit,
}

/// Raw material handed to the score calculator
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub prompt: String,
    pub typed: String,
    pub elapsed: Duration,
}

impl Attempt {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// One typing test: the prompt, the characters typed so far and the clock.
#[derive(Debug, Clone)]
pub struct TypingSession {
    pub prompt: String,
    pub typed: String,
    pub started_at: Option<Instant>,
}

impl TypingSession {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            typed: String::new(),
            started_at: None,
        }
    }

    /// The clock runs from the moment the prompt is shown.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, at: Instant) {
        self.started_at = Some(at);
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Ignored;
        }

        match key.code {
            KeyCode::Enter => KeyOutcome::Submit,
            KeyCode::Char(c)
                if !c.is_control()
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.typed.push(c);
                KeyOutcome::Accepted(c)
            }
            _ => KeyOutcome::Ignored,
        }
    }

    pub fn finish(self) -> Attempt {
        self.finish_at(Instant::now())
    }

    pub fn finish_at(self, at: Instant) -> Attempt {
        let elapsed = self
            .started_at
            .map(|start| at.saturating_duration_since(start))
            .unwrap_or_default();

        Attempt {
            prompt: self.prompt,
            typed: self.typed,
            elapsed,
        }
    }
}
