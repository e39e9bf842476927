use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Write};

use crate::record::ResultRecord;
use crate::score::ResultMetrics;

/// Keeps the terminal in raw mode until dropped.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

pub fn write_welcome<W: Write>(w: &mut W, name: &str) -> io::Result<()> {
    writeln!(w, "Welcome, {name}! Press any key to start typing test.")?;
    w.flush()
}

pub fn write_prompt<W: Write>(w: &mut W, text: &str) -> io::Result<()> {
    queue!(w, Clear(ClearType::All), MoveTo(0, 0))?;
    writeln!(w, "Type the following text:\n{text}")?;
    w.flush()
}

/// Echo one accepted character in red.
pub fn echo_typed<W: Write>(w: &mut W, c: char) -> io::Result<()> {
    queue!(w, SetForegroundColor(Color::Red), Print(c), ResetColor)?;
    w.flush()
}

pub fn write_results<W: Write>(w: &mut W, name: &str, metrics: &ResultMetrics) -> io::Result<()> {
    writeln!(w, "Results for {name}:")?;
    writeln!(w, "Words per minute: {} WPM", metrics.words_per_minute)?;
    writeln!(w, "Accuracy: {:.2}%", metrics.accuracy)
}

pub fn write_leaderboard<W: Write>(w: &mut W, records: &[ResultRecord]) -> io::Result<()> {
    writeln!(w, "Leaderboard:")?;
    for record in records {
        writeln!(w, "{record}")?;
    }
    w.flush()
}
