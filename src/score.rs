use crate::errors::ScoreError;
use crate::session::Attempt;

/// Metrics of one completed attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultMetrics {
    pub words_per_minute: u32,
    pub accuracy: f64,
}

/// Number of words in `typed`: space separated, empty tokens dropped.
pub fn words_typed(typed: &str) -> usize {
    typed.split(' ').filter(|w| !w.is_empty()).count()
}

pub fn words_per_minute(words: usize, elapsed_secs: f64) -> Result<u32, ScoreError> {
    if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
        return Err(ScoreError::NonPositiveElapsed(elapsed_secs));
    }

    let wpm = (words as f64 / (elapsed_secs / 60.0)).trunc();
    // `as` saturates, so absurdly short attempts cap at u32::MAX
    Ok(wpm as u32)
}

/// Percentage of positions in `original` matched by `typed`.
///
/// Characters are compared as Unicode scalar values. Typed characters past
/// the end of `original` are ignored; missing ones simply do not count.
pub fn accuracy(original: &str, typed: &str) -> Result<f64, ScoreError> {
    let total = original.chars().count();
    if total == 0 {
        return Err(ScoreError::EmptyOriginal);
    }

    let correct = original
        .chars()
        .zip(typed.chars())
        .filter(|(expected, actual)| expected == actual)
        .count();

    Ok(correct as f64 / total as f64 * 100.0)
}

pub fn compute(original: &str, typed: &str, elapsed_secs: f64) -> Result<ResultMetrics, ScoreError> {
    let words_per_minute = words_per_minute(words_typed(typed), elapsed_secs)?;
    let accuracy = accuracy(original, typed)?;

    Ok(ResultMetrics {
        words_per_minute,
        accuracy,
    })
}

/// Score a collected attempt against its own prompt.
pub fn score_attempt(attempt: &Attempt) -> Result<ResultMetrics, ScoreError> {
    compute(&attempt.prompt, &attempt.typed, attempt.elapsed_secs())
}
