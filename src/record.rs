use serde::{Deserialize, Serialize};
use std::fmt;

use crate::score::ResultMetrics;

/// One persisted outcome of a typing attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    // aliases keep files written by the older PascalCase format loadable
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "WordsPerMinute")]
    pub words_per_minute: u32,
    #[serde(alias = "Accuracy")]
    pub accuracy: f64,
}

impl ResultRecord {
    pub fn new(name: impl Into<String>, words_per_minute: u32, accuracy: f64) -> Self {
        Self {
            name: name.into(),
            words_per_minute,
            accuracy,
        }
    }

    pub fn from_metrics(name: impl Into<String>, metrics: ResultMetrics) -> Self {
        Self::new(name, metrics.words_per_minute, metrics.accuracy)
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} WPM, Accuracy: {:.2}%",
            self.name, self.words_per_minute, self.accuracy
        )
    }
}
