// Library surface for the binary and the integration tests.
pub mod app_dirs;
pub mod config;
pub mod console;
pub mod errors;
pub mod leaderboard;
pub mod logging;
pub mod record;
pub mod runtime;
pub mod samples;
pub mod score;
pub mod session;

pub use leaderboard::{JsonFileStorage, Leaderboard, LeaderboardStorage, SortKey, SortOrder};
pub use record::ResultRecord;
pub use score::ResultMetrics;
