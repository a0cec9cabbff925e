pub mod controller;
pub mod history;
pub mod state;
pub mod stats;
mod worker;

pub use controller::{EmotionStream, StreamSnapshot, TickOutcome};
pub use history::{EmotionHistory, EmotionSeries, Sample};
pub use state::StreamStatus;
pub use stats::SessionStats;
