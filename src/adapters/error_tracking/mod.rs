//! Error tracking adapters.
//!
//! - `BugsnagErrorTracker` - Bugsnag Notify API, delivered in the background
//! - `LogErrorTracker` - Writes reports to the log when no service is configured
//! - `RecordingErrorTracker` - Keeps reports in memory for tests

mod bugsnag;
mod logging;
mod recording;

pub use bugsnag::{BugsnagConfig, BugsnagErrorTracker};
pub use logging::LogErrorTracker;
pub use recording::RecordingErrorTracker;
