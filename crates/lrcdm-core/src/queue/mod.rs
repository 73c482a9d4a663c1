//! The bulk download queue.
//!
//! Coordinates the pending store, the single cooperative worker, the stats
//! window, the bounded audit log, and write-through history persistence
//! behind the `QueueManager` facade.

pub mod history;
pub mod log;
pub mod manager;
pub mod stats;
pub mod store;
mod worker;

pub use history::{HistoryStore, SavedHistory};
pub use log::{BoundedLog, LogEntry, LogStatus, LOG_CAPACITY};
pub use manager::{QueueEvent, QueueManager, QueueSnapshot};
pub use stats::{CompletionWindow, WINDOW_CAPACITY};
pub use store::{QueueState, RunState};

#[cfg(test)]
mod tests;
