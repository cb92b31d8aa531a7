//! Refresh coordination
//!
//! The coordinator, the cache it writes, and the event plumbing it reports through.

pub mod cache;
pub mod coordinator;
pub mod core;

pub use cache::{SourceHealth, SourceStatus};
pub use coordinator::{CycleReport, RefreshCoordinator, RefreshOutcome, SourceOutcome};
pub use core::{EventSender, RefreshConfig};
