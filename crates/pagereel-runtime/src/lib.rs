#![forbid(unsafe_code)]

//! pagereel runtime
//!
//! The pieces that give the core types a lifetime on a page.
//!
//! # Key Components
//!
//! - [`Observable`] - Shared, version-tracked state cell with change notification
//! - [`CancellationSource`] / [`CancellationToken`] - Cooperative cancellation
//! - [`CancelGuard`] - Cancels its source when dropped
//! - [`Scheduler`] - Repeating-task primitive
//! - [`ThreadScheduler`] - One background thread per task
//! - [`ManualScheduler`] - Host-advanced, deterministic, no threads
//! - `PageConfig` - Page configuration loaded from TOML or JSON (`page-config` feature)
//!
//! # Role in pagereel
//! Components in `pagereel-widgets` are plain state machines. The runtime
//! owns the things that outlive a single call: the active-section cell read
//! by the navigation renderer, and the timers that advance the headline
//! rotator. Scheduled tasks never touch component state directly; they
//! produce messages that the page coordinator drains on its own thread.

pub mod cancellation;
pub mod config;
pub mod reactive;
pub mod scheduler;

pub use cancellation::{CancelGuard, CancellationSource, CancellationToken};
pub use config::{
    NavEntryConfig, PageConfig, RotatorConfig, SectionLayoutConfig, TrackerConfig, ViewportConfig,
};
#[cfg(feature = "page-config")]
pub use config::PageConfigError;
pub use reactive::{Observable, Subscription};
pub use scheduler::{ManualScheduler, MsgFactory, Scheduler, TaskId, ThreadScheduler};
