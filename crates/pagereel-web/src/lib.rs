#![forbid(unsafe_code)]

//! `pagereel-web` hosts a report page inside an embedding environment.
//!
//! Design goals:
//! - **Host-driven input**: the embedder pushes scroll, resize and layout
//!   changes; nothing here queries a DOM.
//! - **Deterministic time**: the host advances a monotonic clock explicitly,
//!   and the headline timer runs on a [`ManualScheduler`].
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! [`ManualScheduler`]: pagereel_runtime::ManualScheduler

pub mod layout_observer;
pub mod page;

use core::time::Duration;

pub use layout_observer::LayoutObserver;
pub use page::{
    PageEvent, PageFrame, PageMsg, ProgressView, ReportPage, SectionView, ShowcaseView,
};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}
