// SPDX-License-Identifier: Apache-2.0
//! Cooperative cancellation tokens for repeating tasks.
//!
//! [`CancellationToken`] is a thread-safe, cloneable signal that a task polls
//! (or waits on) to detect that its owner has gone away. The owner keeps the
//! [`CancellationSource`]; wrapping it in a [`CancelGuard`] ties cancellation
//! to scope exit, so every unmount path, including an early one, releases
//! the task.
//!
//! # Example
//!
//! ```
//! use pagereel_runtime::cancellation::CancellationSource;
//! use std::time::Duration;
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//!
//! let worker = std::thread::spawn(move || {
//!     let mut ticks = 0u32;
//!     while !token.wait_timeout(Duration::from_millis(5)) {
//!         ticks += 1;
//!     }
//!     ticks
//! });
//!
//! drop(source.drop_guard());
//! worker.join().unwrap();
//! ```

#![forbid(unsafe_code)]

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use web_time::Duration;

/// Shared flag plus the condvar that `wait_timeout` parks on.
#[derive(Default)]
struct Signal {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl Signal {
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.cancelled.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Observer side of a [`CancellationSource`]. Cheap to clone and `Send`.
#[derive(Clone)]
pub struct CancellationToken {
    signal: Arc<Signal>,
}

/// Owner side. Dropping it does **not** cancel; call
/// [`cancel`](Self::cancel) or convert it with [`drop_guard`](Self::drop_guard).
#[derive(Default)]
pub struct CancellationSource {
    signal: Arc<Signal>,
}

impl CancellationSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            signal: Arc::clone(&self.signal),
        }
    }

    /// Flip the flag and wake every parked waiter. Idempotent.
    pub fn cancel(&self) {
        let mut cancelled = self.signal.lock();
        if !*cancelled {
            *cancelled = true;
            self.signal.wake.notify_all();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.signal.lock()
    }

    /// Turn the source into a guard that cancels when dropped.
    pub fn drop_guard(self) -> CancelGuard {
        CancelGuard { source: Some(self) }
    }
}

impl CancellationToken {
    pub fn is_cancelled(&self) -> bool {
        *self.signal.lock()
    }

    /// Park for at most `duration`. Returns `true` if cancelled before or
    /// during the wait, `false` if the full interval elapsed.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let guard = self.signal.lock();
        let (cancelled, _) = self
            .signal
            .wake
            .wait_timeout_while(guard, duration, |cancelled| !*cancelled)
            .unwrap_or_else(|e| e.into_inner());
        *cancelled
    }
}

/// Cancels its source when dropped.
pub struct CancelGuard {
    source: Option<CancellationSource>,
}

impl CancelGuard {
    /// A token observing the guarded source.
    pub fn token(&self) -> Option<CancellationToken> {
        self.source.as_ref().map(CancellationSource::token)
    }

    /// Give the source back without cancelling.
    pub fn disarm(mut self) -> CancellationSource {
        match self.source.take() {
            Some(source) => source,
            None => CancellationSource::new(),
        }
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if let Some(source) = self.source.take() {
            source.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_observe_one_flag() {
        let source = CancellationSource::new();
        let tokens = [source.token(), source.token().clone()];
        assert!(tokens.iter().all(|t| !t.is_cancelled()));

        source.cancel();
        source.cancel();
        assert!(source.is_cancelled());
        assert!(tokens.iter().all(CancellationToken::is_cancelled));
    }

    #[test]
    fn dropping_the_source_leaves_tokens_live() {
        let token = CancellationSource::new().token();
        assert!(!token.is_cancelled());
        assert!(!token.wait_timeout(Duration::from_millis(1)));
    }

    #[test]
    fn guard_cancels_on_drop() {
        let guard = CancellationSource::new().drop_guard();
        let token = guard.token().unwrap();
        drop(guard);
        assert!(token.is_cancelled());
    }

    #[test]
    fn guard_cancels_on_early_return() {
        fn mount(out: &mut Option<CancellationToken>, bail: bool) -> Result<CancelGuard, &'static str> {
            let guard = CancellationSource::new().drop_guard();
            *out = guard.token();
            if bail {
                return Err("unmounted before first tick");
            }
            Ok(guard)
        }

        let mut token = None;
        assert!(mount(&mut token, true).is_err());
        assert!(token.unwrap().is_cancelled());
    }

    #[test]
    fn disarm_hands_back_a_live_source() {
        let guard = CancellationSource::new().drop_guard();
        let token = guard.token().unwrap();
        let source = guard.disarm();
        assert!(!token.is_cancelled());
        source.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn wait_returns_immediately_once_cancelled() {
        let source = CancellationSource::new();
        source.cancel();
        assert!(source.token().wait_timeout(Duration::from_secs(30)));
    }

    #[test]
    fn wait_is_woken_by_cancel_from_another_thread() {
        let source = CancellationSource::new();
        let token = source.token();
        let waiter = thread::spawn(move || token.wait_timeout(Duration::from_secs(30)));

        thread::sleep(Duration::from_millis(20));
        source.cancel();
        assert!(waiter.join().unwrap());
    }
}
