#![forbid(unsafe_code)]

//! Visibility policies and the observer capability.
//!
//! A [`VisibilityPolicy`] decides whether a section counts as "in view" given
//! the current viewport. A [`VisibilityObserver`] watches registered sections
//! and pushes [`VisibilityEntry`] batches to callbacks whenever a section
//! crosses the policy boundary.
//!
//! # Invariants
//!
//! 1. Observers notify on transitions only, plus one initial entry per
//!    registration on the first evaluation.
//! 2. Registrations sharing one [`BatchCallback`] (by pointer identity) get
//!    their entries in a single batch, in registration order.
//! 3. After `unregister`, an observer never delivers to that registration.
//!
//! # Failure Modes
//!
//! - Threshold outside `[0.0, 1.0]` or NaN: rejected by
//!   [`VisibilityPolicy::validate`].
//! - Zero-area target: ratio is `1.0` when it touches the root, else `0.0`.

use std::rc::Rc;

use crate::error::ReelError;
use crate::geometry::{Insets, Rect};
use crate::section::{Section, SectionId};

/// Rule that decides when a section counts as in view.
///
/// The two modes are mutually exclusive per tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum VisibilityPolicy {
    /// In view when at least this fraction of the section's area lies inside
    /// the viewport.
    Threshold(f32),
    /// In view when the section overlaps the viewport shrunk (or grown) by
    /// these root margins.
    Band(Insets),
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self::Threshold(0.2)
    }
}

/// Result of evaluating one section against a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visibility {
    /// Fraction of the section inside the root, in `[0.0, 1.0]`.
    pub ratio: f32,
    /// Whether the policy considers the section in view.
    pub intersecting: bool,
}

impl VisibilityPolicy {
    /// Check the policy parameters.
    pub fn validate(&self) -> Result<(), ReelError> {
        match *self {
            Self::Threshold(t) if !(0.0..=1.0).contains(&t) => Err(ReelError::InvalidThreshold(t)),
            _ => Ok(()),
        }
    }

    /// The root rectangle sections are tested against.
    pub fn root(&self, viewport: Rect) -> Rect {
        match self {
            Self::Threshold(_) => viewport,
            Self::Band(insets) => viewport.expand(insets),
        }
    }

    /// Evaluate `target` against `viewport`.
    pub fn evaluate(&self, target: Rect, viewport: Rect) -> Visibility {
        let root = self.root(viewport);
        let overlap = target.touching_intersection(&root);

        let ratio = match overlap {
            None => 0.0,
            Some(_) if target.is_empty() => 1.0,
            Some(hit) => (hit.area() as f64 / target.area() as f64) as f32,
        };

        let intersecting = match *self {
            Self::Threshold(t) if t > 0.0 => overlap.is_some() && ratio >= t,
            Self::Threshold(_) | Self::Band(_) => overlap.is_some(),
        };

        Visibility {
            ratio,
            intersecting,
        }
    }
}

/// One section's visibility transition inside a notification batch.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEntry {
    pub id: SectionId,
    pub intersecting: bool,
    pub ratio: f32,
    pub bounds: Rect,
}

impl VisibilityEntry {
    pub fn new(id: impl Into<SectionId>, intersecting: bool) -> Self {
        Self {
            id: id.into(),
            intersecting,
            ratio: if intersecting { 1.0 } else { 0.0 },
            bounds: Rect::default(),
        }
    }
}

/// Receiver for notification batches.
pub type BatchCallback = Rc<dyn Fn(&[VisibilityEntry])>;

/// Opaque token identifying one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservationHandle(u64);

impl ObservationHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Platform capability that pushes visibility transitions for sections.
///
/// Implementations exist for host-reported layout geometry
/// (`pagereel_web::LayoutObserver`) and for tests
/// ([`testing::ScriptedObserver`]).
pub trait VisibilityObserver {
    /// Start observing `section` under `policy`.
    fn register(
        &mut self,
        section: &Section,
        policy: &VisibilityPolicy,
        on_batch: BatchCallback,
    ) -> ObservationHandle;

    /// Stop observing. Returns `false` if the handle was not registered.
    fn unregister(&mut self, handle: ObservationHandle) -> bool;
}

/// Groups entries by callback identity and delivers one batch per callback.
///
/// Callbacks are invoked in order of first appearance.
#[derive(Default)]
pub struct BatchDispatch {
    batches: Vec<(BatchCallback, Vec<VisibilityEntry>)>,
}

impl BatchDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an entry for `callback`.
    pub fn push(&mut self, callback: &BatchCallback, entry: VisibilityEntry) {
        match self
            .batches
            .iter_mut()
            .find(|(cb, _)| Rc::ptr_eq(cb, callback))
        {
            Some((_, entries)) => entries.push(entry),
            None => self.batches.push((Rc::clone(callback), vec![entry])),
        }
    }

    /// Whether nothing has been queued.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Deliver all queued batches. Returns the number of entries delivered.
    pub fn dispatch(self) -> usize {
        let mut delivered = 0;
        for (callback, entries) in self.batches {
            tracing::trace!(entries = entries.len(), "visibility batch");
            delivered += entries.len();
            callback(&entries);
        }
        delivered
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing {
    //! Test double that synthesizes notification batches.

    use super::*;

    struct Registration {
        handle: ObservationHandle,
        id: SectionId,
        callback: BatchCallback,
    }

    /// A [`VisibilityObserver`] driven entirely by the test.
    ///
    /// Unregistered callbacks are kept aside so a test can simulate a
    /// notification that the platform queued before teardown but delivered
    /// after it.
    #[derive(Default)]
    pub struct ScriptedObserver {
        next_handle: u64,
        active: Vec<Registration>,
        retired: Vec<Registration>,
    }

    impl ScriptedObserver {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of live registrations.
        pub fn active_count(&self) -> usize {
            self.active.len()
        }

        /// Ids of live registrations, in registration order.
        pub fn registered_ids(&self) -> Vec<SectionId> {
            self.active.iter().map(|r| r.id.clone()).collect()
        }

        /// Deliver one batch to live registrations. Reports name a section id
        /// and whether it now satisfies the policy; batch order is report order.
        /// Reports for unknown ids are dropped.
        pub fn emit(&self, reports: &[(&str, bool)]) -> usize {
            Self::deliver(self.active.iter(), reports)
        }

        /// Deliver one batch to registrations that were already unregistered.
        pub fn emit_stale(&self, reports: &[(&str, bool)]) -> usize {
            Self::deliver(self.retired.iter(), reports)
        }

        fn deliver<'a>(
            registrations: impl Iterator<Item = &'a Registration> + Clone,
            reports: &[(&str, bool)],
        ) -> usize {
            let mut dispatch = BatchDispatch::new();
            for (id, intersecting) in reports {
                for reg in registrations.clone().filter(|r| r.id == *id) {
                    dispatch.push(&reg.callback, VisibilityEntry::new(reg.id.clone(), *intersecting));
                }
            }
            dispatch.dispatch()
        }
    }

    impl VisibilityObserver for ScriptedObserver {
        fn register(
            &mut self,
            section: &Section,
            _policy: &VisibilityPolicy,
            on_batch: BatchCallback,
        ) -> ObservationHandle {
            self.next_handle += 1;
            let handle = ObservationHandle::new(self.next_handle);
            self.active.push(Registration {
                handle,
                id: section.id.clone(),
                callback: on_batch,
            });
            handle
        }

        fn unregister(&mut self, handle: ObservationHandle) -> bool {
            match self.active.iter().position(|r| r.handle == handle) {
                Some(idx) => {
                    let reg = self.active.remove(idx);
                    self.retired.push(reg);
                    true
                }
                None => false,
            }
        }
    }
}
