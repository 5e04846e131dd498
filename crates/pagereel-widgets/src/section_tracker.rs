#![forbid(unsafe_code)]

//! Active-section tracking.
//!
//! [`SectionTracker`] registers every section with a [`VisibilityObserver`]
//! and writes the id of the most recently qualifying section into a shared
//! [`ActiveSectionState`] cell. The navigation renderer reads that cell.
//!
//! # State machine
//!
//! ```text
//! Idle ──qualifying entry──▶ Active(id) ──qualifying entry──▶ Active(id')
//! ```
//!
//! Exit entries never clear the state: the last visited section stays
//! highlighted while the viewport crosses a gap between sections.
//!
//! # Invariants
//!
//! 1. At most one active id at a time; it is overwritten, never accumulated.
//! 2. Within one batch, the last qualifying entry in batch order wins, and the
//!    cell is written once per batch.
//! 3. Once detached (or dropped), the tracker never writes the cell again,
//!    even if the platform delivers a batch it queued earlier.

use std::cell::Cell;
use std::rc::Rc;

use pagereel_core::section::ensure_unique_ids;
use pagereel_core::{
    BatchCallback, ObservationHandle, ReelError, Section, SectionId, VisibilityEntry,
    VisibilityObserver, VisibilityPolicy,
};
use pagereel_runtime::Observable;

/// Which section the navigation should highlight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveSection {
    /// No section has qualified yet.
    #[default]
    Idle,
    /// The most recently qualifying section.
    Active(SectionId),
}

impl ActiveSection {
    pub fn id(&self) -> Option<&SectionId> {
        match self {
            Self::Idle => None,
            Self::Active(id) => Some(id),
        }
    }

    /// Whether `id` is the active section.
    pub fn is(&self, id: &str) -> bool {
        self.id().is_some_and(|active| active == id)
    }
}

/// Page-lifetime cell holding the active section.
pub type ActiveSectionState = Observable<ActiveSection>;

/// The last entry in `entries` that satisfies the policy.
pub fn last_intersecting(entries: &[VisibilityEntry]) -> Option<&SectionId> {
    entries.iter().rev().find(|e| e.intersecting).map(|e| &e.id)
}

/// Keeps [`ActiveSectionState`] pointed at the section in view.
#[derive(Debug)]
pub struct SectionTracker {
    policy: VisibilityPolicy,
    sections: Vec<SectionId>,
    handles: Vec<ObservationHandle>,
    live: Rc<Cell<bool>>,
}

impl SectionTracker {
    /// Register `sections` with `observer` under `policy`.
    ///
    /// The section set is fixed from here on; sections added to the page
    /// later are not observed. Fails without registering anything if the
    /// policy is invalid or two sections share an id.
    pub fn attach<O>(
        observer: &mut O,
        sections: &[Section],
        policy: VisibilityPolicy,
        state: &ActiveSectionState,
    ) -> Result<Self, ReelError>
    where
        O: VisibilityObserver + ?Sized,
    {
        policy.validate()?;
        ensure_unique_ids(sections.iter().map(|s| &s.id))?;

        let live = Rc::new(Cell::new(true));
        let on_batch: BatchCallback = {
            let live = Rc::clone(&live);
            let state = state.clone();
            Rc::new(move |entries: &[VisibilityEntry]| {
                if !live.get() {
                    tracing::trace!(entries = entries.len(), "batch after detach ignored");
                    return;
                }
                if let Some(id) = last_intersecting(entries) {
                    state.set(ActiveSection::Active(id.clone()));
                }
            })
        };

        let handles = sections
            .iter()
            .map(|section| observer.register(section, &policy, Rc::clone(&on_batch)))
            .collect();

        tracing::debug!(sections = sections.len(), ?policy, "section tracker attached");
        Ok(Self {
            policy,
            sections: sections.iter().map(|s| s.id.clone()).collect(),
            handles,
            live,
        })
    }

    /// Unregister every section. Returns how many registrations the observer
    /// still held.
    pub fn detach<O>(mut self, observer: &mut O) -> usize
    where
        O: VisibilityObserver + ?Sized,
    {
        self.live.set(false);
        let released = self
            .handles
            .drain(..)
            .filter(|handle| observer.unregister(*handle))
            .count();
        tracing::debug!(released, "section tracker detached");
        released
    }

    pub fn policy(&self) -> VisibilityPolicy {
        self.policy
    }

    /// Observed section ids, in registration order.
    pub fn sections(&self) -> &[SectionId] {
        &self.sections
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }
}

impl Drop for SectionTracker {
    fn drop(&mut self) {
        self.live.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagereel_core::Rect;
    use pagereel_core::visibility::testing::ScriptedObserver;

    fn sections(ids: &[&str]) -> Vec<Section> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| Section::new(*id, Rect::new(0, i as i32 * 1000, 1000, 1000)))
            .collect()
    }

    #[test]
    fn active_section_reports_id() {
        assert_eq!(ActiveSection::Idle.id(), None);
        let active = ActiveSection::Active("gov".into());
        assert!(active.is("gov"));
        assert!(!active.is("ip"));
    }

    #[test]
    fn last_intersecting_ignores_exits() {
        let batch = [
            VisibilityEntry::new("a", true),
            VisibilityEntry::new("b", true),
            VisibilityEntry::new("c", false),
        ];
        assert_eq!(last_intersecting(&batch).map(SectionId::as_str), Some("b"));
        assert_eq!(last_intersecting(&batch[2..]), None);
    }

    #[test]
    fn attach_registers_every_section() {
        let mut observer = ScriptedObserver::new();
        let state = ActiveSectionState::default();
        let tracker =
            SectionTracker::attach(&mut observer, &sections(&["a", "b", "c"]), VisibilityPolicy::Threshold(0.2), &state)
                .unwrap();
        assert_eq!(observer.active_count(), 3);
        assert_eq!(tracker.sections().len(), 3);
        assert!(tracker.is_live());
    }

    #[test]
    fn attach_rejects_duplicates_without_registering() {
        let mut observer = ScriptedObserver::new();
        let state = ActiveSectionState::default();
        let err = SectionTracker::attach(
            &mut observer,
            &sections(&["a", "b", "a"]),
            VisibilityPolicy::default(),
            &state,
        )
        .unwrap_err();
        assert_eq!(err, ReelError::DuplicateSection("a".into()));
        assert_eq!(observer.active_count(), 0);
    }

    #[test]
    fn attach_rejects_invalid_policy() {
        let mut observer = ScriptedObserver::new();
        let state = ActiveSectionState::default();
        let err = SectionTracker::attach(
            &mut observer,
            &sections(&["a"]),
            VisibilityPolicy::Threshold(2.0),
            &state,
        )
        .unwrap_err();
        assert_eq!(err, ReelError::InvalidThreshold(2.0));
    }

    #[test]
    fn one_write_per_batch() {
        let mut observer = ScriptedObserver::new();
        let state = ActiveSectionState::default();
        let _tracker = SectionTracker::attach(
            &mut observer,
            &sections(&["a", "b", "c"]),
            VisibilityPolicy::default(),
            &state,
        )
        .unwrap();

        observer.emit(&[("a", true), ("b", true), ("c", true)]);
        assert_eq!(state.get(), ActiveSection::Active("c".into()));
        assert_eq!(state.version(), 1);
    }

    #[test]
    fn detach_unregisters_all_and_silences_late_batches() {
        let mut observer = ScriptedObserver::new();
        let state = ActiveSectionState::default();
        let tracker = SectionTracker::attach(
            &mut observer,
            &sections(&["a", "b"]),
            VisibilityPolicy::default(),
            &state,
        )
        .unwrap();

        observer.emit(&[("a", true)]);
        assert_eq!(tracker.detach(&mut observer), 2);
        assert_eq!(observer.active_count(), 0);

        observer.emit_stale(&[("b", true)]);
        assert_eq!(state.get(), ActiveSection::Active("a".into()));
    }

    #[test]
    fn dropping_without_detach_still_silences_callbacks() {
        let mut observer = ScriptedObserver::new();
        let state = ActiveSectionState::default();
        let tracker = SectionTracker::attach(
            &mut observer,
            &sections(&["a", "b"]),
            VisibilityPolicy::default(),
            &state,
        )
        .unwrap();
        drop(tracker);

        // The observer still holds the registrations, but they are inert.
        observer.emit(&[("b", true)]);
        assert_eq!(state.get(), ActiveSection::Idle);
    }
}
