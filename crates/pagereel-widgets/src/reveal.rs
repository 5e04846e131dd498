#![forbid(unsafe_code)]

//! One-shot section reveals.
//!
//! Each section fades in the first time it crosses into the viewport shrunk
//! by 100px on every edge, and stays revealed afterwards. [`RevealTracker`]
//! latches those first entries in the order they happen.
//!
//! # Invariants
//!
//! 1. A section appears in [`RevealTracker::revealed`] at most once.
//! 2. Exit entries never unlatch a revealed section.
//! 3. Once detached (or dropped), the tracker records nothing further.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pagereel_core::section::ensure_unique_ids;
use pagereel_core::{
    BatchCallback, Insets, Margin, ObservationHandle, ReelError, Section, SectionId,
    VisibilityEntry, VisibilityObserver, VisibilityPolicy,
};

/// Viewport inset that a section must cross before it is revealed.
pub const REVEAL_MARGIN: Margin = Margin::Px(-100);

/// The band policy reveals are evaluated under.
pub const fn reveal_policy() -> VisibilityPolicy {
    VisibilityPolicy::Band(Insets::all(REVEAL_MARGIN))
}

/// Latches sections to revealed on their first qualifying entry.
#[derive(Debug)]
pub struct RevealTracker {
    registrations: Vec<(SectionId, ObservationHandle)>,
    revealed: Rc<RefCell<Vec<SectionId>>>,
    live: Rc<Cell<bool>>,
}

impl RevealTracker {
    /// Register every section under [`reveal_policy`].
    pub fn attach<O>(observer: &mut O, sections: &[Section]) -> Result<Self, ReelError>
    where
        O: VisibilityObserver + ?Sized,
    {
        ensure_unique_ids(sections.iter().map(|s| &s.id))?;

        let live = Rc::new(Cell::new(true));
        let revealed = Rc::new(RefCell::new(Vec::<SectionId>::new()));
        let on_batch: BatchCallback = {
            let live = Rc::clone(&live);
            let revealed = Rc::clone(&revealed);
            Rc::new(move |entries: &[VisibilityEntry]| {
                if !live.get() {
                    return;
                }
                let mut revealed = revealed.borrow_mut();
                for entry in entries.iter().filter(|e| e.intersecting) {
                    if !revealed.contains(&entry.id) {
                        tracing::debug!(section = %entry.id, "section revealed");
                        revealed.push(entry.id.clone());
                    }
                }
            })
        };

        let policy = reveal_policy();
        let registrations = sections
            .iter()
            .map(|s| (s.id.clone(), observer.register(s, &policy, Rc::clone(&on_batch))))
            .collect();
        Ok(Self {
            registrations,
            revealed,
            live,
        })
    }

    /// Revealed section ids, in the order they were first seen.
    pub fn revealed(&self) -> Vec<SectionId> {
        self.revealed.borrow().clone()
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.borrow().iter().any(|r| r == id)
    }

    /// Stop observing sections that are already revealed. Returns how many
    /// registrations were released.
    pub fn release_revealed<O>(&mut self, observer: &mut O) -> usize
    where
        O: VisibilityObserver + ?Sized,
    {
        let revealed = self.revealed.borrow();
        let before = self.registrations.len();
        self.registrations.retain(|(id, handle)| {
            if revealed.contains(id) {
                observer.unregister(*handle);
                false
            } else {
                true
            }
        });
        before - self.registrations.len()
    }

    /// Sections still waiting for their first reveal.
    pub fn pending(&self) -> usize {
        self.registrations.len()
    }

    /// Unregister whatever is still observed.
    pub fn detach<O>(mut self, observer: &mut O) -> usize
    where
        O: VisibilityObserver + ?Sized,
    {
        self.live.set(false);
        self.registrations
            .drain(..)
            .filter(|(_, handle)| observer.unregister(*handle))
            .count()
    }
}

impl Drop for RevealTracker {
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
    fn reveal_band_shrinks_the_viewport() {
        let viewport = Rect::new(0, 0, 1440, 900);
        assert_eq!(reveal_policy().root(viewport), Rect::new(100, 100, 1240, 700));
        // A section peeking 50px into the viewport is not yet revealed.
        let peeking = Rect::new(0, 850, 1440, 1200);
        assert!(!reveal_policy().evaluate(peeking, viewport).intersecting);
        let entered = Rect::new(0, 700, 1440, 1200);
        assert!(reveal_policy().evaluate(entered, viewport).intersecting);
    }

    #[test]
    fn first_entry_latches() {
        let mut observer = ScriptedObserver::new();
        let tracker = RevealTracker::attach(&mut observer, &sections(&["a", "b", "c"])).unwrap();

        observer.emit(&[("b", true)]);
        observer.emit(&[("b", false), ("a", true)]);
        observer.emit(&[("a", false), ("b", true)]);

        assert_eq!(tracker.revealed(), vec![SectionId::from("b"), SectionId::from("a")]);
        assert!(tracker.is_revealed("b"));
        assert!(!tracker.is_revealed("c"));
    }

    #[test]
    fn release_drops_only_revealed_registrations() {
        let mut observer = ScriptedObserver::new();
        let mut tracker = RevealTracker::attach(&mut observer, &sections(&["a", "b", "c"])).unwrap();
        observer.emit(&[("a", true), ("c", true)]);

        assert_eq!(tracker.release_revealed(&mut observer), 2);
        assert_eq!(observer.registered_ids(), vec![SectionId::from("b")]);
        assert_eq!(tracker.pending(), 1);
        assert_eq!(tracker.release_revealed(&mut observer), 0);
    }

    #[test]
    fn detached_tracker_ignores_late_batches() {
        let mut observer = ScriptedObserver::new();
        let tracker = RevealTracker::attach(&mut observer, &sections(&["a", "b"])).unwrap();
        let revealed = Rc::clone(&tracker.revealed);
        assert_eq!(tracker.detach(&mut observer), 2);

        observer.emit_stale(&[("a", true)]);
        assert!(revealed.borrow().is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut observer = ScriptedObserver::new();
        let err = RevealTracker::attach(&mut observer, &sections(&["a", "a"])).unwrap_err();
        assert_eq!(err, ReelError::DuplicateSection("a".into()));
        assert_eq!(observer.active_count(), 0);
    }
}
