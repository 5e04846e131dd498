#![forbid(unsafe_code)]

//! A [`VisibilityObserver`] fed by host-reported layout geometry.
//!
//! The host reports the viewport size, the scroll offset and section bounds,
//! then calls [`LayoutObserver::evaluate`] once per frame. Each evaluation
//! compares every registration against the viewport and delivers only the
//! registrations whose intersecting state changed, plus one initial report
//! per registration on its first evaluation.
//!
//! # Invariants
//!
//! 1. Entries are grouped by callback identity into one batch per callback,
//!    in registration order.
//! 2. A section removed from the document keeps its registration and reports
//!    not intersecting until it is unregistered.
//! 3. Unregistered handles receive nothing, even within the evaluation that
//!    would have reported them.

use pagereel_core::visibility::BatchDispatch;
use pagereel_core::{
    BatchCallback, ObservationHandle, Rect, Section, SectionId, VisibilityEntry,
    VisibilityObserver, VisibilityPolicy,
};

struct Registration {
    handle: ObservationHandle,
    id: SectionId,
    policy: VisibilityPolicy,
    callback: BatchCallback,
    /// `None` until the first evaluation.
    last: Option<bool>,
}

/// Geometry-polling visibility observer.
pub struct LayoutObserver {
    width: u32,
    height: u32,
    scroll_y: i32,
    /// Section bounds in page coordinates; `None` once removed.
    bounds: Vec<(SectionId, Option<Rect>)>,
    registrations: Vec<Registration>,
    next_handle: u64,
}

impl std::fmt::Debug for LayoutObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutObserver")
            .field("viewport", &self.viewport())
            .field("sections", &self.bounds.len())
            .field("registrations", &self.registrations.len())
            .finish()
    }
}

impl LayoutObserver {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0,
            bounds: Vec::new(),
            registrations: Vec::new(),
            next_handle: 0,
        }
    }

    /// The visible part of the page.
    pub fn viewport(&self) -> Rect {
        Rect::new(0, self.scroll_y, self.width, self.height)
    }

    pub fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn scroll_to(&mut self, y: i32) {
        self.scroll_y = y;
    }

    /// Record the bounds of a section. Returns `false` if the id was new.
    pub fn set_bounds(&mut self, id: impl Into<SectionId>, bounds: Rect) -> bool {
        let id = id.into();
        match self.bounds.iter_mut().find(|(known, _)| *known == id) {
            Some((_, slot)) => {
                *slot = Some(bounds);
                true
            }
            None => {
                self.bounds.push((id, Some(bounds)));
                false
            }
        }
    }

    /// Take a section out of the document.
    pub fn remove_section(&mut self, id: &str) -> bool {
        match self.bounds.iter_mut().find(|(known, _)| known == id) {
            Some((_, slot)) => slot.take().is_some(),
            None => false,
        }
    }

    /// Set the width of every section in the document, keeping position and
    /// height. Full-width blocks reflow this way on resize.
    pub fn fit_width(&mut self, width: u32) {
        for (_, slot) in &mut self.bounds {
            if let Some(rect) = slot {
                rect.width = width;
            }
        }
    }

    pub fn bounds_of(&self, id: &str) -> Option<Rect> {
        self.bounds
            .iter()
            .find(|(known, _)| known == id)
            .and_then(|(_, rect)| *rect)
    }

    /// Bottom edge of the lowest section in the document.
    pub fn content_bottom(&self) -> i64 {
        self.bounds
            .iter()
            .filter_map(|(_, rect)| rect.map(|r| r.bottom()))
            .max()
            .unwrap_or(0)
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    /// Compare every registration against the viewport and deliver changes.
    /// Returns the number of entries delivered.
    pub fn evaluate(&mut self) -> usize {
        let viewport = self.viewport();
        let mut dispatch = BatchDispatch::new();

        for reg in &mut self.registrations {
            let bounds = self
                .bounds
                .iter()
                .find(|(known, _)| *known == reg.id)
                .and_then(|(_, rect)| *rect);
            let (intersecting, ratio) = match bounds {
                Some(rect) => {
                    let v = reg.policy.evaluate(rect, viewport);
                    (v.intersecting, v.ratio)
                }
                None => (false, 0.0),
            };

            if reg.last == Some(intersecting) {
                continue;
            }
            reg.last = Some(intersecting);
            dispatch.push(
                &reg.callback,
                VisibilityEntry {
                    id: reg.id.clone(),
                    intersecting,
                    ratio,
                    bounds: bounds.unwrap_or_default(),
                },
            );
        }

        if dispatch.is_empty() {
            return 0;
        }
        let _span = tracing::trace_span!("layout.evaluate", scroll_y = self.scroll_y).entered();
        dispatch.dispatch()
    }
}

impl VisibilityObserver for LayoutObserver {
    fn register(
        &mut self,
        section: &Section,
        policy: &VisibilityPolicy,
        on_batch: BatchCallback,
    ) -> ObservationHandle {
        if self.bounds_of(section.id.as_str()).is_none() {
            self.set_bounds(section.id.clone(), section.bounds);
        }
        self.next_handle += 1;
        let handle = ObservationHandle::new(self.next_handle);
        self.registrations.push(Registration {
            handle,
            id: section.id.clone(),
            policy: *policy,
            callback: on_batch,
            last: None,
        });
        handle
    }

    fn unregister(&mut self, handle: ObservationHandle) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.handle != handle);
        before != self.registrations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<Vec<(String, bool)>>>>;

    fn recorder() -> (BatchCallback, Log) {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        let cb: BatchCallback = Rc::new(move |entries: &[VisibilityEntry]| {
            sink.borrow_mut().push(
                entries
                    .iter()
                    .map(|e| (e.id.to_string(), e.intersecting))
                    .collect(),
            );
        });
        (cb, log)
    }

    fn page(observer: &mut LayoutObserver, cb: &BatchCallback) -> Vec<ObservationHandle> {
        let policy = VisibilityPolicy::Threshold(0.2);
        ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let section = Section::new(*id, Rect::new(0, i as i32 * 1000, 1000, 1000));
                observer.register(&section, &policy, Rc::clone(cb))
            })
            .collect()
    }

    #[test]
    fn first_evaluation_reports_everything() {
        let mut observer = LayoutObserver::new(1000, 800);
        let (cb, log) = recorder();
        page(&mut observer, &cb);

        assert_eq!(observer.evaluate(), 3);
        assert_eq!(
            log.borrow()[0],
            [("a".to_string(), true), ("b".to_string(), false), ("c".to_string(), false)]
        );
    }

    #[test]
    fn only_transitions_are_reported() {
        let mut observer = LayoutObserver::new(1000, 800);
        let (cb, log) = recorder();
        page(&mut observer, &cb);
        observer.evaluate();

        observer.scroll_to(100);
        assert_eq!(observer.evaluate(), 0);

        // Viewport 500..1300 shows 30% of b.
        observer.scroll_to(500);
        assert_eq!(observer.evaluate(), 1);
        assert_eq!(log.borrow()[1], [("b".to_string(), true)]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut observer = LayoutObserver::new(1000, 800);
        let (cb, log) = recorder();
        page(&mut observer, &cb);
        observer.evaluate();

        // Exactly 200px (20%) of b inside the viewport.
        observer.scroll_to(400);
        observer.evaluate();
        assert_eq!(log.borrow().last().unwrap(), &[("b".to_string(), true)]);
    }

    #[test]
    fn removed_section_reports_exit() {
        let mut observer = LayoutObserver::new(1000, 800);
        let (cb, log) = recorder();
        page(&mut observer, &cb);
        observer.evaluate();

        assert!(observer.remove_section("a"));
        observer.evaluate();
        assert_eq!(log.borrow()[1], [("a".to_string(), false)]);
    }

    #[test]
    fn unregistered_handles_are_silent() {
        let mut observer = LayoutObserver::new(1000, 800);
        let (cb, log) = recorder();
        let handles = page(&mut observer, &cb);
        for h in &handles {
            assert!(observer.unregister(*h));
        }
        assert!(!observer.unregister(handles[0]));
        assert_eq!(observer.evaluate(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn band_policy_uses_central_strip() {
        use pagereel_core::Insets;

        let mut observer = LayoutObserver::new(1000, 1000);
        let (cb, log) = recorder();
        let policy = VisibilityPolicy::Band(Insets::central_band(20.0));
        // Band is 400..600 at scroll 0.
        let below = Section::new("below", Rect::new(0, 600, 1000, 300));
        observer.register(&below, &policy, Rc::clone(&cb));
        observer.evaluate();
        assert_eq!(log.borrow()[0], [("below".to_string(), true)]);

        observer.scroll_to(1);
        observer.evaluate();
        assert_eq!(log.borrow().len(), 1);

        observer.scroll_to(-1);
        observer.evaluate();
        assert_eq!(log.borrow()[1], [("below".to_string(), false)]);
    }

    #[test]
    fn fit_width_and_content_bottom() {
        let mut observer = LayoutObserver::new(1000, 800);
        let (cb, _log) = recorder();
        page(&mut observer, &cb);
        observer.fit_width(390);
        assert_eq!(observer.bounds_of("b").map(|r| r.width), Some(390));
        assert_eq!(observer.content_bottom(), 3000);
    }
}
