#![forbid(unsafe_code)]

//! Section navigation.
//!
//! [`NavBar`] renders a fixed list of anchor links and highlights the entry
//! whose id matches the [`ActiveSection`]. Clicking an entry only scrolls;
//! the highlight follows through the normal visibility path.
//!
//! [`NavBar::bind`] subscribes the bar to the page's [`ActiveSectionState`]
//! so its rendered items are refreshed on every change of the active
//! section, and only then.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pagereel_core::section::ensure_unique_ids;
use pagereel_core::{ReelError, SectionId};
use pagereel_runtime::{NavEntryConfig, Subscription};

use crate::section_tracker::{ActiveSection, ActiveSectionState};

/// A configured navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub id: SectionId,
    pub label: String,
}

impl NavEntry {
    pub fn new(id: impl Into<SectionId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A rendered navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub id: SectionId,
    pub label: String,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBar {
    entries: Vec<NavEntry>,
}

impl NavBar {
    pub fn new(entries: Vec<NavEntry>) -> Result<Self, ReelError> {
        ensure_unique_ids(entries.iter().map(|e| &e.id))?;
        Ok(Self { entries })
    }

    pub fn from_config(entries: &[NavEntryConfig]) -> Result<Self, ReelError> {
        Self::new(
            entries
                .iter()
                .map(|e| NavEntry::new(e.id.as_str(), e.label.clone()))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Links in display order. At most one is active; none while idle.
    pub fn items(&self, active: &ActiveSection) -> Vec<NavItem> {
        self.entries
            .iter()
            .map(|e| NavItem {
                id: e.id.clone(),
                label: e.label.clone(),
                href: format!("#{}", e.id),
                active: active.is(e.id.as_str()),
            })
            .collect()
    }

    /// One-line text rendering with the active label in brackets.
    pub fn render_line(&self, active: &ActiveSection) -> String {
        self.items(active)
            .iter()
            .map(|item| {
                if item.active {
                    format!("[{}]", item.label)
                } else {
                    item.label.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Entry targeted by an `#id` fragment (or a bare id).
    pub fn resolve_href(&self, href: &str) -> Option<&NavEntry> {
        let id = href.strip_prefix('#').unwrap_or(href);
        self.entries.iter().find(|e| e.id == id)
    }

    /// Render once from `state`, then re-render on every change.
    pub fn bind(self, state: &ActiveSectionState) -> BoundNav {
        let bar = Rc::new(self);
        let items = Rc::new(RefCell::new(bar.items(&state.get())));
        let renders = Rc::new(Cell::new(1u64));

        let subscription = {
            let bar = Rc::clone(&bar);
            let items = Rc::clone(&items);
            let renders = Rc::clone(&renders);
            state.subscribe(move |active| {
                *items.borrow_mut() = bar.items(active);
                renders.set(renders.get() + 1);
            })
        };

        BoundNav {
            bar,
            items,
            renders,
            _subscription: subscription,
        }
    }
}

/// A [`NavBar`] kept in sync with the active-section cell.
///
/// Dropping it unsubscribes.
#[derive(Debug)]
pub struct BoundNav {
    bar: Rc<NavBar>,
    items: Rc<RefCell<Vec<NavItem>>>,
    renders: Rc<Cell<u64>>,
    _subscription: Subscription,
}

impl BoundNav {
    pub fn bar(&self) -> &NavBar {
        &self.bar
    }

    /// Items as of the last change of the active section.
    pub fn items(&self) -> Vec<NavItem> {
        self.items.borrow().clone()
    }

    /// How many times the items were rendered, the initial render included.
    pub fn renders(&self) -> u64 {
        self.renders.get()
    }
}

/// Scroll position that brings a section to the top of the viewport, leaving
/// `margin_top` above it, clamped to the scrollable range.
pub fn anchor_scroll_offset(
    section_top: i32,
    margin_top: u32,
    page_height: u32,
    viewport_height: u32,
) -> i32 {
    let max_scroll = i64::from(page_height.saturating_sub(viewport_height));
    let target = i64::from(section_top) - i64::from(margin_top);
    target.clamp(0, max_scroll) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar() -> NavBar {
        NavBar::new(vec![
            NavEntry::new("overview", "组织投入"),
            NavEntry::new("arch", "组网架构"),
            NavEntry::new("visitor", "游客端"),
        ])
        .unwrap()
    }

    #[test]
    fn idle_highlights_nothing() {
        assert!(bar().items(&ActiveSection::Idle).iter().all(|i| !i.active));
    }

    #[test]
    fn exactly_the_active_entry_is_highlighted() {
        let items = bar().items(&ActiveSection::Active("arch".into()));
        let active: Vec<&str> = items.iter().filter(|i| i.active).map(|i| i.id.as_str()).collect();
        assert_eq!(active, ["arch"]);
        assert_eq!(items[1].href, "#arch");
    }

    #[test]
    fn unknown_active_id_highlights_nothing() {
        let items = bar().items(&ActiveSection::Active("elsewhere".into()));
        assert!(items.iter().all(|i| !i.active));
    }

    #[test]
    fn render_line_brackets_active() {
        let line = bar().render_line(&ActiveSection::Active("visitor".into()));
        assert_eq!(line, "组织投入 | 组网架构 | [游客端]");
    }

    #[test]
    fn duplicate_entries_rejected() {
        let err = NavBar::new(vec![NavEntry::new("a", "A"), NavEntry::new("a", "B")]).unwrap_err();
        assert_eq!(err, ReelError::DuplicateSection("a".into()));
    }

    #[test]
    fn resolve_href_accepts_fragment_or_id() {
        let bar = bar();
        assert_eq!(bar.resolve_href("#arch").map(|e| e.label.as_str()), Some("组网架构"));
        assert_eq!(bar.resolve_href("visitor").map(|e| e.id.as_str()), Some("visitor"));
        assert!(bar.resolve_href("#ip").is_none());
    }

    #[test]
    fn bound_nav_rerenders_only_on_change() {
        let state = ActiveSectionState::default();
        let nav = bar().bind(&state);
        assert_eq!(nav.renders(), 1);
        assert!(nav.items().iter().all(|i| !i.active));

        state.set(ActiveSection::Active("arch".into()));
        state.set(ActiveSection::Active("arch".into()));
        assert_eq!(nav.renders(), 2);
        assert!(nav.items()[1].active);
        assert_eq!(nav.bar().entries().len(), 3);
    }

    #[test]
    fn state_outlives_a_dropped_binding() {
        let state = ActiveSectionState::default();
        drop(bar().bind(&state));
        state.set(ActiveSection::Active("visitor".into()));
        assert!(state.get().is("visitor"));
    }

    #[test]
    fn anchor_offset_leaves_margin_and_clamps() {
        assert_eq!(anchor_scroll_offset(2228, 96, 10_000, 900), 2132);
        assert_eq!(anchor_scroll_offset(40, 96, 10_000, 900), 0);
        assert_eq!(anchor_scroll_offset(9_800, 96, 10_000, 900), 9_100);
        assert_eq!(anchor_scroll_offset(500, 96, 600, 900), 0);
    }
}
