#![forbid(unsafe_code)]

//! Page-level coordinator.
//!
//! [`ReportPage`] owns everything with page lifetime: the active-section
//! cell, the layout observer with the active-section and reveal trackers
//! registered on it, the headline rotator and its repeating task, the bound
//! navigation bar, section content, the modal flags, the showcase gallery and
//! the optional data table. The host feeds it [`PageEvent`]s and
//! reads [`PageFrame`] snapshots.
//!
//! Teardown happens in [`ReportPage::unmount`]: both trackers detach from
//! the observer and the headline task is cancelled. Dropping the page
//! unmounts it, so every exit path releases both.

use core::time::Duration;

use pagereel_core::{Rect, ReelError, Section, SectionId};
use pagereel_runtime::{
    ManualScheduler, PageConfig, RotatorConfig, Scheduler, TaskId, ViewportConfig,
};
use pagereel_widgets::content::{report_content, showcase_gallery};
use pagereel_widgets::data_table::TableView;
use pagereel_widgets::nav::anchor_scroll_offset;
use pagereel_widgets::{
    ActiveSection, ActiveSectionState, BoundNav, DataCard, DataTable, Gallery, MediaAsset,
    ModalKind, ModalSet, NavBar, NavItem, PhraseTransition, RevealTracker,
    RotatingText, SectionContent, SectionHeader, SectionTracker,
};

use crate::DeterministicClock;
use crate::layout_observer::LayoutObserver;

/// Input pushed by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// The document scrolled to `y`.
    Scroll { y: i32 },
    /// The viewport changed size.
    Resize { width: u32, height: u32 },
    /// A section was laid out at new bounds.
    Layout { id: SectionId, bounds: Rect },
    /// Monotonic time moved forward.
    Advance(Duration),
    /// A navigation link was clicked.
    NavClick(SectionId),
    OpenModal(ModalKind),
    CloseModal(ModalKind),
    /// Step the image showcase forward, wrapping at the end.
    ShowcaseNext,
    /// Step the image showcase back, wrapping at the start.
    ShowcasePrev,
}

/// Messages produced by scheduled tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMsg {
    /// `ticks` rotation intervals have elapsed.
    RotateHeadline { ticks: u64 },
}

/// A progress bar as currently drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub label: String,
    pub percentage: u8,
    /// Target fill fraction: 0 until the section is revealed, then the
    /// bar's percentage. The host animates toward it with [`pagereel_widgets::ProgressBar::FILL`].
    pub fill: f32,
}

/// One section as currently drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub id: SectionId,
    /// `None` for sections with no bundled content.
    pub header: Option<SectionHeader>,
    /// Page time of the first reveal.
    pub revealed_at: Option<Duration>,
    pub cards: Vec<DataCard>,
    pub progress: Vec<ProgressView>,
    pub media: Vec<MediaAsset>,
}

impl SectionView {
    pub fn is_revealed(&self) -> bool {
        self.revealed_at.is_some()
    }
}

/// The image showcase while its modal is open.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowcaseView {
    pub assets: Vec<MediaAsset>,
    pub selected: usize,
}

/// Snapshot of what the page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFrame {
    pub now: Duration,
    pub scroll_y: i32,
    pub viewport: Rect,
    pub active: ActiveSection,
    pub nav: Vec<NavItem>,
    /// Sections in document order.
    pub sections: Vec<SectionView>,
    /// Revealed section ids, in reveal order.
    pub revealed: Vec<SectionId>,
    pub headline: String,
    pub headline_index: usize,
    /// Most recent phrase change, if any.
    pub headline_transition: Option<PhraseTransition>,
    pub modals: Vec<ModalKind>,
    /// Table contents while the data-sheet modal is open.
    pub sheet: Option<TableView>,
    pub showcase: Option<ShowcaseView>,
    pub mounted: bool,
}

pub struct ReportPage {
    state: ActiveSectionState,
    observer: LayoutObserver,
    tracker: Option<SectionTracker>,
    reveal: Option<RevealTracker>,
    revealed_at: Vec<(SectionId, Duration)>,
    section_ids: Vec<SectionId>,
    content: Vec<SectionContent>,
    nav: BoundNav,
    rotator: RotatingText,
    scheduler: ManualScheduler<PageMsg>,
    rotation_task: Option<TaskId>,
    clock: DeterministicClock,
    modals: ModalSet,
    showcase: Gallery,
    table: Option<DataTable>,
    scroll_margin_top: u32,
    last_transition: Option<PhraseTransition>,
}

impl std::fmt::Debug for ReportPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportPage")
            .field("active", &self.state.get())
            .field("observer", &self.observer)
            .field("headline", &self.rotator.current())
            .field("modals", &self.modals)
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

impl ReportPage {
    /// Build and mount a page: register every configured section, deliver
    /// the initial visibility reports and start the headline timer.
    pub fn mount(config: &PageConfig) -> Result<Self, ReelError> {
        config.validate()?;
        let _span = tracing::debug_span!("page.mount", sections = config.sections.len()).entered();

        let ViewportConfig { width, height } = config.viewport;
        let mut observer = LayoutObserver::new(width, height);
        let sections: Vec<Section> = config
            .sections
            .iter()
            .map(|s| Section::new(s.id.as_str(), Rect::new(0, s.top, width, s.height)))
            .collect();

        let state = ActiveSectionState::default();
        let tracker = SectionTracker::attach(&mut observer, &sections, config.tracker.policy, &state)?;
        let reveal = RevealTracker::attach(&mut observer, &sections)?;
        let nav = NavBar::from_config(&config.nav)?.bind(&state);

        let mut page = Self {
            state,
            observer,
            tracker: Some(tracker),
            reveal: Some(reveal),
            revealed_at: Vec::new(),
            section_ids: sections.into_iter().map(|s| s.id).collect(),
            content: report_content(),
            nav,
            rotator: RotatingText::from_config(&config.rotator)?,
            scheduler: ManualScheduler::new(),
            rotation_task: None,
            clock: DeterministicClock::new(),
            modals: ModalSet::default(),
            showcase: showcase_gallery(),
            table: None,
            scroll_margin_top: config.tracker.scroll_margin_top,
            last_transition: None,
        };
        page.start_rotation()?;
        page.evaluate();
        Ok(page)
    }

    /// Attach the table shown by the data-sheet modal.
    #[must_use]
    pub fn with_table(mut self, table: DataTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Shared handle to the active-section cell.
    pub fn active_state(&self) -> &ActiveSectionState {
        &self.state
    }

    pub fn active(&self) -> ActiveSection {
        self.state.get()
    }

    pub fn observer(&self) -> &LayoutObserver {
        &self.observer
    }

    pub fn rotator(&self) -> &RotatingText {
        &self.rotator
    }

    /// Revealed section ids, in reveal order.
    pub fn revealed(&self) -> Vec<SectionId> {
        self.revealed_at.iter().map(|(id, _)| id.clone()).collect()
    }

    /// How often the navigation bar has re-rendered.
    pub fn nav_renders(&self) -> u64 {
        self.nav.renders()
    }

    pub fn is_mounted(&self) -> bool {
        self.tracker.is_some()
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> i32 {
        let viewport = self.observer.viewport();
        (self.observer.content_bottom() - i64::from(viewport.height)).clamp(0, i64::from(i32::MAX))
            as i32
    }

    /// Apply one host event.
    pub fn handle(&mut self, event: PageEvent) {
        if !self.is_mounted() {
            tracing::debug!(?event, "event after unmount ignored");
            return;
        }
        match event {
            PageEvent::Scroll { y } => self.scroll_to(y),
            PageEvent::Resize { width, height } => {
                self.observer.set_viewport(width, height);
                self.observer.fit_width(width);
                let y = self.observer.scroll_y();
                self.scroll_to(y);
            }
            PageEvent::Layout { id, bounds } => {
                self.observer.set_bounds(id, bounds);
                self.evaluate();
            }
            PageEvent::Advance(dt) => self.advance(dt),
            PageEvent::NavClick(id) => self.navigate(&id),
            PageEvent::OpenModal(kind) => {
                if kind == ModalKind::ImageShowcase && !self.modals.is_open(kind) {
                    self.showcase.select(0);
                }
                self.modals.open(kind);
            }
            PageEvent::CloseModal(kind) => self.modals.close(kind),
            PageEvent::ShowcaseNext | PageEvent::ShowcasePrev
                if !self.modals.is_open(ModalKind::ImageShowcase) =>
            {
                tracing::debug!("showcase closed; step ignored");
            }
            PageEvent::ShowcaseNext => {
                self.showcase.next();
            }
            PageEvent::ShowcasePrev => {
                self.showcase.prev();
            }
        }
    }

    fn scroll_to(&mut self, y: i32) {
        self.observer.scroll_to(y.clamp(0, self.max_scroll()));
        self.evaluate();
    }

    /// Deliver visibility changes, then latch new reveals and stop
    /// observing the sections they cover.
    fn evaluate(&mut self) {
        self.observer.evaluate();
        let Some(reveal) = self.reveal.as_mut() else {
            return;
        };
        let now = self.clock.now();
        let fresh: Vec<SectionId> = reveal.revealed().into_iter().skip(self.revealed_at.len()).collect();
        if fresh.is_empty() {
            return;
        }
        self.revealed_at.extend(fresh.into_iter().map(|id| (id, now)));
        let released = reveal.release_revealed(&mut self.observer);
        tracing::trace!(released, pending = reveal.pending(), "reveals latched");
    }

    fn navigate(&mut self, id: &SectionId) {
        let Some(bounds) = self.observer.bounds_of(id.as_str()) else {
            tracing::debug!(%id, "nav target not in document");
            return;
        };
        let viewport = self.observer.viewport();
        let page_height = u32::try_from(self.observer.content_bottom().max(0)).unwrap_or(u32::MAX);
        let y = anchor_scroll_offset(bounds.y, self.scroll_margin_top, page_height, viewport.height);
        tracing::debug!(%id, y, "scroll to anchor");
        self.scroll_to(y);
    }

    fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
        self.scheduler.advance(dt);
        for msg in self.scheduler.drain_messages() {
            match msg {
                PageMsg::RotateHeadline { ticks } => {
                    if let Some(transition) = self.rotator.advance_by(ticks) {
                        self.last_transition = Some(transition);
                    }
                }
            }
        }
    }

    fn start_rotation(&mut self) -> Result<(), ReelError> {
        let task = self
            .scheduler
            .schedule_repeating(self.rotator.interval(), Box::new(|ticks| PageMsg::RotateHeadline { ticks }))?;
        self.rotation_task = Some(task);
        Ok(())
    }

    /// Swap in a new phrase list. The new rotator starts at its first phrase
    /// on a fresh timer.
    pub fn replace_headline(&mut self, config: &RotatorConfig) -> Result<(), ReelError> {
        let rotator = RotatingText::from_config(config)?;
        if let Some(task) = self.rotation_task.take() {
            self.scheduler.cancel(task);
        }
        self.rotator = rotator;
        self.last_transition = None;
        if self.is_mounted() {
            self.start_rotation()?;
        }
        Ok(())
    }

    fn section_view(&self, id: &SectionId) -> SectionView {
        let revealed_at = self
            .revealed_at
            .iter()
            .find(|(known, _)| known == id)
            .map(|(_, at)| *at);
        let content = self.content.iter().find(|c| c.header.id == *id);
        let progress = content
            .map(|c| c.progress.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|bar| ProgressView {
                label: bar.label.clone(),
                percentage: bar.percentage,
                fill: if revealed_at.is_some() { bar.fraction() } else { 0.0 },
            })
            .collect();
        SectionView {
            id: id.clone(),
            header: content.map(|c| c.header.clone()),
            revealed_at,
            cards: content.map(|c| c.cards.clone()).unwrap_or_default(),
            progress,
            media: content.map(|c| c.media.clone()).unwrap_or_default(),
        }
    }

    pub fn frame(&self) -> PageFrame {
        PageFrame {
            now: self.clock.now(),
            scroll_y: self.observer.scroll_y(),
            viewport: self.observer.viewport(),
            nav: self.nav.items(),
            sections: self.section_ids.iter().map(|id| self.section_view(id)).collect(),
            revealed: self.revealed(),
            active: self.state.get(),
            headline: self.rotator.current().to_string(),
            headline_index: self.rotator.index(),
            headline_transition: self.last_transition.clone(),
            modals: self.modals.open_kinds(),
            sheet: self
                .table
                .as_ref()
                .filter(|_| self.modals.is_open(ModalKind::DataSheet))
                .map(DataTable::view),
            showcase: self
                .modals
                .is_open(ModalKind::ImageShowcase)
                .then(|| ShowcaseView {
                    assets: self.showcase.assets().to_vec(),
                    selected: self.showcase.selected_index(),
                }),
            mounted: self.is_mounted(),
        }
    }

    /// Detach both trackers and stop the headline timer. Safe to call twice.
    pub fn unmount(&mut self) {
        let Some(tracker) = self.tracker.take() else {
            return;
        };
        let mut released = tracker.detach(&mut self.observer);
        if let Some(reveal) = self.reveal.take() {
            released += reveal.detach(&mut self.observer);
        }
        if let Some(task) = self.rotation_task.take() {
            self.scheduler.cancel(task);
        }
        tracing::debug!(released, "page unmounted");
    }
}

impl Drop for ReportPage {
    fn drop(&mut self) {
        self.unmount();
    }
}
