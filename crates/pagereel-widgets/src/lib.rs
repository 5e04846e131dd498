#![forbid(unsafe_code)]

//! Page components for pagereel.
//!
//! Every component here is a plain state machine. Nothing schedules itself
//! or holds a platform handle; the page coordinator in `pagereel-web` feeds
//! them visibility batches, timer messages, and clicks.

pub mod content;
pub mod data_table;
pub mod icon;
pub mod media;
pub mod modal;
pub mod nav;
pub mod reveal;
pub mod rotating_text;
pub mod section_tracker;

pub use content::{DataCard, ProgressBar, SectionContent, SectionHeader};
pub use data_table::{DataTable, TableData, TableError, TableView};
pub use icon::Icon;
pub use media::{Gallery, MediaAsset};
pub use modal::{ModalKind, ModalSet};
pub use nav::{BoundNav, NavBar, NavEntry, NavItem};
pub use reveal::RevealTracker;
pub use rotating_text::{Glyph, PhraseTransition, RotatingText};
pub use section_tracker::{ActiveSection, ActiveSectionState, SectionTracker};
