#![forbid(unsafe_code)]

//! Core: geometry, visibility policies, sections, and stagger math.
//!
//! # Role in pagereel
//! `pagereel-core` is the platform-independent layer. It knows how to decide
//! whether a page region counts as "in view" under a [`VisibilityPolicy`],
//! how per-character animation delays cascade across a phrase, and what a
//! precondition violation looks like ([`ReelError`]).
//!
//! # How it fits in the system
//! `pagereel-runtime` adds state cells and scheduling on top of these types,
//! `pagereel-widgets` builds the section tracker and text rotator from them,
//! and `pagereel-web` supplies a concrete [`VisibilityObserver`] backed by
//! host-reported layout geometry.

pub mod animation;
pub mod error;
pub mod geometry;
pub mod section;
pub mod visibility;

pub use error::ReelError;
pub use geometry::{Insets, Margin, Rect};
pub use section::{Section, SectionId};
pub use visibility::{
    BatchCallback, ObservationHandle, VisibilityEntry, VisibilityObserver, VisibilityPolicy,
};
