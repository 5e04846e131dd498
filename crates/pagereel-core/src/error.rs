#![forbid(unsafe_code)]

//! Precondition errors shared by every pagereel component.
//!
//! All of these are raised at construction or registration time. Once a
//! tracker or rotator exists, its runtime paths are infallible.

use core::time::Duration;

/// A violated precondition detected while building a component.
#[derive(Debug, Clone, PartialEq)]
pub enum ReelError {
    /// A text rotator was given no phrases.
    EmptyRotation,
    /// A rotation interval of zero was requested.
    NonPositiveInterval(Duration),
    /// Two sections (or two navigation entries) share an id.
    DuplicateSection(String),
    /// A section or navigation id was empty.
    EmptySectionId,
    /// A navigation entry points at no section.
    NavWithoutSection(String),
    /// A section has no navigation entry.
    SectionWithoutNav(String),
    /// A visibility threshold outside `[0.0, 1.0]` (or NaN).
    InvalidThreshold(f32),
    /// A root-margin string that could not be parsed.
    InvalidMargin(String),
}

impl core::fmt::Display for ReelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyRotation => write!(f, "rotation sequence must contain at least one phrase"),
            Self::NonPositiveInterval(interval) => {
                write!(f, "rotation interval must be positive (got {interval:?})")
            }
            Self::DuplicateSection(id) => write!(f, "duplicate section id: {id:?}"),
            Self::EmptySectionId => write!(f, "section id must not be empty"),
            Self::NavWithoutSection(id) => write!(f, "navigation entry {id:?} has no section"),
            Self::SectionWithoutNav(id) => write!(f, "section {id:?} has no navigation entry"),
            Self::InvalidThreshold(value) => {
                write!(f, "visibility threshold must lie in [0.0, 1.0] (got {value})")
            }
            Self::InvalidMargin(raw) => write!(f, "invalid root margin: {raw:?}"),
        }
    }
}

impl std::error::Error for ReelError {}
