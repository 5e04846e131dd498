#![forbid(unsafe_code)]

//! Animation timing descriptors.
//!
//! pagereel never integrates motion itself. [`stagger`] computes per-item
//! start delays, and [`transition`] carries the motion parameters the
//! rendering layer evaluates.

pub mod stagger;
pub mod transition;

pub use stagger::{StaggerFrom, stagger_delay, stagger_offsets, stagger_rank};
pub use transition::{MotionOffset, MotionVariants, Transition};
