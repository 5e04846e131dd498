#![forbid(unsafe_code)]

//! Stagger offsets for cascading per-item animations.
//!
//! Item `i` of `count` starts after `step * rank(i)`, where the rank counts
//! from the first item or from the last one depending on [`StaggerFrom`].
//!
//! # Invariants
//!
//! 1. The item at the origin end has delay zero.
//! 2. Delays strictly increase moving away from the origin (for `step > 0`).
//! 3. `stagger_offsets(count, ..)` has exactly `count` entries.

use std::time::Duration;

/// Which end of the sequence animates first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum StaggerFrom {
    /// First item starts immediately; later items follow.
    First,
    /// Last item starts immediately; earlier items follow.
    #[default]
    Last,
}

/// Rank of `index` in a sequence of `count` items.
///
/// `count` must be greater than `index`.
#[inline]
pub fn stagger_rank(index: usize, count: usize, from: StaggerFrom) -> usize {
    debug_assert!(index < count, "index {index} out of range for {count} items");
    match from {
        StaggerFrom::First => index,
        StaggerFrom::Last => count - 1 - index,
    }
}

/// Start delay of `index` in a sequence of `count` items.
#[inline]
pub fn stagger_delay(index: usize, count: usize, step: Duration, from: StaggerFrom) -> Duration {
    let rank = stagger_rank(index, count, from);
    step.saturating_mul(u32::try_from(rank).unwrap_or(u32::MAX))
}

/// Start delays for every item, in item order.
#[must_use]
pub fn stagger_offsets(count: usize, step: Duration, from: StaggerFrom) -> Vec<Duration> {
    (0..count)
        .map(|i| stagger_delay(i, count, step, from))
        .collect()
}
