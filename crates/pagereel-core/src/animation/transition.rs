#![forbid(unsafe_code)]

//! Motion parameters handed through to the rendering layer.
//!
//! Nothing here is evaluated by pagereel's own logic. A host animation
//! engine reads these values when it builds per-glyph motion.

use std::time::Duration;

/// How a glyph moves between its offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Transition {
    /// Damped harmonic oscillator.
    ///
    /// - **stiffness** (k): restoring force. Higher = faster response.
    /// - **damping** (c): velocity drag. Higher = less oscillation.
    Spring { damping: f64, stiffness: f64 },
    /// Fixed-duration tween.
    Tween {
        #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
        duration: Duration,
    },
}

impl Transition {
    /// Spring used by the headline rotator.
    pub const HEADLINE_SPRING: Self = Self::Spring {
        damping: 30.0,
        stiffness: 400.0,
    };

    /// Damping ratio `c / (2√k)` for a unit-mass spring; `None` for tweens.
    ///
    /// Below 1.0 the spring overshoots; at or above 1.0 it settles without
    /// overshoot.
    pub fn damping_ratio(&self) -> Option<f64> {
        match *self {
            Self::Spring { damping, stiffness } if stiffness > 0.0 => {
                Some(damping / (2.0 * stiffness.sqrt()))
            }
            _ => None,
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::HEADLINE_SPRING
    }
}

/// Vertical offset of a glyph, as a percentage of its own height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionOffset {
    pub y_percent: f32,
}

impl MotionOffset {
    pub const fn y(y_percent: f32) -> Self {
        Self { y_percent }
    }
}

/// Start, resting, and leaving offsets of an animated glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionVariants {
    pub initial: MotionOffset,
    pub animate: MotionOffset,
    pub exit: MotionOffset,
}

impl Default for MotionVariants {
    /// Glyphs rise from below and leave upward past the clip edge.
    fn default() -> Self {
        Self {
            initial: MotionOffset::y(100.0),
            animate: MotionOffset::y(0.0),
            exit: MotionOffset::y(-120.0),
        }
    }
}

#[cfg(feature = "serde")]
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
