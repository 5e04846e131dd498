#![forbid(unsafe_code)]

//! Rotating headline text.
//!
//! [`RotatingText`] cycles a fixed, non-empty list of phrases. Each
//! [`tick`](RotatingText::tick) advances to the next phrase and describes the
//! per-character exit/enter cascade the renderer should play.
//!
//! The rotator owns no timer. The page schedules one repeating task per
//! rotator and forwards each tick; tearing the page down cancels the task.
//!
//! # Invariants
//!
//! 1. `index()` is always in `[0, len)`.
//! 2. After `n` ticks from mount, `index() == n % len`.
//! 3. A glyph's delay is `stagger * rank`, where rank counts from the first or
//!    the last glyph of its own phrase.
//! 4. Whitespace glyphs render as U+00A0 so the span keeps its width.

use std::time::Duration;

use pagereel_core::ReelError;
use pagereel_core::animation::{MotionVariants, StaggerFrom, Transition, stagger_delay};
use pagereel_runtime::RotatorConfig;
use unicode_segmentation::UnicodeSegmentation;

/// Non-breaking space.
pub const NBSP: char = '\u{00A0}';

/// Index after one advance. `len` must be non-zero.
#[inline]
pub fn next_index(current: usize, len: usize) -> usize {
    (current + 1) % len
}

/// Index after `ticks` advances from mount. `len` must be non-zero.
#[inline]
pub fn index_after(ticks: u64, len: usize) -> usize {
    (ticks % len as u64) as usize
}

/// One animated character of a phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Grapheme as rendered (whitespace already replaced by NBSP).
    pub text: String,
    /// Position within the phrase, in graphemes.
    pub position: usize,
    /// Animation start delay.
    pub delay: Duration,
}

/// Split `phrase` into glyphs carrying their stagger delays.
pub fn split_glyphs(phrase: &str, step: Duration, from: StaggerFrom) -> Vec<Glyph> {
    let graphemes: Vec<&str> = phrase.graphemes(true).collect();
    let count = graphemes.len();
    graphemes
        .into_iter()
        .enumerate()
        .map(|(position, g)| Glyph {
            text: if g.chars().all(char::is_whitespace) {
                NBSP.to_string()
            } else {
                g.to_string()
            },
            position,
            delay: stagger_delay(position, count, step, from),
        })
        .collect()
}

/// What the renderer plays when the phrase changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseTransition {
    pub from_index: usize,
    pub to_index: usize,
    /// Glyphs of the outgoing phrase, animating to the exit offset.
    pub exit: Vec<Glyph>,
    /// Glyphs of the incoming phrase, animating from the initial offset.
    pub enter: Vec<Glyph>,
    pub transition: Transition,
    pub variants: MotionVariants,
}

impl PhraseTransition {
    /// Time from the tick until the last glyph starts moving.
    pub fn cascade_span(&self) -> Duration {
        self.exit
            .iter()
            .chain(&self.enter)
            .map(|g| g.delay)
            .max()
            .unwrap_or_default()
    }
}

/// Cycles a fixed list of phrases.
#[derive(Debug, Clone)]
pub struct RotatingText {
    texts: Vec<String>,
    index: usize,
    ticks: u64,
    interval: Duration,
    stagger: Duration,
    stagger_from: StaggerFrom,
    transition: Transition,
    variants: MotionVariants,
}

impl RotatingText {
    /// Build a rotator showing `texts[0]`.
    pub fn new<I, S>(texts: I, interval: Duration) -> Result<Self, ReelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let texts: Vec<String> = texts.into_iter().map(Into::into).collect();
        if texts.is_empty() {
            return Err(ReelError::EmptyRotation);
        }
        if interval.is_zero() {
            return Err(ReelError::NonPositiveInterval(interval));
        }
        Ok(Self {
            texts,
            index: 0,
            ticks: 0,
            interval,
            stagger: Duration::from_millis(25),
            stagger_from: StaggerFrom::default(),
            transition: Transition::default(),
            variants: MotionVariants::default(),
        })
    }

    pub fn from_config(config: &RotatorConfig) -> Result<Self, ReelError> {
        Ok(Self::new(config.texts.iter().cloned(), config.rotation_interval())?
            .stagger(config.stagger_step())
            .stagger_from(config.stagger_from)
            .transition(config.transition))
    }

    #[must_use]
    pub fn stagger(mut self, step: Duration) -> Self {
        self.stagger = step;
        self
    }

    #[must_use]
    pub fn stagger_from(mut self, from: StaggerFrom) -> Self {
        self.stagger_from = from;
        self
    }

    #[must_use]
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    #[must_use]
    pub fn variants(mut self, variants: MotionVariants) -> Self {
        self.variants = variants;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Always `false`; construction rejects an empty list.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Number of ticks received since mount.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The phrase on screen.
    pub fn current(&self) -> &str {
        &self.texts[self.index]
    }

    /// Glyphs of the phrase on screen, as they were revealed.
    pub fn current_glyphs(&self) -> Vec<Glyph> {
        split_glyphs(self.current(), self.stagger, self.stagger_from)
    }

    /// Advance one phrase.
    ///
    /// Returns `None` when there is only one phrase: the index wraps to the
    /// same value and there is nothing to animate.
    pub fn tick(&mut self) -> Option<PhraseTransition> {
        self.advance_by(1)
    }

    /// Advance `ticks` phrases at once, as after a stalled timer. Only the
    /// net change is animated; `None` when the phrase ends up unchanged.
    pub fn advance_by(&mut self, ticks: u64) -> Option<PhraseTransition> {
        self.ticks = self.ticks.wrapping_add(ticks);
        let from_index = self.index;
        let len = self.texts.len();
        self.index = (from_index + index_after(ticks, len)) % len;
        tracing::trace!(from = from_index, to = self.index, ticks, "headline tick");

        if from_index == self.index {
            return None;
        }
        Some(PhraseTransition {
            from_index,
            to_index: self.index,
            exit: split_glyphs(&self.texts[from_index], self.stagger, self.stagger_from),
            enter: split_glyphs(&self.texts[self.index], self.stagger, self.stagger_from),
            transition: self.transition,
            variants: self.variants,
        })
    }
}
