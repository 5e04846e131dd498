#![forbid(unsafe_code)]

//! Geometric primitives in page coordinates.
//!
//! Coordinates are integer CSS pixels with the origin at the top-left of the
//! document. Edges are computed in `i64` so a tall page scrolled far down
//! never overflows.

use core::fmt;
use core::str::FromStr;

use crate::error::ReelError;

/// An axis-aligned rectangle for section bounds and viewports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Area in square pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && (x as i64) < self.right() && y >= self.y && (y as i64) < self.bottom()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        self.clip(other, false)
    }

    /// Like [`intersection_opt`](Self::intersection_opt), but rectangles that
    /// only share an edge produce a zero-area `Some`.
    ///
    /// Visibility evaluation needs this: a section whose top edge sits exactly
    /// on the viewport's bottom edge is "touching" the root.
    #[inline]
    pub fn touching_intersection(&self, other: &Rect) -> Option<Rect> {
        self.clip(other, true)
    }

    fn clip(&self, other: &Rect, allow_edge: bool) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        let (x64, y64) = (x as i64, y as i64);

        let overlaps = if allow_edge {
            x64 <= right && y64 <= bottom
        } else {
            x64 < right && y64 < bottom
        };
        overlaps.then(|| Rect::new(x, y, (right - x64) as u32, (bottom - y64) as u32))
    }

    /// Grow (positive margins) or shrink (negative margins) the rectangle.
    ///
    /// Percentages resolve against this rectangle's own height for the
    /// vertical edges and its width for the horizontal edges. A rectangle
    /// shrunk past zero collapses to zero size at its shifted origin.
    pub fn expand(&self, insets: &Insets) -> Rect {
        let top = insets.top.resolve(self.height);
        let bottom = insets.bottom.resolve(self.height);
        let left = insets.left.resolve(self.width);
        let right = insets.right.resolve(self.width);

        let x = (self.x as i64 - left).clamp(i32::MIN as i64, i32::MAX as i64);
        let y = (self.y as i64 - top).clamp(i32::MIN as i64, i32::MAX as i64);
        let width = (self.width as i64 + left + right).clamp(0, u32::MAX as i64);
        let height = (self.height as i64 + top + bottom).clamp(0, u32::MAX as i64);

        Rect::new(x as i32, y as i32, width as u32, height as u32)
    }
}

/// One edge offset of a root margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Margin {
    /// Absolute offset in pixels.
    Px(i32),
    /// Offset as a percentage of the root's extent on the same axis.
    Percent(f32),
}

impl Margin {
    /// Resolve to pixels against an extent (width or height).
    pub fn resolve(self, extent: u32) -> i64 {
        match self {
            Self::Px(px) => px as i64,
            Self::Percent(pct) => (extent as f64 * pct as f64 / 100.0).round() as i64,
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::Px(0)
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

impl FromStr for Margin {
    type Err = ReelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim();
        let invalid = || ReelError::InvalidMargin(raw.to_string());

        if let Some(number) = token.strip_suffix('%') {
            let pct: f32 = number.parse().map_err(|_| invalid())?;
            if !pct.is_finite() {
                return Err(invalid());
            }
            return Ok(Self::Percent(pct));
        }
        if let Some(number) = token.strip_suffix("px") {
            return number.parse().map(Self::Px).map_err(|_| invalid());
        }
        // A bare zero is the only unitless value allowed.
        if token == "0" {
            return Ok(Self::Px(0));
        }
        Err(invalid())
    }
}

/// Root margins on four sides, in CSS order (top, right, bottom, left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Insets {
    pub top: Margin,
    pub right: Margin,
    pub bottom: Margin,
    pub left: Margin,
}

impl Insets {
    /// Create insets with specific values.
    pub const fn new(top: Margin, right: Margin, bottom: Margin, left: Margin) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same margin on every side.
    pub const fn all(margin: Margin) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    /// Vertical and horizontal margins (the two-value CSS shorthand).
    pub const fn symmetric(vertical: Margin, horizontal: Margin) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// A horizontal band covering `height_pct` percent of the viewport,
    /// centred vertically.
    ///
    /// `central_band(20.0)` is `-40% 0px -40% 0px`.
    pub fn central_band(height_pct: f32) -> Self {
        let shrink = -((100.0 - height_pct.clamp(0.0, 100.0)) / 2.0);
        Self::symmetric(Margin::Percent(shrink), Margin::Px(0))
    }
}

impl fmt::Display for Insets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl FromStr for Insets {
    type Err = ReelError;

    /// Parse the CSS `rootMargin` shorthand with one to four components.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts = raw
            .split_whitespace()
            .map(str::parse::<Margin>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ReelError::InvalidMargin(raw.to_string()))?;

        match parts.as_slice() {
            [all] => Ok(Self::all(*all)),
            [vertical, horizontal] => Ok(Self::symmetric(*vertical, *horizontal)),
            [top, horizontal, bottom] => Ok(Self::new(*top, *horizontal, *bottom, *horizontal)),
            [top, right, bottom, left] => Ok(Self::new(*top, *right, *bottom, *left)),
            _ => Err(ReelError::InvalidMargin(raw.to_string())),
        }
    }
}

impl TryFrom<String> for Insets {
    type Error = ReelError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Insets> for String {
    fn from(insets: Insets) -> Self {
        insets.to_string()
    }
}
