#![forbid(unsafe_code)]

//! Media references and image galleries.
//!
//! Paths are opaque; nothing here touches the file system.

/// An image or video shown on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaAsset {
    Image {
        src: String,
        alt: String,
        /// Defer loading until near the viewport.
        lazy: bool,
    },
    Video {
        src: String,
        poster: Option<String>,
    },
}

impl MediaAsset {
    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::Image {
            src: src.into(),
            alt: alt.into(),
            lazy: false,
        }
    }

    pub fn lazy_image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::Image {
            src: src.into(),
            alt: alt.into(),
            lazy: true,
        }
    }

    pub fn video(src: impl Into<String>, poster: Option<String>) -> Self {
        Self::Video {
            src: src.into(),
            poster,
        }
    }

    pub fn src(&self) -> &str {
        match self {
            Self::Image { src, .. } | Self::Video { src, .. } => src,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video { .. })
    }
}

/// Ordered assets with one selected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gallery {
    assets: Vec<MediaAsset>,
    selected: usize,
}

impl Gallery {
    pub fn new(assets: Vec<MediaAsset>) -> Self {
        Self { assets, selected: 0 }
    }

    pub fn assets(&self) -> &[MediaAsset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&MediaAsset> {
        self.assets.get(self.selected)
    }

    /// Select `index`; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.assets.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> Option<&MediaAsset> {
        if !self.assets.is_empty() {
            self.selected = (self.selected + 1) % self.assets.len();
        }
        self.selected()
    }

    pub fn prev(&mut self) -> Option<&MediaAsset> {
        if !self.assets.is_empty() {
            self.selected = (self.selected + self.assets.len() - 1) % self.assets.len();
        }
        self.selected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery() -> Gallery {
        Gallery::new(
            (1..=3)
                .map(|i| MediaAsset::image(format!("/img/{i}.png"), format!("展示图{i}")))
                .collect(),
        )
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut g = gallery();
        assert_eq!(g.prev().map(MediaAsset::src), Some("/img/3.png"));
        assert_eq!(g.next().map(MediaAsset::src), Some("/img/1.png"));
        g.next();
        assert_eq!(g.selected_index(), 1);
    }

    #[test]
    fn empty_gallery_selects_nothing() {
        let mut g = Gallery::default();
        assert!(g.next().is_none());
        assert!(g.prev().is_none());
        assert!(!g.select(0));
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut g = gallery();
        assert!(g.select(2));
        assert!(!g.select(3));
        assert_eq!(g.selected_index(), 2);
    }

    #[test]
    fn video_keeps_poster() {
        let v = MediaAsset::video("/v.mp4", Some("/poster.png".into()));
        assert!(v.is_video());
        assert_eq!(v.src(), "/v.mp4");
    }
}
