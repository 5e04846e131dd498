#![forbid(unsafe_code)]

//! Modal overlays.
//!
//! The page has two overlays: an image showcase and a spreadsheet view of
//! the data table. Each has its own open flag; opening one does not close
//! the other. Backdrop clicks and the close button both map to
//! [`ModalSet::close`].

use std::fmt;

use crate::icon::Icon;

bitflags::bitflags! {
    /// Which modals are open.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModalSet: u8 {
        const IMAGE_SHOWCASE = 0b01;
        const DATA_SHEET     = 0b10;
    }
}

/// A single modal overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    /// Screenshots of the operations dashboard.
    ImageShowcase,
    /// The hotel operations table.
    DataSheet,
}

impl ModalKind {
    pub const ALL: [Self; 2] = [Self::ImageShowcase, Self::DataSheet];

    pub const fn flag(self) -> ModalSet {
        match self {
            Self::ImageShowcase => ModalSet::IMAGE_SHOWCASE,
            Self::DataSheet => ModalSet::DATA_SHEET,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::ImageShowcase => "运营效果展示",
            Self::DataSheet => "酒店智能体深度运营情况表",
        }
    }

    pub const fn icon(self) -> Icon {
        match self {
            Self::ImageShowcase => Icon::Image,
            Self::DataSheet => Icon::FileSpreadsheet,
        }
    }
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ImageShowcase => "image-showcase",
            Self::DataSheet => "data-sheet",
        })
    }
}

impl ModalSet {
    pub fn open(&mut self, kind: ModalKind) {
        self.insert(kind.flag());
    }

    pub fn close(&mut self, kind: ModalKind) {
        self.remove(kind.flag());
    }

    pub fn toggle_kind(&mut self, kind: ModalKind) {
        self.toggle(kind.flag());
    }

    pub fn close_all(&mut self) {
        *self = Self::empty();
    }

    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.contains(kind.flag())
    }

    /// Open modals in stacking order.
    pub fn open_kinds(&self) -> Vec<ModalKind> {
        ModalKind::ALL
            .into_iter()
            .filter(|kind| self.is_open(*kind))
            .collect()
    }
}
