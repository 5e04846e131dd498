#![forbid(unsafe_code)]

//! Page configuration as data.
//!
//! Captures everything a report page is built from (viewport, tracker
//! policy, headline rotator, navigation entries, section layout) as a single
//! [`PageConfig`] that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # report.toml
//! [tracker]
//! policy = { band = "-40% 0px -40% 0px" }
//!
//! [rotator]
//! texts = ["fast", "local", "open"]
//! interval_ms = 1500
//! ```
//!
//! ```rust,ignore
//! let config = PageConfig::from_toml_file("report.toml")?;
//! let config = PageConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `PageConfig::default()` reproduces the strategic report page: a 0.2
//! area threshold, seven navigation entries, three headline phrases rotating
//! every two seconds with a 25ms last-to-first stagger.

#[cfg(feature = "page-config")]
use std::path::Path;

#[cfg(feature = "page-config")]
use serde::{Deserialize, Serialize};

use pagereel_core::animation::{StaggerFrom, Transition};
use pagereel_core::section::{ensure_one_to_one, ensure_unique_ids};
use pagereel_core::{ReelError, SectionId, VisibilityPolicy};
use web_time::Duration;

/// The report's navigation entries, in display order.
const DEFAULT_NAV: [(&str, &str); 7] = [
    ("overview", "组织投入"),
    ("arch", "组网架构"),
    ("visitor", "游客端"),
    ("operation", "运营组织"),
    ("enterprise", "企业端"),
    ("gov", "政府端"),
    ("ip", "IP生态"),
];

const DEFAULT_PHRASES: [&str; 3] = ["多彩", "智能", "AI应用生态"];

/// Height of the full-screen hero above the first section.
const HERO_HEIGHT: u32 = 900;
/// Height of each content section in the default layout.
const SECTION_HEIGHT: u32 = 1200;
/// Bottom margin between sections (`mb-32`).
const SECTION_GAP: u32 = 128;

// ---------------------------------------------------------------------------
// Top-level PageConfig
// ---------------------------------------------------------------------------

/// Top-level configuration of a report page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "page-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "page-config", serde(default))]
pub struct PageConfig {
    pub viewport: ViewportConfig,
    pub tracker: TrackerConfig,
    pub rotator: RotatorConfig,
    pub nav: Vec<NavEntryConfig>,
    /// Section layout used when no host reports geometry (CLI simulation).
    pub sections: Vec<SectionLayoutConfig>,
    /// Path of the JSON table fixture, relative to the config file.
    pub data: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        let nav: Vec<NavEntryConfig> = DEFAULT_NAV
            .iter()
            .map(|(id, label)| NavEntryConfig {
                id: (*id).to_string(),
                label: (*label).to_string(),
            })
            .collect();
        let sections = nav
            .iter()
            .enumerate()
            .map(|(i, entry)| SectionLayoutConfig {
                id: entry.id.clone(),
                top: (HERO_HEIGHT + i as u32 * (SECTION_HEIGHT + SECTION_GAP)) as i32,
                height: SECTION_HEIGHT,
            })
            .collect();

        Self {
            viewport: ViewportConfig::default(),
            tracker: TrackerConfig::default(),
            rotator: RotatorConfig::default(),
            nav,
            sections,
            data: None,
        }
    }
}

impl PageConfig {
    /// Check every precondition a page relies on.
    pub fn validate(&self) -> Result<(), ReelError> {
        self.tracker.policy.validate()?;
        self.rotator.validate()?;

        let nav_ids: Vec<SectionId> = self.nav.iter().map(|e| SectionId::new(&e.id)).collect();
        ensure_unique_ids(&nav_ids)?;
        let section_ids: Vec<SectionId> =
            self.sections.iter().map(|s| SectionId::new(&s.id)).collect();
        ensure_unique_ids(&section_ids)?;
        ensure_one_to_one(&nav_ids, &section_ids)?;
        Ok(())
    }

    /// Total page height implied by the section layout.
    pub fn page_height(&self) -> u32 {
        self.sections
            .iter()
            .map(|s| (s.top.max(0) as u32).saturating_add(s.height))
            .max()
            .unwrap_or(0)
            .max(self.viewport.height)
    }

    /// Load from a TOML string.
    #[cfg(feature = "page-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, PageConfigError> {
        let config: Self = toml::from_str(s).map_err(PageConfigError::Toml)?;
        config.validate().map_err(PageConfigError::Invalid)?;
        Ok(config)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "page-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PageConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PageConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "page-config")]
    pub fn from_json_str(s: &str) -> Result<Self, PageConfigError> {
        let config: Self = serde_json::from_str(s).map_err(PageConfigError::Json)?;
        config.validate().map_err(PageConfigError::Invalid)?;
        Ok(config)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "page-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PageConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PageConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load from a file, choosing the format by extension (`.json` or TOML).
    #[cfg(feature = "page-config")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PageConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "page-config")]
    pub fn to_toml_string(&self) -> Result<String, PageConfigError> {
        toml::to_string_pretty(self).map_err(PageConfigError::TomlSer)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Initial viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "page-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "page-config", serde(default))]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 900,
        }
    }
}

/// Section tracker parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "page-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "page-config", serde(default))]
pub struct TrackerConfig {
    pub policy: VisibilityPolicy,
    /// Space kept above a section when navigation scrolls to it (`scroll-mt-24`).
    pub scroll_margin_top: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            policy: VisibilityPolicy::Threshold(0.2),
            scroll_margin_top: 96,
        }
    }
}

/// Headline rotator parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "page-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "page-config", serde(default))]
pub struct RotatorConfig {
    pub texts: Vec<String>,
    pub interval_ms: u64,
    pub stagger_from: StaggerFrom,
    pub stagger_ms: u64,
    pub transition: Transition,
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            texts: DEFAULT_PHRASES.iter().map(|s| (*s).to_string()).collect(),
            interval_ms: 2000,
            stagger_from: StaggerFrom::Last,
            stagger_ms: 25,
            transition: Transition::HEADLINE_SPRING,
        }
    }
}

impl RotatorConfig {
    pub fn rotation_interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn stagger_step(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    pub fn validate(&self) -> Result<(), ReelError> {
        if self.texts.is_empty() {
            return Err(ReelError::EmptyRotation);
        }
        if self.interval_ms == 0 {
            return Err(ReelError::NonPositiveInterval(Duration::ZERO));
        }
        Ok(())
    }
}

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "page-config", derive(Serialize, Deserialize))]
pub struct NavEntryConfig {
    pub id: String,
    pub label: String,
}

/// Static layout of one section in page coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "page-config", derive(Serialize, Deserialize))]
pub struct SectionLayoutConfig {
    pub id: String,
    pub top: i32,
    pub height: u32,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a page configuration.
#[cfg(feature = "page-config")]
#[derive(Debug)]
pub enum PageConfigError {
    /// Failed to read the file.
    Io(std::io::Error),
    /// Failed to parse TOML.
    Toml(toml::de::Error),
    /// Failed to serialize TOML.
    TomlSer(toml::ser::Error),
    /// Failed to parse JSON.
    Json(serde_json::Error),
    /// Parsed, but a precondition does not hold.
    Invalid(ReelError),
}

#[cfg(feature = "page-config")]
impl std::fmt::Display for PageConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "page config I/O error: {e}"),
            Self::Toml(e) => write!(f, "page config TOML parse error: {e}"),
            Self::TomlSer(e) => write!(f, "page config TOML serialize error: {e}"),
            Self::Json(e) => write!(f, "page config JSON parse error: {e}"),
            Self::Invalid(e) => write!(f, "invalid page config: {e}"),
        }
    }
}

#[cfg(feature = "page-config")]
impl std::error::Error for PageConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::TomlSer(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}
