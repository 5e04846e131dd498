#![forbid(unsafe_code)]

//! Closed set of icons referenced by the report page.

use std::fmt;
use std::str::FromStr;

macro_rules! icons {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// An icon glyph, named the way the icon set names it.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Icon {
            $($variant),+
        }

        impl Icon {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable kebab-case name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl FromStr for Icon {
            type Err = UnknownIcon;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    other => Err(UnknownIcon(other.to_string())),
                }
            }
        }
    };
}

icons! {
    Target => "target",
    Layers => "layers",
    Lightbulb => "lightbulb",
    Settings => "settings",
    Users => "users",
    Zap => "zap",
    ShoppingBag => "shopping-bag",
    UserCircle => "user-circle",
    LayoutDashboard => "layout-dashboard",
    Cpu => "cpu",
    ArrowRight => "arrow-right",
    PlayCircle => "play-circle",
    Network => "network",
    Share2 => "share-2",
    Rocket => "rocket",
    Globe => "globe",
    Compass => "compass",
    Briefcase => "briefcase",
    PenTool => "pen-tool",
    MessageSquare => "message-square",
    Repeat => "repeat",
    MapPin => "map-pin",
    Calendar => "calendar",
    CreditCard => "credit-card",
    BarChart3 => "bar-chart-3",
    Video => "video",
    Image => "image",
    X => "x",
    FileSpreadsheet => "file-spreadsheet",
    CheckCircle => "check-circle",
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name that matches no [`Icon`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIcon(pub String);

impl fmt::Display for UnknownIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown icon: {:?}", self.0)
    }
}

impl std::error::Error for UnknownIcon {}
