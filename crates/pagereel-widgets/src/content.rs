#![forbid(unsafe_code)]

//! Content descriptors for the report sections.

use std::time::Duration;

use pagereel_core::SectionId;
use pagereel_core::animation::Transition;

use crate::icon::Icon;
use crate::media::{Gallery, MediaAsset};

/// Heading block at the top of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub id: SectionId,
    pub title: String,
    pub subtitle: Option<String>,
    pub icon: Icon,
}

impl SectionHeader {
    pub fn new(id: impl Into<SectionId>, title: impl Into<String>, icon: Icon) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            icon,
        }
    }

    #[must_use]
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

/// Headline figure with a caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataCard {
    pub icon: Icon,
    pub value: String,
    pub label: String,
    pub subtext: Option<String>,
}

impl DataCard {
    pub fn new(icon: Icon, value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            icon,
            value: value.into(),
            label: label.into(),
            subtext: None,
        }
    }
}

/// Completion bar that fills from empty the first time it is seen.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    pub label: String,
    pub percentage: u8,
    pub date: Option<String>,
}

impl ProgressBar {
    /// Ease-out fill from zero to the target width.
    pub const FILL: Transition = Transition::Tween {
        duration: Duration::from_millis(1500),
    };

    /// `percentage` is clamped to 100.
    pub fn new(label: impl Into<String>, percentage: u8) -> Self {
        Self {
            label: label.into(),
            percentage: percentage.min(100),
            date: None,
        }
    }

    /// Fill width as a fraction of the track.
    pub fn fraction(&self) -> f32 {
        f32::from(self.percentage) / 100.0
    }
}

/// Everything a section renders besides free text.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionContent {
    pub header: SectionHeader,
    pub cards: Vec<DataCard>,
    pub progress: Vec<ProgressBar>,
    pub media: Vec<MediaAsset>,
}

impl SectionContent {
    fn new(header: SectionHeader) -> Self {
        Self {
            header,
            cards: Vec::new(),
            progress: Vec::new(),
            media: Vec::new(),
        }
    }
}

/// Content of the seven report sections, in page order.
pub fn report_content() -> Vec<SectionContent> {
    report_sections()
        .into_iter()
        .map(|header| {
            let mut content = SectionContent::new(header);
            match content.header.id.as_str() {
                "arch" => content.media = architecture_gallery().assets().to_vec(),
                "visitor" => content.media = visitor_videos(),
                "enterprise" => {
                    content.cards = vec![
                        DataCard::new(Icon::Briefcase, "200+", "对接酒店"),
                        DataCard::new(Icon::CheckCircle, "105", "上线试用"),
                        DataCard::new(Icon::Users, "9886", "注册用户"),
                        DataCard::new(Icon::MessageSquare, "1.9w+", "AI问答"),
                    ];
                    content.progress = vec![
                        ProgressBar::new("年前全部上线", 90),
                        ProgressBar::new("硬件集成进度", 75),
                        ProgressBar::new("接入进度", 80),
                    ];
                }
                _ => {}
            }
            content
        })
        .collect()
}

/// Headers of the seven report sections, in page order.
pub fn report_sections() -> Vec<SectionHeader> {
    vec![
        SectionHeader::new("overview", "加强组织，加大投入", Icon::BarChart3),
        SectionHeader::new("arch", "构建“三层智能体组网架构”", Icon::Layers)
            .subtitle("我们在搭建的是一个“智能体组成的生产系统”"),
        SectionHeader::new("visitor", "新版「黄小西」游客端", Icon::Rocket)
            .subtitle("文旅智能服务超级入口"),
        SectionHeader::new("operation", "创新的运营组织形式", Icon::Network)
            .subtitle("生态共建与引流反哺"),
        SectionHeader::new("enterprise", "企业端智能体", Icon::Briefcase)
            .subtitle("已进入可复制、可推广阶段"),
        SectionHeader::new("gov", "政府端", Icon::LayoutDashboard)
            .subtitle("文旅智慧驾驶舱进入试点运行"),
        SectionHeader::new("ip", "IP与品牌生态", Icon::UserCircle).subtitle("“黄小西家族”"),
    ]
}

/// Screenshots shown in the architecture section.
pub fn architecture_gallery() -> Gallery {
    Gallery::new(
        [
            "/202new/image/0c518697542887c4c842bd55ec6f01f9.jpg",
            "/202new/image/2-1.png",
            "/202new/image/2f0940dc11c58bf3a57634678ec7dee0.jpg",
            "/202new/image/e8a91d5c8c3b6e0a9e53d83e7cc4d288.jpg",
        ]
        .iter()
        .enumerate()
        .map(|(i, src)| MediaAsset::image(*src, format!("展示图{}", i + 1)))
        .collect(),
    )
}

/// Contents of the image showcase modal.
pub fn showcase_gallery() -> Gallery {
    Gallery::new(vec![
        MediaAsset::lazy_image(
            "/202new/image/1d8057d625a906bbc2e3a6660be207ab.png",
            "运营效果展示",
        ),
        MediaAsset::image(
            "/202new/image/246f8d254afcdecd35a289c87a616e5c.png",
            "交互界面展示",
        ),
    ])
}

/// Product videos in the visitor section.
pub fn visitor_videos() -> Vec<MediaAsset> {
    vec![
        MediaAsset::video("/202new/video/f688a180eaffc8c281117271dd6bd668.mp4", None),
        MediaAsset::video(
            "/202new/video/2.mp4",
            Some("/202new/image/video-poster-placeholder.png".to_string()),
        ),
    ]
}
