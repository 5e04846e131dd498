use std::io::Write;
use std::time::Duration;

use clap::Args;
use pagereel_core::{Insets, VisibilityPolicy};
use pagereel_web::{PageEvent, PageFrame, ReportPage};
use pagereel_widgets::{ActiveSection, NavBar};

use crate::cli::ConfigArgs;
use crate::error::Result;

#[derive(Debug, Clone, Default, Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub source: ConfigArgs,

    /// Scroll distance per step in pixels. Defaults to half the viewport.
    #[arg(long)]
    pub step: Option<u32>,

    /// Milliseconds of page time that pass between steps.
    #[arg(long, default_value_t = 250)]
    pub dwell_ms: u64,

    /// Override the tracker with an area threshold in [0, 1].
    #[arg(long, conflicts_with = "band")]
    pub threshold: Option<f32>,

    /// Override the tracker with a root-margin band, e.g. "-40% 0px -40% 0px".
    #[arg(long, allow_hyphen_values = true)]
    pub band: Option<Insets>,

    /// Emit one JSON object per step instead of text.
    #[arg(long)]
    pub json: bool,
}

pub fn run_simulate(args: SimulateArgs, out: &mut dyn Write) -> Result<()> {
    let mut config = args.source.load()?;
    if let Some(t) = args.threshold {
        config.tracker.policy = VisibilityPolicy::Threshold(t);
    } else if let Some(band) = args.band {
        config.tracker.policy = VisibilityPolicy::Band(band);
    }

    let nav = NavBar::from_config(&config.nav)?;
    let mut page = ReportPage::mount(&config)?;
    let step = args.step.unwrap_or(config.viewport.height / 2).max(1);
    let step = i32::try_from(step).unwrap_or(i32::MAX);
    let dwell = Duration::from_millis(args.dwell_ms);
    tracing::info!(policy = ?config.tracker.policy, step, "simulating scroll");

    let max = page.max_scroll();
    let mut y = 0i32;
    loop {
        page.handle(PageEvent::Scroll { y });
        page.handle(PageEvent::Advance(dwell));
        let frame = page.frame();
        if args.json {
            writeln!(out, "{}", frame_json(&frame))?;
        } else {
            writeln!(out, "{}", frame_line(&frame, &nav))?;
        }
        if y >= max {
            break;
        }
        y = y.saturating_add(step).min(max);
    }

    page.unmount();
    Ok(())
}

fn frame_line(frame: &PageFrame, nav: &NavBar) -> String {
    let active = match &frame.active {
        ActiveSection::Idle => "-".to_string(),
        ActiveSection::Active(id) => id.to_string(),
    };
    format!(
        "y={:<6} active={:<11} headline={:<8} {}",
        frame.scroll_y,
        active,
        frame.headline,
        nav.render_line(&frame.active)
    )
}

fn frame_json(frame: &PageFrame) -> serde_json::Value {
    serde_json::json!({
        "t_ms": frame.now.as_millis() as u64,
        "y": frame.scroll_y,
        "active": frame.active.id().map(|id| id.as_str()),
        "headline": frame.headline,
        "revealed": frame.revealed.iter().map(|id| id.as_str()).collect::<Vec<_>>(),
        "nav": frame
            .nav
            .iter()
            .map(|item| serde_json::json!({
                "href": item.href,
                "label": item.label,
                "active": item.active,
            }))
            .collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: SimulateArgs) -> String {
        let mut out = Vec::new();
        run_simulate(args, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn first_step_is_idle_and_last_reaches_ip() {
        let text = run(SimulateArgs {
            dwell_ms: 250,
            ..SimulateArgs::default()
        });
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("y=0 "));
        assert!(lines[0].contains("active=- "));
        assert!(lines.last().unwrap().contains("[IP生态]"));
    }

    #[test]
    fn json_lines_parse() {
        let text = run(SimulateArgs {
            step: Some(2000),
            json: true,
            ..SimulateArgs::default()
        });
        let frames: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(frames[0]["active"], serde_json::Value::Null);
        assert_eq!(frames[1]["y"], 2000);
        assert_eq!(frames[1]["active"], "arch");
        assert_eq!(frames[0]["revealed"], serde_json::json!([]));
        let revealed = frames[1]["revealed"].as_array().unwrap();
        assert!(revealed.contains(&serde_json::json!("arch")));
    }

    #[test]
    fn invalid_threshold_is_reported() {
        let err = run_simulate(
            SimulateArgs {
                threshold: Some(1.5),
                ..SimulateArgs::default()
            },
            &mut Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
