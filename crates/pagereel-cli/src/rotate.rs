use std::io::Write;
use std::time::Duration;

use clap::Args;
use pagereel_runtime::{Scheduler, ThreadScheduler};
use pagereel_widgets::RotatingText;

use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Default, Args)]
pub struct RotateArgs {
    #[command(flatten)]
    pub source: ConfigArgs,

    /// Number of phrase changes to show before exiting.
    #[arg(long, default_value_t = 3)]
    pub ticks: u32,

    /// Override the rotation interval in milliseconds.
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Print each glyph with its stagger delay.
    #[arg(long)]
    pub glyphs: bool,
}

pub fn run_rotate(args: RotateArgs, out: &mut dyn Write) -> Result<()> {
    let mut config = args.source.load()?.rotator;
    if let Some(ms) = args.interval_ms {
        config.interval_ms = ms;
    }
    let mut rotator = RotatingText::from_config(&config)?;
    writeln!(out, "{}", rotator.current())?;

    let mut scheduler: ThreadScheduler<()> = ThreadScheduler::new();
    let task = scheduler.schedule_repeating(rotator.interval(), Box::new(|_| ()))?;
    let patience = rotator.interval().saturating_mul(4).max(Duration::from_millis(100));

    for _ in 0..args.ticks {
        if scheduler.recv_timeout(patience).is_none() {
            return Err(CliError::TimerStalled(patience));
        }
        match rotator.tick() {
            Some(transition) => {
                writeln!(out, "{}", rotator.current())?;
                if args.glyphs {
                    for glyph in &transition.enter {
                        writeln!(out, "  {} +{}ms", glyph.text, glyph.delay.as_millis())?;
                    }
                }
            }
            None => writeln!(out, "{}", rotator.current())?,
        }
    }

    scheduler.cancel(task);
    tracing::debug!(ticks = rotator.ticks(), "rotation stopped");
    Ok(())
}
