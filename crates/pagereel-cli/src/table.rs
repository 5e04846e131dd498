use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use clap::Args;
use pagereel_widgets::{DataTable, ModalKind};

use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Default, Args)]
pub struct TableArgs {
    #[command(flatten)]
    pub source: ConfigArgs,

    /// Table fixture. Overrides `data` from the page config.
    #[arg(long, short = 'd')]
    pub data: Option<PathBuf>,

    /// Print header and rows as JSON instead of a text table.
    #[arg(long)]
    pub json: bool,
}

impl TableArgs {
    /// Fixture path: `--data` as given, else the config's `data` resolved
    /// against the config file's directory.
    pub fn resolve_data(&self) -> Result<PathBuf> {
        if let Some(path) = &self.data {
            return Ok(path.clone());
        }
        let config = self.source.load()?;
        config
            .data
            .map(|rel| self.source.base_dir().join(rel))
            .ok_or(CliError::NoTableData)
    }
}

pub fn load_table(path: PathBuf) -> Result<DataTable> {
    let file = File::open(&path).map_err(|e| CliError::Table {
        path: path.clone(),
        source: e.into(),
    })?;
    DataTable::from_reader(BufReader::new(file)).map_err(|source| CliError::Table { path, source })
}

pub fn run_table(args: TableArgs, out: &mut dyn Write) -> Result<()> {
    let table = load_table(args.resolve_data()?)?;
    tracing::info!(rows = table.row_count(), mismatched = table.row_mismatches().len(), "table loaded");

    if args.json {
        let view = table.view();
        let doc = serde_json::json!({
            "title": ModalKind::DataSheet.title(),
            "columns": view.header,
            "rows": view.rows,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
    } else {
        writeln!(out, "{}", ModalKind::DataSheet.title())?;
        writeln!(out)?;
        write!(out, "{}", table.render_text())?;
    }
    Ok(())
}
