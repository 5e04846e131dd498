#![forbid(unsafe_code)]

//! `pagereel` command-line driver.
//!
//! Loads a page configuration, then either simulates scrolling through the
//! page, prints the data table, runs the headline rotator on a live timer,
//! or prints the effective configuration.

pub mod cli;
pub mod error;
pub mod logging;
pub mod rotate;
pub mod simulate;
pub mod table;

pub use cli::run_from_env;
pub use error::{CliError, Result};
