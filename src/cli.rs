//! Command-line surface.
//!
//! Keeps the original single-character flag set (`-m`/`-e`/`-r`/`-t`/`-c`/`-v`)
//! but wires it through `clap`'s derive API rather than hand-rolled `argv`
//! inspection; `-h`/`--help` and `-V`/`--version` come free from clap.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "armalyzer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Static analyzer for hand-written ARM assembly source files", long_about = None)]
pub struct Cli {
    /// File (or, with -t/-v, directory) to analyze
    pub path: PathBuf,

    /// Dump metrics to stdout
    #[arg(short = 'm', long = "metrics", group = "mode")]
    pub metrics: bool,

    /// Dump diagnostics to stdout
    #[arg(short = 'e', long = "errors", group = "mode")]
    pub errors: bool,

    /// Write Reports/<stem>_report.txt
    #[arg(short = 'r', long = "report", group = "mode")]
    pub report: bool,

    /// Create Reports/, then -r on each *.s file in the given directory
    #[arg(short = 't', long = "tree", group = "mode")]
    pub tree: bool,

    /// Append one CSV row to AEC_Dataset.csv
    #[arg(short = 'c', long = "csv", group = "mode")]
    pub csv: bool,

    /// Append one CSV row per *.s file in the given directory
    #[arg(short = 'v', long = "csv-tree", group = "mode")]
    pub csv_tree: bool,
}

impl Cli {
    /// The single mode flag the dispatcher inspects. `clap`'s arg group
    /// guarantees at most one is set; none set is itself an error the
    /// driver reports.
    pub fn mode(&self) -> Option<Mode> {
        if self.metrics {
            Some(Mode::Metrics)
        } else if self.errors {
            Some(Mode::Errors)
        } else if self.report {
            Some(Mode::Report)
        } else if self.tree {
            Some(Mode::Tree)
        } else if self.csv {
            Some(Mode::Csv)
        } else if self.csv_tree {
            Some(Mode::CsvTree)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Metrics,
    Errors,
    Report,
    Tree,
    Csv,
    CsvTree,
}
