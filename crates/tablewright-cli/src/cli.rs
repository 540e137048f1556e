//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tablewright::ExportFormat;

/// Tablewright: tabular transformation engine
#[derive(Parser)]
#[command(name = "tablewright")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a data file, run a pipeline and export the active dataset
    Run {
        /// Path to the data file (CSV/TSV/JSON/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pipeline file with the steps to apply
        #[arg(short, long)]
        pipeline: Option<PathBuf>,

        /// Output path for the active dataset
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (default: from the output extension, else csv)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Number of rows to preview
        #[arg(long, default_value = "10")]
        preview: usize,
    },

    /// Show the columns and first rows of a data file
    Inspect {
        /// Path to the data file (CSV/TSV/JSON/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of rows to show
        #[arg(short, long, default_value = "10")]
        rows: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a pipeline file and describe its steps
    Steps {
        /// Path to the pipeline file
        #[arg(value_name = "PIPELINE")]
        file: PathBuf,
    },
}
