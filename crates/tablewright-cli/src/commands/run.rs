//! Run command - load a file, apply a pipeline and export the result.

use std::path::PathBuf;

use colored::Colorize;
use tablewright::{ExportFormat, Pipeline, Session};

use super::print_preview;

pub fn run(
    file: PathBuf,
    pipeline: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
    preview: usize,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Data file not found: {}", file.display()).into());
    }

    let mut session = Session::new();
    let loaded = session.load_file(&file)?;
    println!(
        "{} {} ({} rows, {} columns)",
        "Loaded".cyan().bold(),
        file.display().to_string().white(),
        loaded.rows_after.to_string().white().bold(),
        session.headers().len()
    );

    if let Some(path) = &pipeline {
        let pipeline = Pipeline::load(path)?;
        tracing::debug!(path = %path.display(), steps = pipeline.len(), "loaded pipeline");
        println!(
            "{} {} steps from {}",
            "Running".cyan().bold(),
            pipeline.len().to_string().white().bold(),
            path.display()
        );

        let outcomes = session.run_pipeline(&pipeline)?;
        for (i, outcome) in outcomes.iter().enumerate() {
            let rows = if outcome.rows_before == outcome.rows_after {
                format!("{} rows", outcome.rows_after)
            } else {
                format!("{} → {} rows", outcome.rows_before, outcome.rows_after)
            };
            println!("  {:>2}. {} {}", i + 1, outcome.description, rows.dimmed());
            if outcome.faults > 0 {
                println!(
                    "      {} {} rows evaluated to {}",
                    "Warning:".yellow().bold(),
                    outcome.faults,
                    tablewright::ERROR_MARKER
                );
            }
        }
    }

    println!();
    println!(
        "{} ({} view, {} rows)",
        "Result".yellow().bold(),
        session.view(),
        session.active().len()
    );
    print_preview(session.active(), preview);

    if let Some(output) = output {
        let format = format
            .or_else(|| ExportFormat::from_path(&output))
            .unwrap_or_default();
        tracing::debug!(path = %output.display(), %format, view = %session.view(), "exporting active dataset");
        let rows = session.export_active(&output, format)?;
        println!();
        println!(
            "{} {} rows to {}",
            "Saved".green().bold(),
            rows,
            output.display().to_string().cyan()
        );
    } else if verbose {
        println!();
        println!("No --output given; nothing written.");
    }

    Ok(())
}
