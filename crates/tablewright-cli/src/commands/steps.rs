//! Steps command - validate and describe a pipeline file.

use std::path::PathBuf;

use colored::Colorize;
use tablewright::Pipeline;

pub fn run(file: PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Pipeline file not found: {}", file.display()).into());
    }

    let pipeline = Pipeline::load(&file)?;
    tracing::debug!(path = %file.display(), steps = pipeline.len(), "pipeline is valid");

    if pipeline.is_empty() {
        println!("{}", "Pipeline has no steps.".yellow());
        return Ok(());
    }

    println!(
        "{} {} ({} steps)",
        "Pipeline".cyan().bold(),
        file.display().to_string().white(),
        pipeline.len().to_string().white().bold()
    );
    println!();

    for (i, step) in pipeline.steps.iter().enumerate() {
        println!(
            "  {:>2}. [{}] {}",
            i + 1,
            step.name().cyan(),
            step.description()
        );
        if verbose {
            println!("      {}", serde_json::to_string(step)?.dimmed());
        }
    }

    println!();
    println!(
        "Run {} to apply it.",
        format!("tablewright run <FILE> --pipeline {}", file.display())
            .cyan()
            .bold()
    );

    Ok(())
}
