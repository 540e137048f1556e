//! Inspect command - show the shape and first rows of a data file.

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;
use tablewright::{Dataset, Parser, Value};

use super::print_preview;

/// Per-column summary for JSON output.
#[derive(Serialize)]
struct ColumnSummary {
    name: String,
    numeric: usize,
    text: usize,
    empty: usize,
}

fn summarize(data: &Dataset) -> Vec<ColumnSummary> {
    data.headers()
        .into_iter()
        .map(|name| {
            let mut summary = ColumnSummary {
                name,
                numeric: 0,
                text: 0,
                empty: 0,
            };
            for row in data {
                match row.get(&summary.name) {
                    Value::Number(_) => summary.numeric += 1,
                    Value::Text(_) => summary.text += 1,
                    Value::Empty => summary.empty += 1,
                }
            }
            summary
        })
        .collect()
}

pub fn run(
    file: PathBuf,
    rows: usize,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Data file not found: {}", file.display()).into());
    }

    let (data, source) = Parser::new().parse_file(&file)?;
    let columns = summarize(&data);
    tracing::debug!(columns = columns.len(), rows = data.len(), "summarized columns");

    if json_output {
        let preview: Vec<_> = data.iter().take(rows).collect();
        let report = serde_json::json!({
            "source": source,
            "columns": columns,
            "preview": preview,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Inspecting".cyan().bold(),
        source.file.white()
    );
    println!(
        "  Format: {}  Rows: {}  Columns: {}",
        source.format,
        source.rows.to_string().white().bold(),
        source.columns.to_string().white().bold()
    );
    println!("  Hash:   {}", source.hash.dimmed());
    println!();

    println!("{}", "Columns:".yellow().bold());
    for column in &columns {
        println!(
            "  {:<24} {} numeric, {} text, {} empty",
            column.name.white(),
            column.numeric.to_string().green(),
            column.text.to_string().blue(),
            column.empty.to_string().dimmed()
        );
    }
    println!();

    println!("{}", "Preview:".yellow().bold());
    print_preview(&data, rows);

    Ok(())
}
