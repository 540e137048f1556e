//! CLI command implementations.

pub mod inspect;
pub mod run;
pub mod steps;

use colored::Colorize;
use tablewright::Dataset;

/// Widest a preview column may grow before values are cut.
const MAX_CELL_WIDTH: usize = 24;

/// Print the first `rows` records of `data` as an aligned table.
pub fn print_preview(data: &Dataset, rows: usize) {
    let headers = data.headers();
    if headers.is_empty() {
        println!("{}", "(empty)".dimmed());
        return;
    }

    let cells: Vec<Vec<String>> = data
        .iter()
        .take(rows)
        .map(|row| headers.iter().map(|h| clip(&row.text(h))).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(clip(h).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", clip(h), w = *w))
        .collect();
    println!("  {}", header_line.join("  ").bold());

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect();
        println!("  {}", line.join("  "));
    }

    if data.len() > rows {
        println!("  {}", format!("... {} more rows", data.len() - rows).dimmed());
    }
}

fn clip(value: &str) -> String {
    if value.chars().count() <= MAX_CELL_WIDTH {
        value.to_string()
    } else {
        let cut: String = value.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", cut)
    }
}
