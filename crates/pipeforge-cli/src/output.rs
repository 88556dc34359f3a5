use pipeforge_core::scaffold::{FileStatus, ScaffoldReport};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    // Calculate column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// One line per file, in the order they were processed.
pub fn print_report(report: &ScaffoldReport, dry_run: bool) {
    for entry in &report.entries {
        let label = match (entry.status, dry_run) {
            (FileStatus::Written, false) => "created:",
            (FileStatus::Written, true) => "would write:",
            (FileStatus::Skipped, _) => "exists: ",
            (FileStatus::Failed, _) => "failed: ",
        };
        let exec = if entry.executable { " (executable)" } else { "" };
        println!("  {label} {}{exec}", entry.path);
    }
}
