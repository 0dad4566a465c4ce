//! Display utilities for run summaries.

use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use comfy_table::Table;
use console::style;
use strum::IntoEnumIterator;

use crate::processor::Report;
use crate::types::{Degradation, ProcessorMode};

/// Formats a byte count into a human-readable string.
pub fn format_bytes(bytes: usize) -> String {
    ByteSize::b(bytes as u64).to_string()
}

/// Builds the summary table of a finished run.
pub fn report_table(report: &Report) -> Table {
    let symbols_label = match report.mode {
        ProcessorMode::Encode => "Positions degraded",
        ProcessorMode::Decode => "Symbols corrected",
    };

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Degradation".to_owned(), report.level.to_string()]);
    table.add_row(vec!["Data symbols per block".to_owned(), report.level.data_symbols().to_string()]);
    table.add_row(vec!["Input size".to_owned(), format_bytes(report.input_bytes)]);
    table.add_row(vec!["Blocks".to_owned(), report.blocks.to_string()]);
    table.add_row(vec!["Full blocks".to_owned(), report.full_blocks.to_string()]);
    table.add_row(vec!["Remainder block".to_owned(), report.remainder.to_string()]);
    table.add_row(vec![symbols_label.to_owned(), report.symbols.to_string()]);

    if let Some(seed) = &report.seed {
        table.add_row(vec!["Seed".to_owned(), seed.clone()]);
    }

    for (path, size) in &report.outputs {
        table.add_row(vec![path.display().to_string(), format_bytes(*size)]);
    }

    table
}

/// Builds the table of supported degradation levels.
pub fn parameter_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Percent", "k", "t", "Redundancy (n-k)"]);

    for level in Degradation::iter() {
        table.add_row(vec![level.percent().to_string(), level.data_symbols().to_string(), level.capacity().to_string(), level.redundancy().to_string()]);
    }

    table
}

pub fn show_report(report: &Report) {
    println!();
    println!("{}", report_table(report));
}

pub fn show_parameters() {
    println!("{}", parameter_table());
}

/// Displays success message.
pub fn show_success(mode: ProcessorMode, paths: &[&Path]) {
    let action = match mode {
        ProcessorMode::Encode => "encoded",
        ProcessorMode::Decode => "decoded",
    };

    let list = paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ");

    println!();
    println!("{} {}", style("✓").green(), style(format!("File {action} successfully: {list}")).bold());
}

pub fn show_removed(removed: &[PathBuf]) {
    if removed.is_empty() {
        println!("{}", style("No artifacts found").yellow());
        return;
    }

    for path in removed {
        println!("{} {}", style("✓").green(), style(format!("Removed: {}", path.display())).bold());
    }
}
