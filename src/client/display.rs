use colored::*;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use crate::server::types::SummarizeResponse;

/// Builds the length comparison table shown under a summary.
pub fn lengths_table(response: &SummarizeResponse) -> Table {
    let ratio = if response.original_length == 0 {
        0.0
    } else {
        response.summary_length as f64 * 100.0 / response.original_length as f64
    };

    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("Original").fg(comfy_table::Color::Cyan).add_attribute(Attribute::Bold),
            Cell::new("Summary").fg(comfy_table::Color::Cyan).add_attribute(Attribute::Bold),
            Cell::new("Ratio").fg(comfy_table::Color::Cyan).add_attribute(Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .add_row(vec![
            Cell::new(format!("{} chars", response.original_length)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{} chars", response.summary_length)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", ratio)).set_alignment(CellAlignment::Right),
        ]);
    table
}

pub fn print_summary(response: &SummarizeResponse) {
    println!("\n{}", "Summary".green().bold());
    println!("{}\n", response.summary);
    println!("{}", lengths_table(response));
}
