//! Console output for check runs
//!
//! This module renders the channel table and the end-of-run statistics
//! printed to stdout.

use crate::checker::{PartialResults, ProbeResult, Summary};
use crate::output::text::format_summary_block;
use crate::output::traits::single_line;

const NAME_WIDTH: usize = 30;
const URL_WIDTH: usize = 40;
const TABLE_WIDTH: usize = 90;

/// Formats results as a fixed-width table with index, name, URL and status
pub fn format_table(results: &[ProbeResult]) -> String {
    let rule = "=".repeat(TABLE_WIDTH);
    let mut table = String::new();

    table.push_str(&rule);
    table.push('\n');
    table.push_str(&format!(
        "{:<5} {:<name$} {:<url$} {}\n",
        "#",
        "Channel",
        "URL",
        "Status",
        name = NAME_WIDTH,
        url = URL_WIDTH
    ));
    table.push_str(&rule);
    table.push('\n');

    for (index, result) in results.iter().enumerate() {
        let status = match result.latency_ms() {
            Some(ms) => format!("OK {}ms", ms),
            None => result.status_detail(),
        };
        table.push_str(&format!(
            "{:<5} {:<name$} {:<url$} {}\n",
            index + 1,
            truncate(&single_line(result.channel().display_name()), NAME_WIDTH),
            truncate(&result.channel().url, URL_WIDTH),
            status,
            name = NAME_WIDTH,
            url = URL_WIDTH
        ));
    }

    table.push_str(&rule);
    table.push('\n');
    table.push_str(&format!("{} channels\n", results.len()));
    table
}

/// Prints the channel table to stdout
pub fn print_table(results: &[ProbeResult]) {
    if results.is_empty() {
        println!("No channels to display");
        return;
    }
    print!("{}", format_table(results));
}

/// Prints summary statistics to stdout
pub fn print_summary(summary: &Summary) {
    println!("=== Check Statistics ===\n");
    print!("{}", format_summary_block(summary));

    if !summary.by_status.is_empty() {
        println!("\nBy status:");
        let mut counts: Vec<_> = summary.by_status.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (category, count) in counts {
            println!("  {}: {}", category, count);
        }
    }
}

/// Prints what a cancelled run managed to test
pub fn print_partial(partial: &PartialResults) {
    println!(
        "Run cancelled: {} of {} links tested",
        partial.completed_count(),
        partial.total
    );
}

/// Shortens `text` to `width` characters, marking the cut with "..."
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
