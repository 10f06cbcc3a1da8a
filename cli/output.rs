use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use gmd_core::OutputSummary;
use std::path::Path;

pub fn print_run_header(config_path: &Path, output_dir: &Path, quiet: bool) {
    if quiet {
        return;
    }
    println!(
        "Processing configuration file: {}",
        config_path.display().to_string().blue()
    );
    println!(
        "Output will be written to: {}",
        output_dir.display().to_string().blue()
    );
}

pub fn print_output_written(summary: &OutputSummary, quiet: bool) {
    if quiet {
        return;
    }
    println!(
        "{} Wrote {}",
        "✅".green(),
        summary.path.display().to_string().dimmed()
    );
}

pub fn print_summary_table(summaries: &[OutputSummary], quiet: bool) {
    if quiet {
        return;
    }
    if summaries.is_empty() {
        println!("\n{}", "(No outputs configured)".yellow());
        return;
    }
    println!();
    println!("{}", build_summary_table(summaries));
    println!();
}

fn build_summary_table(summaries: &[OutputSummary]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Output").fg(Color::Green),
        Cell::new("Rules").fg(Color::Green),
        Cell::new("Files").fg(Color::Green),
        Cell::new("Bytes").fg(Color::Green),
    ]);
    for summary in summaries {
        table.add_row(vec![
            Cell::new(&summary.name).fg(Color::Cyan),
            Cell::new(summary.rule_count).set_alignment(CellAlignment::Right),
            Cell::new(summary.file_count).set_alignment(CellAlignment::Right),
            Cell::new(summary.bytes_written)
                .set_alignment(CellAlignment::Right)
                .fg(Color::DarkGrey),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn summary_table_lists_each_output() {
        let summaries = vec![
            OutputSummary {
                name: "main_docs.md".to_string(),
                path: PathBuf::from("gmd_output/main_docs.md"),
                rule_count: 2,
                file_count: 7,
                bytes_written: 1024,
            },
            OutputSummary {
                name: "subdir_docs.md".to_string(),
                path: PathBuf::from("gmd_output/subdir_docs.md"),
                rule_count: 1,
                file_count: 0,
                bytes_written: 0,
            },
        ];
        let rendered = build_summary_table(&summaries).to_string();
        assert!(rendered.contains("main_docs.md"));
        assert!(rendered.contains("subdir_docs.md"));
        assert!(rendered.contains("1024"));
    }
}
