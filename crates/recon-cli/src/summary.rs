use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use recon_match::{ConfidenceLevel, ConfidenceThresholds, MatchSetMetadata};
use recon_model::MatchEntry;

use crate::commands::{AlignOutcome, SuggestOutcome};

pub fn print_alignment(
    outcome: &AlignOutcome,
    category_filter: Option<&str>,
    show_suggestions: bool,
) {
    let engine = &outcome.engine;
    let thresholds = ConfidenceThresholds::default();
    println!("Match set: {}", outcome.label);

    for category in &engine.source().categories {
        if let Some(filter) = category_filter
            && category.id != filter
        {
            continue;
        }
        println!("\n{} ({})", category.name, category.id);

        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Source"),
            header_cell("Target"),
            header_cell("Confidence"),
            header_cell("Level"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 2, CellAlignment::Right);

        for item in &category.items {
            let Some(entry) = engine.get_match(&item.id) else {
                continue;
            };
            table.add_row(vec![
                Cell::new(&entry.source_item.name),
                target_cell(entry),
                Cell::new(format!("{:.1}", entry.confidence)),
                level_cell(entry, &thresholds),
            ]);
        }
        println!("{table}");

        let leftovers = engine.list_unmatched_targets(&category.id);
        if !leftovers.is_empty() {
            let names: Vec<&str> = leftovers.iter().map(|r| r.name.as_str()).collect();
            println!("Unclaimed targets: {}", names.join(", "));
        }

        if show_suggestions {
            for entry in engine.list_matches(&category.id).unmatched {
                let suggestions = engine.suggest(&entry.source_item.id);
                if suggestions.is_empty() {
                    continue;
                }
                let rendered: Vec<String> = suggestions
                    .iter()
                    .map(|s| format!("{} ({:.0})", s.item.name, s.confidence))
                    .collect();
                println!("  {} -> {}", entry.source_item.name, rendered.join(", "));
            }
        }
    }

    let summary = engine.summary();
    println!(
        "\n{} sources: {} matched, {} unmatched, {} created",
        summary.total_sources, summary.matched, summary.unmatched, summary.created_targets
    );
    if let Some(path) = &outcome.saved_to {
        println!("Saved: {}", path.display());
    }
}

pub fn print_suggestions(outcome: &SuggestOutcome) {
    println!("Suggestions for '{}':", outcome.source_name);
    if outcome.suggestions.is_empty() {
        println!("(no candidates above threshold)");
        return;
    }
    let thresholds = ConfidenceThresholds::default();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Candidate"),
        header_cell("Confidence"),
        header_cell("Level"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for suggestion in &outcome.suggestions {
        let level = thresholds.categorize(suggestion.confidence);
        table.add_row(vec![
            Cell::new(&suggestion.item.name),
            Cell::new(format!("{:.1}", suggestion.confidence)),
            Cell::new(level_name(level)).fg(level_color(level)),
        ]);
    }
    println!("{table}");
}

pub fn print_sets(sets: &[MatchSetMetadata]) {
    if sets.is_empty() {
        println!("No stored match sets.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Label"),
        header_cell("Entries"),
        header_cell("Matched"),
        header_cell("File"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for set in sets {
        table.add_row(vec![
            Cell::new(&set.label),
            Cell::new(set.entry_count),
            Cell::new(set.matched_count),
            Cell::new(set.file_path.display()),
        ]);
    }
    println!("{table}");
}

fn target_cell(entry: &MatchEntry) -> Cell {
    match &entry.target_item {
        Some(target) if target.is_created() => {
            Cell::new(format!("{} (created)", target.name)).fg(Color::Cyan)
        }
        Some(target) => Cell::new(&target.name),
        None => Cell::new("-").add_attribute(Attribute::Dim),
    }
}

fn level_cell(entry: &MatchEntry, thresholds: &ConfidenceThresholds) -> Cell {
    if !entry.is_matched {
        return Cell::new("unmatched").add_attribute(Attribute::Dim);
    }
    let level = thresholds.categorize(entry.confidence);
    Cell::new(level_name(level)).fg(level_color(level))
}

fn level_name(level: ConfidenceLevel) -> &'static str {
    match level {
        ConfidenceLevel::High => "high",
        ConfidenceLevel::Medium => "medium",
        ConfidenceLevel::Low => "low",
    }
}

fn level_color(level: ConfidenceLevel) -> Color {
    match level {
        ConfidenceLevel::High => Color::Green,
        ConfidenceLevel::Medium => Color::Yellow,
        ConfidenceLevel::Low => Color::Red,
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
