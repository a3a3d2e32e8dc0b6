use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use reportforge::export::{BatchOutcome, ItemOutcome};
use reportforge::ingest::ValidationReport;
use reportforge::report::ReportRecord;

pub fn print_validation_report(report: &ValidationReport) {
    if report.valid {
        println!("✅ All scores within 0-100");
        return;
    }

    println!("\n⚠️  {} score(s) out of range:", report.violations.len());
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Row").add_attribute(Attribute::Bold),
        Cell::new("Field").add_attribute(Attribute::Bold),
        Cell::new("Value").fg(Color::Red),
    ]);

    for v in &report.violations {
        table.add_row(vec![
            Cell::new(v.display_row).set_alignment(CellAlignment::Right),
            Cell::new(&v.field),
            Cell::new(v.value).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}", table);
}

fn ranked_cell(record: &ReportRecord, outer: bool) -> String {
    let items = if outer {
        &record.dual_ring.outer
    } else {
        &record.dual_ring.inner
    };
    items
        .iter()
        .map(|i| format!("{}:{}", i.label, i.value))
        .collect::<Vec<_>>()
        .join(" > ")
}

pub fn print_record_summary(records: &[ReportRecord]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new("Date"),
        Cell::new("Capability").fg(Color::Cyan),
        Cell::new("Focus").fg(Color::Cyan),
        Cell::new("Primary Type").fg(Color::Green),
        Cell::new("Detail"),
    ]);

    for (i, r) in records.iter().enumerate() {
        let detail = if r.type_detail.is_some() {
            Cell::new("yes")
        } else {
            Cell::new("missing").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(&r.name),
            Cell::new(&r.date),
            Cell::new(ranked_cell(r, true)),
            Cell::new(ranked_cell(r, false)),
            Cell::new(&r.primary_type),
            detail,
        ]);
    }
    println!("{}", table);
}

pub fn print_batch_outcome(outcome: &BatchOutcome) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["#", "Status", "Artifact / Reason"]);

    for item in &outcome.items {
        match item {
            ItemOutcome::Exported { index, file_name } => table.add_row(vec![
                Cell::new(index + 1),
                Cell::new("ok").fg(Color::Green),
                Cell::new(file_name),
            ]),
            ItemOutcome::Failed { index, reason } => table.add_row(vec![
                Cell::new(index + 1),
                Cell::new("failed").fg(Color::Red),
                Cell::new(reason),
            ]),
        };
    }
    println!("{}", table);
    println!(
        "📦 {} ({} exported, {} failed, {} bytes)",
        outcome.archive_name,
        outcome.exported_count(),
        outcome.failed_count(),
        outcome.bytes.len()
    );
}
