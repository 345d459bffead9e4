//! Rendering of search outcomes for the terminal.

use crate::locale::StringTable;
use crate::markdown::{escape_table_cell, sanitize_heading};
use crate::models::{MedicineDetails, NormalizeStatus};
use crate::search::SearchOutcome;

/// Markdown report: notices first, then one section per result.
pub fn format_outcome(outcome: &SearchOutcome, text: &StringTable) -> String {
    let mut out = format!("# {}\n\n", sanitize_heading(&outcome.query));

    if outcome.term.status == NormalizeStatus::Enhanced && outcome.term.term != outcome.query {
        out.push_str(&format!(
            "Searched for: **{}**\n\n",
            sanitize_heading(&outcome.term.term)
        ));
    }

    for notice in &outcome.notices {
        out.push_str(&format!("> {}\n", notice.text(text)));
    }
    if !outcome.notices.is_empty() {
        out.push('\n');
    }

    for details in &outcome.results {
        format_details(details, text, &mut out);
    }

    out
}

fn format_details(d: &MedicineDetails, text: &StringTable, out: &mut String) {
    out.push_str(&format!("## {}\n\n", sanitize_heading(&d.name)));
    out.push_str(&format!("_{}_\n\n", text.source_label(d.source)));
    out.push_str("| Field | Value |\n|---|---|\n");

    let mut rows = vec![
        ("Composition", d.composition.as_str()),
        ("Usage", d.usage.as_str()),
        ("Manufacturer", d.manufacturer.as_str()),
        ("Dosage", d.dosage.as_str()),
        ("Side effects", d.side_effects.as_str()),
    ];
    if let Some(barcode) = &d.barcode {
        rows.push(("Barcode", barcode.as_str()));
    }
    for (label, value) in rows {
        out.push_str(&format!("| {label} | {} |\n", escape_table_cell(value)));
    }
    out.push('\n');
}

/// Plain list for the `suggest` command, one name per line.
pub fn format_suggestions(names: &[String]) -> String {
    let mut out = String::new();
    for name in names {
        out.push_str(name);
        out.push('\n');
    }
    out
}
