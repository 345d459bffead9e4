/// Escape text for a Markdown table cell: pipes would split the cell and
/// newlines would end the row.
pub(crate) fn escape_table_cell(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.trim().chars() {
        match c {
            '|' => out.push_str("\\|"),
            '\n' => out.push_str("<br>"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Sanitize model or user text for embedding in a Markdown heading.
/// Replaces newlines (which would break heading structure) with spaces.
pub(crate) fn sanitize_heading(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}
