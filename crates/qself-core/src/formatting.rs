use crate::table::CellValue;

/// Render a cell for display in a table.
///
/// Nulls render as an empty string; everything else keeps its source form
/// (floats use Rust's shortest round-trip representation, so `85.0` shows
/// as `85` only when the source was integral).
///
/// # Examples
///
/// ```
/// use qself_core::formatting::format_cell;
/// use qself_core::table::CellValue;
///
/// assert_eq!(format_cell(&CellValue::Null), "");
/// assert_eq!(format_cell(&CellValue::Int(85)), "85");
/// assert_eq!(format_cell(&CellValue::Float(-0.13)), "-0.13");
/// assert_eq!(format_cell(&CellValue::Bool(true)), "true");
/// assert_eq!(format_cell(&CellValue::Text("Meeting".into())), "Meeting");
/// ```
pub fn format_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Int(i) => i.to_string(),
        CellValue::Float(f) => f.to_string(),
        CellValue::Text(s) => s.clone(),
    }
}

/// Format a row count with thousands separators, e.g. `12345` → `"12,345"`.
///
/// # Examples
///
/// ```
/// use qself_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
