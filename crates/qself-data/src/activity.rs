//! Activity-log normalizer.
//!
//! Turns a raw Tockler/AWT export (semicolon-delimited, Latin-1 encoded)
//! into a cleaned [`Table`] plus an untouched preview of the first few
//! rows.  The exporter writes byte values that are not valid UTF-8, so the
//! bytes are decoded as ISO-8859-1 first; that decoding maps every byte
//! and cannot fail.

use qself_core::table::{CellValue, Row, Table};
use qself_core::Result;
use tracing::debug;

/// Rows whose `Title` equals this sentinel carry no usable window title
/// and are removed.
const TITLE_SENTINEL: &str = "NO_TITLE";

/// Number of raw rows captured for the preview.
const PREVIEW_ROWS: usize = 5;

/// Column dropped from the cleaned output when present.
const TYPE_COLUMN: &str = "Type";

/// Output of the activity-log pipeline.
#[derive(Debug, Clone)]
pub struct ActivityReport {
    /// First [`PREVIEW_ROWS`] rows exactly as parsed, before any column
    /// drop or row filtering.
    pub preview: Table,
    /// Cleaned table: no `Type` column, no empty-`Begin` rows, no
    /// sentinel-titled rows.
    pub cleaned: Table,
}

/// Parse and clean a raw activity-log upload.
///
/// Policy, in order:
/// 1. decode as Latin-1;
/// 2. parse as `;`-delimited text, first line is the header;
/// 3. capture the first 5 raw rows as the preview;
/// 4. drop the `Type` column if present;
/// 5. remove rows whose `Begin` is missing or empty;
/// 6. remove rows whose `Title` is exactly `NO_TITLE`.
///
/// A malformed record (inconsistent field count, unterminated quote)
/// fails the whole run; no partial table is produced.
pub fn normalize_activity_log(bytes: &[u8]) -> Result<ActivityReport> {
    let text = encoding_rs::mem::decode_latin1(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut preview = Table::new();
    let mut cleaned = Table::new();
    let mut rows_parsed = 0u64;
    let mut dropped_begin = 0u64;
    let mut dropped_title = 0u64;

    for record in reader.records() {
        let record = record?;
        rows_parsed += 1;

        let mut row = Row::new();
        for (name, field) in headers.iter().zip(record.iter()) {
            row.insert(name.clone(), CellValue::from(field));
        }

        if preview.len() < PREVIEW_ROWS {
            preview.push(row.clone());
        }

        row.remove(TYPE_COLUMN);

        if !has_nonempty_begin(&row) {
            dropped_begin += 1;
            continue;
        }
        if has_sentinel_title(&row) {
            dropped_title += 1;
            continue;
        }

        cleaned.push(row);
    }

    debug!(
        "Activity log: {} rows parsed, {} dropped on Begin, {} dropped on Title, {} kept",
        rows_parsed,
        dropped_begin,
        dropped_title,
        cleaned.len()
    );

    Ok(ActivityReport { preview, cleaned })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// A row survives only when it carries a `Begin` cell with non-empty text.
fn has_nonempty_begin(row: &Row) -> bool {
    matches!(row.get("Begin"), Some(CellValue::Text(s)) if !s.is_empty())
}

fn has_sentinel_title(row: &Row) -> bool {
    matches!(row.get("Title"), Some(CellValue::Text(s)) if s == TITLE_SENTINEL)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
