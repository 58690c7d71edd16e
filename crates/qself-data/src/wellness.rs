//! Wellness-archive normalizer.
//!
//! Opens an Oura data export (a ZIP of JSON files, one per metric
//! category) and flattens each recognized entry into a [`Table`].  Scored
//! daily metrics (readiness, sleep) get their nested `contributors`
//! mapping promoted to top-level columns; sample streams (heart rate,
//! location) pass through verbatim.
//!
//! One malformed recognized entry fails the whole archive run; there is
//! no per-entry isolation.  Entries matching no recognized prefix are
//! skipped silently.

use std::io::{Cursor, Read};

use qself_core::table::{CellValue, Row, Table};
use qself_core::{QselfError, Result};
use serde_json::Value;
use tracing::debug;
use zip::ZipArchive;

// ── Entry recognition ─────────────────────────────────────────────────────────

const READINESS_PREFIX: &str = "oura_daily-readiness";
const SLEEP_PREFIX: &str = "oura_daily-sleep";
const HEART_RATE_PREFIX: &str = "oura_heart-rate";
const LOCATION_PREFIX: &str = "oura_smoothed-location";

/// Metric category an archive entry was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Readiness,
    Sleep,
    HeartRate,
    Location,
}

/// Match an entry filename against the four recognized prefixes.
/// First match wins; the prefixes are disjoint in real exports.
fn recognize(name: &str) -> Option<EntryKind> {
    if name.starts_with(READINESS_PREFIX) {
        Some(EntryKind::Readiness)
    } else if name.starts_with(SLEEP_PREFIX) {
        Some(EntryKind::Sleep)
    } else if name.starts_with(HEART_RATE_PREFIX) {
        Some(EntryKind::HeartRate)
    } else if name.starts_with(LOCATION_PREFIX) {
        Some(EntryKind::Location)
    } else {
        None
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Flattened tables from one wellness archive, one per metric category.
///
/// A table is `None` when no matching entry exists in the upload.  When a
/// prefix matches more than one entry the last processed entry wins.
#[derive(Debug, Clone, Default)]
pub struct WellnessTables {
    pub readiness: Option<Table>,
    pub sleep: Option<Table>,
    pub heart_rate: Option<Table>,
    pub location: Option<Table>,
}

impl WellnessTables {
    /// `true` when no recognized entry produced a table.
    pub fn is_empty(&self) -> bool {
        self.readiness.is_none()
            && self.sleep.is_none()
            && self.heart_rate.is_none()
            && self.location.is_none()
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Open a wellness archive and flatten every recognized entry.
///
/// Bytes that are not a valid ZIP container fail the whole operation with
/// [`QselfError::Container`]; malformed JSON or a missing required key in
/// a recognized entry fails it with a JSON / structural error.
pub fn normalize_wellness_archive(bytes: &[u8]) -> Result<WellnessTables> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut tables = WellnessTables::default();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if !entry.is_file() {
            continue;
        }
        let name = entry.name().to_string();

        let Some(kind) = recognize(&name) else {
            debug!("Skipping unrecognized archive entry: {}", name);
            continue;
        };

        let mut content = String::new();
        entry.read_to_string(&mut content)?;
        let json: Value = serde_json::from_str(&content)?;

        debug!("Flattening archive entry {} as {:?}", name, kind);
        match kind {
            EntryKind::Readiness => {
                tables.readiness = Some(flatten_scored(&name, &json, "daily_readiness", true)?);
            }
            EntryKind::Sleep => {
                tables.sleep = Some(flatten_scored(&name, &json, "daily_sleep", false)?);
            }
            EntryKind::HeartRate => {
                tables.heart_rate = Some(flatten_verbatim(&name, &json, "heart_rate")?);
            }
            EntryKind::Location => {
                tables.location = Some(flatten_verbatim(&name, &json, "smoothed_location")?);
            }
        }
    }

    Ok(tables)
}

// ── Flatteners ────────────────────────────────────────────────────────────────

/// Flatten a scored daily metric (readiness or sleep).
///
/// Each element of the sequence under `root_key` must be an object with
/// `day`, `score`, and a flat `contributors` mapping whose entries are
/// promoted to top-level columns.  When `with_temperature` is set, the
/// optional `temperature_deviation` key is carried as well, defaulting to
/// null when absent.
fn flatten_scored(
    entry: &str,
    json: &Value,
    root_key: &str,
    with_temperature: bool,
) -> Result<Table> {
    let mut table = Table::new();

    for object in entries_under(entry, json, root_key)? {
        let mut row = Row::new();
        row.insert("day", CellValue::from_json(required(entry, object, "day")?));
        row.insert(
            "score",
            CellValue::from_json(required(entry, object, "score")?),
        );
        if with_temperature {
            let deviation = object
                .get("temperature_deviation")
                .map(CellValue::from_json)
                .unwrap_or(CellValue::Null);
            row.insert("temperature_deviation", deviation);
        }

        let contributors = required(entry, object, "contributors")?
            .as_object()
            .ok_or_else(|| QselfError::Shape {
                entry: entry.to_string(),
                expected: "\"contributors\" to be a mapping".to_string(),
            })?;
        for (metric, value) in contributors {
            row.insert(metric.clone(), CellValue::from_json(value));
        }

        table.push(row);
    }

    Ok(table)
}

/// Flatten a sample stream (heart rate or location): every object under
/// `root_key` becomes one row verbatim.
fn flatten_verbatim(entry: &str, json: &Value, root_key: &str) -> Result<Table> {
    let mut table = Table::new();
    for object in entries_under(entry, json, root_key)? {
        table.push(Row::from_object(object));
    }
    Ok(table)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// The sequence of objects under the entry's required top-level key.
fn entries_under<'a>(
    entry: &str,
    json: &'a Value,
    root_key: &str,
) -> Result<Vec<&'a serde_json::Map<String, Value>>> {
    let sequence = json
        .get(root_key)
        .ok_or_else(|| QselfError::MissingKey {
            entry: entry.to_string(),
            key: root_key.to_string(),
        })?
        .as_array()
        .ok_or_else(|| QselfError::Shape {
            entry: entry.to_string(),
            expected: format!("\"{}\" to be a sequence", root_key),
        })?;

    sequence
        .iter()
        .map(|element| {
            element.as_object().ok_or_else(|| QselfError::Shape {
                entry: entry.to_string(),
                expected: format!("\"{}\" to be a sequence of objects", root_key),
            })
        })
        .collect()
}

fn required<'a>(entry: &str, object: &'a serde_json::Map<String, Value>, key: &str) -> Result<&'a Value> {
    object.get(key).ok_or_else(|| QselfError::MissingKey {
        entry: entry.to_string(),
        key: key.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    /// Build an in-memory ZIP with the given (name, content) entries.
    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
            for (name, content) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_readiness_entry_flattened_with_contributors() {
        let payload = json!({
            "daily_readiness": [
                {"day": "2024-01-01", "score": 85, "contributors": {"sleep_balance": 90}}
            ]
        });
        let bytes = build_zip(&[("oura_daily-readiness.json", &payload.to_string())]);

        let tables = normalize_wellness_archive(&bytes).unwrap();
        let readiness = tables.readiness.unwrap();

        assert_eq!(readiness.len(), 1);
        assert_eq!(
            readiness.columns(),
            vec!["day", "score", "temperature_deviation", "sleep_balance"]
        );
        assert_eq!(
            readiness.cell(0, "day"),
            &CellValue::Text("2024-01-01".to_string())
        );
        assert_eq!(readiness.cell(0, "score"), &CellValue::Int(85));
        assert!(readiness.cell(0, "temperature_deviation").is_null());
        assert_eq!(readiness.cell(0, "sleep_balance"), &CellValue::Int(90));
        assert!(tables.sleep.is_none());
        assert!(tables.heart_rate.is_none());
        assert!(tables.location.is_none());
    }

    #[test]
    fn test_readiness_temperature_deviation_when_present() {
        let payload = json!({
            "daily_readiness": [
                {
                    "day": "2024-01-02",
                    "score": 72,
                    "temperature_deviation": -0.13,
                    "contributors": {"hrv_balance": 64, "resting_heart_rate": 80}
                }
            ]
        });
        let bytes = build_zip(&[("oura_daily-readiness.json", &payload.to_string())]);

        let readiness = normalize_wellness_archive(&bytes)
            .unwrap()
            .readiness
            .unwrap();

        assert_eq!(
            readiness.cell(0, "temperature_deviation"),
            &CellValue::Float(-0.13)
        );
        assert_eq!(readiness.cell(0, "hrv_balance"), &CellValue::Int(64));
    }

    #[test]
    fn test_contributors_keep_source_order() {
        // Keys deliberately out of alphabetical order; the flattened
        // columns must follow the entry's own order, not a sorted one.
        let payload = r#"{
            "daily_readiness": [
                {
                    "day": "2024-01-01",
                    "score": 85,
                    "contributors": {
                        "sleep_balance": 90,
                        "activity_balance": 77,
                        "resting_heart_rate": 80,
                        "hrv_balance": 64
                    }
                }
            ]
        }"#;
        let bytes = build_zip(&[("oura_daily-readiness.json", payload)]);

        let readiness = normalize_wellness_archive(&bytes)
            .unwrap()
            .readiness
            .unwrap();

        assert_eq!(
            readiness.columns(),
            vec![
                "day",
                "score",
                "temperature_deviation",
                "sleep_balance",
                "activity_balance",
                "resting_heart_rate",
                "hrv_balance"
            ]
        );
    }

    #[test]
    fn test_sleep_entry_has_no_temperature_column() {
        let payload = json!({
            "daily_sleep": [
                {"day": "2024-01-01", "score": 78, "contributors": {"deep_sleep": 95, "efficiency": 88}}
            ]
        });
        let bytes = build_zip(&[("oura_daily-sleep.json", &payload.to_string())]);

        let sleep = normalize_wellness_archive(&bytes).unwrap().sleep.unwrap();

        assert_eq!(
            sleep.columns(),
            vec!["day", "score", "deep_sleep", "efficiency"]
        );
        assert_eq!(sleep.cell(0, "deep_sleep"), &CellValue::Int(95));
    }

    #[test]
    fn test_heart_rate_passthrough_with_uneven_keys() {
        let payload = json!({
            "heart_rate": [
                {"timestamp": "2024-01-01T00:00:30+00:00", "bpm": 61, "source": "ppg"},
                {"timestamp": "2024-01-01T00:05:30+00:00", "bpm": 58}
            ]
        });
        let bytes = build_zip(&[("oura_heart-rate.json", &payload.to_string())]);

        let heart_rate = normalize_wellness_archive(&bytes)
            .unwrap()
            .heart_rate
            .unwrap();

        assert_eq!(heart_rate.len(), 2);
        assert_eq!(heart_rate.columns(), vec!["timestamp", "bpm", "source"]);
        assert_eq!(heart_rate.cell(0, "bpm"), &CellValue::Int(61));
        // Missing key in the second sample tabulates as null.
        assert!(heart_rate.cell(1, "source").is_null());
    }

    #[test]
    fn test_location_passthrough() {
        let payload = json!({
            "smoothed_location": [
                {"timestamp": "2024-01-01T08:00:00+00:00", "lat": 59.43, "lon": 24.75}
            ]
        });
        let bytes = build_zip(&[("oura_smoothed-location_2024.json", &payload.to_string())]);

        let location = normalize_wellness_archive(&bytes).unwrap().location.unwrap();

        assert_eq!(location.len(), 1);
        assert_eq!(location.cell(0, "lat"), &CellValue::Float(59.43));
    }

    #[test]
    fn test_unrecognized_entries_ignored() {
        // notes.txt is not even JSON; it must be skipped before parsing.
        let bytes = build_zip(&[("notes.txt", "just some notes")]);

        let tables = normalize_wellness_archive(&bytes).unwrap();

        assert!(tables.is_empty());
    }

    #[test]
    fn test_invalid_container_is_container_error() {
        let result = normalize_wellness_archive(b"definitely not a zip archive");
        assert!(matches!(result, Err(QselfError::Container(_))));
    }

    #[test]
    fn test_malformed_json_in_recognized_entry_fails_whole_archive() {
        let readiness = json!({
            "daily_readiness": [
                {"day": "2024-01-01", "score": 85, "contributors": {}}
            ]
        });
        let bytes = build_zip(&[
            ("oura_daily-readiness.json", &readiness.to_string()),
            ("oura_daily-sleep.json", "{not valid json"),
        ]);

        let result = normalize_wellness_archive(&bytes);

        assert!(matches!(result, Err(QselfError::Json(_))));
    }

    #[test]
    fn test_missing_required_key_names_entry_and_key() {
        let payload = json!({
            "daily_sleep": [
                {"day": "2024-01-01", "contributors": {}}
            ]
        });
        let bytes = build_zip(&[("oura_daily-sleep.json", &payload.to_string())]);

        let err = normalize_wellness_archive(&bytes).unwrap_err();

        match err {
            QselfError::MissingKey { entry, key } => {
                assert_eq!(entry, "oura_daily-sleep.json");
                assert_eq!(key, "score");
            }
            other => panic!("expected MissingKey, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_root_key_is_error() {
        let payload = json!({"wrong_root": []});
        let bytes = build_zip(&[("oura_heart-rate.json", &payload.to_string())]);

        let err = normalize_wellness_archive(&bytes).unwrap_err();

        assert!(matches!(err, QselfError::MissingKey { ref key, .. } if key == "heart_rate"));
    }

    #[test]
    fn test_root_key_not_a_sequence_is_shape_error() {
        let payload = json!({"heart_rate": {"bpm": 61}});
        let bytes = build_zip(&[("oura_heart-rate.json", &payload.to_string())]);

        let err = normalize_wellness_archive(&bytes).unwrap_err();

        assert!(matches!(err, QselfError::Shape { .. }));
    }

    #[test]
    fn test_duplicate_prefix_last_write_wins() {
        let first = json!({"heart_rate": [{"bpm": 60}]});
        let second = json!({"heart_rate": [{"bpm": 61}, {"bpm": 62}]});
        let bytes = build_zip(&[
            ("oura_heart-rate_part1.json", &first.to_string()),
            ("oura_heart-rate_part2.json", &second.to_string()),
        ]);

        let heart_rate = normalize_wellness_archive(&bytes)
            .unwrap()
            .heart_rate
            .unwrap();

        assert_eq!(heart_rate.len(), 2);
        assert_eq!(heart_rate.cell(0, "bpm"), &CellValue::Int(61));
    }

    #[test]
    fn test_empty_sequence_yields_empty_present_table() {
        let payload = json!({"daily_sleep": []});
        let bytes = build_zip(&[("oura_daily-sleep.json", &payload.to_string())]);

        let tables = normalize_wellness_archive(&bytes).unwrap();

        let sleep = tables.sleep.unwrap();
        assert!(sleep.is_empty());
    }
}
