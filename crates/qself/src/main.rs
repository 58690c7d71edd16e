mod bootstrap;

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use qself_core::settings::Settings;
use qself_core::QselfError;
use qself_data::{normalize_activity_log, normalize_wellness_archive};
use qself_ui::{App, DisplayBlock};

fn main() -> Result<()> {
    let settings = Settings::parse();
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("qself v{} starting", env!("CARGO_PKG_VERSION"));

    // Fixed display order: activity preview and cleaned table first, then
    // the wellness tables.  An absent upload slot contributes nothing; a
    // failed pipeline contributes one error banner in its slot's place.
    let mut blocks: Vec<DisplayBlock> = Vec::new();
    if let Some(path) = settings.activity_log.as_deref() {
        blocks.extend(activity_blocks(path));
    }
    if let Some(path) = settings.wellness_archive.as_deref() {
        blocks.extend(wellness_blocks(path));
    }

    App::new(&settings.theme, blocks).run()?;
    Ok(())
}

// ── Pipeline dispatch ──────────────────────────────────────────────────────────

/// Buffer one upload fully into memory.
fn read_upload(path: &Path) -> qself_core::Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| QselfError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Run the activity pipeline for an uploaded file.
///
/// On success: the raw 5-row preview followed by the cleaned table.  On
/// any failure: a single error banner, no partial table.
fn activity_blocks(path: &Path) -> Vec<DisplayBlock> {
    match read_upload(path).and_then(|bytes| normalize_activity_log(&bytes)) {
        Ok(report) => vec![
            DisplayBlock::table("Raw Activity Preview", report.preview),
            DisplayBlock::table("Activity Log", report.cleaned),
        ],
        Err(err) => {
            tracing::error!("Activity pipeline failed: {}", err);
            vec![DisplayBlock::error("Activity Log", err.to_string())]
        }
    }
}

/// Run the wellness pipeline for an uploaded archive.
///
/// On success: up to four labeled tables in readiness, sleep, heart-rate,
/// location order (absent categories are simply not shown).  On any
/// failure: a single error banner replacing all four.
fn wellness_blocks(path: &Path) -> Vec<DisplayBlock> {
    match read_upload(path).and_then(|bytes| normalize_wellness_archive(&bytes)) {
        Ok(tables) => {
            let mut blocks = Vec::new();
            if let Some(table) = tables.readiness {
                blocks.push(DisplayBlock::table("Daily Readiness", table));
            }
            if let Some(table) = tables.sleep {
                blocks.push(DisplayBlock::table("Daily Sleep", table));
            }
            if let Some(table) = tables.heart_rate {
                blocks.push(DisplayBlock::table("Heart Rate", table));
            }
            if let Some(table) = tables.location {
                blocks.push(DisplayBlock::table("Smoothed Location", table));
            }
            blocks
        }
        Err(err) => {
            tracing::error!("Wellness pipeline failed: {}", err);
            vec![DisplayBlock::error("Wellness Archive", err.to_string())]
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn block_titles(blocks: &[DisplayBlock]) -> Vec<&str> {
        blocks.iter().map(|b| b.title()).collect()
    }

    // ── activity_blocks ───────────────────────────────────────────────────────

    #[test]
    fn test_activity_blocks_preview_then_cleaned() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "tockler.csv",
            b"Begin;End;Title;Type\n2024-01-01T10:00;2024-01-01T10:05;Meeting;work\n",
        );

        let blocks = activity_blocks(&path);

        assert_eq!(
            block_titles(&blocks),
            vec!["Raw Activity Preview", "Activity Log"]
        );
    }

    #[test]
    fn test_activity_blocks_parse_failure_is_single_banner() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "tockler.csv",
            b"Begin;End;Title\na;b;c\ntoo;many;fields;here\n",
        );

        let blocks = activity_blocks(&path);

        assert_eq!(blocks.len(), 1);
        assert!(matches!(&blocks[0], DisplayBlock::Error { title, .. } if title == "Activity Log"));
    }

    #[test]
    fn test_activity_blocks_missing_file_is_banner() {
        let blocks = activity_blocks(Path::new("/does/not/exist.csv"));

        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            DisplayBlock::Error { message, .. } => {
                assert!(message.contains("Failed to read file"));
            }
            other => panic!("expected error banner, got {:?}", other),
        }
    }

    // ── wellness_blocks ───────────────────────────────────────────────────────

    #[test]
    fn test_wellness_blocks_fixed_order() {
        let dir = TempDir::new().unwrap();
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            let options = SimpleFileOptions::default();
            // Insert out of display order on purpose.
            writer
                .start_file("oura_heart-rate.json", options)
                .unwrap();
            writer
                .write_all(json!({"heart_rate": [{"bpm": 61}]}).to_string().as_bytes())
                .unwrap();
            writer
                .start_file("oura_daily-readiness.json", options)
                .unwrap();
            writer
                .write_all(
                    json!({"daily_readiness": [
                        {"day": "2024-01-01", "score": 85, "contributors": {"sleep_balance": 90}}
                    ]})
                    .to_string()
                    .as_bytes(),
                )
                .unwrap();
            writer.finish().unwrap();
        }
        let path = write_file(&dir, "oura.zip", &buf);

        let blocks = wellness_blocks(&path);

        assert_eq!(block_titles(&blocks), vec!["Daily Readiness", "Heart Rate"]);
    }

    #[test]
    fn test_wellness_blocks_invalid_container_is_banner() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "oura.zip", b"arbitrary bytes, not a zip");

        let blocks = wellness_blocks(&path);

        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            DisplayBlock::Error { title, message } => {
                assert_eq!(title, "Wellness Archive");
                assert!(message.contains("Invalid ZIP archive"));
            }
            other => panic!("expected error banner, got {:?}", other),
        }
    }

    #[test]
    fn test_wellness_blocks_unrecognized_only_archive_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            writer
                .start_file("notes.txt", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"not json at all").unwrap();
            writer.finish().unwrap();
        }
        let path = write_file(&dir, "oura.zip", &buf);

        let blocks = wellness_blocks(&path);

        assert!(blocks.is_empty());
    }
}
