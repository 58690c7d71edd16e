use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Terminal viewer for quantified-self exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "qself",
    about = "Terminal viewer for quantified-self exports (Tockler activity logs and Oura archives)",
    version
)]
pub struct Settings {
    /// Activity-log CSV export (Tockler: Search > set a period > Export to CSV)
    #[arg(long, value_name = "FILE")]
    pub activity_log: Option<PathBuf>,

    /// Wellness ZIP archive (Oura: cloud.ouraring.com/profile > Export Data)
    #[arg(long, value_name = "FILE")]
    pub wellness_archive: Option<PathBuf>,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
