//! Normalization pipelines for qself.
//!
//! Two independent, pure pipelines: the activity-log normalizer turns raw
//! Tockler CSV bytes into a cleaned table plus a raw preview, and the
//! wellness-archive normalizer turns raw Oura ZIP bytes into up to four
//! flattened metric tables.  Neither pipeline shares state with the other
//! or retains anything across runs.

pub mod activity;
pub mod wellness;

pub use activity::{normalize_activity_log, ActivityReport};
pub use wellness::{normalize_wellness_archive, WellnessTables};
