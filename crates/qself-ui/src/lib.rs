//! Terminal UI for qself.
//!
//! Renders the normalized tables as bordered, themed ratatui tables with
//! dynamically computed columns, plus error banners for failed pipelines.

pub mod app;
pub mod table_view;
pub mod themes;

pub use app::{App, DisplayBlock};
