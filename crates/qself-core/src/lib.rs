//! Core types for qself.
//!
//! Defines the dynamic table model shared by the normalizers and the UI,
//! the error type used across all crates, CLI settings, and display
//! formatting helpers.

pub mod error;
pub mod formatting;
pub mod settings;
pub mod table;

pub use error::{QselfError, Result};
pub use table::{CellValue, Row, Table};
