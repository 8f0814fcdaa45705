//! # File Formats
//!
//! - [`csv`]: the export format, and an importer that reads it back.
//! - [`json`]: the import format (a bare record array, or `{"records": [...]}`).
//!
//! Both importers are all-or-nothing: one bad record rejects the whole file
//! with [`DaybookError::InvalidImport`].

use crate::error::{DaybookError, Result};
use crate::model::Record;
use std::path::Path;

pub mod csv;
pub mod json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// `.csv` files are CSV, everything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ImportFormat::Csv,
            _ => ImportFormat::Json,
        }
    }
}

pub fn parse_import(format: ImportFormat, content: &str) -> Result<Vec<Record>> {
    match format {
        ImportFormat::Json => json::parse_records(content),
        ImportFormat::Csv => csv::parse_records(content),
    }
}

pub(crate) fn invalid(msg: impl Into<String>) -> DaybookError {
    DaybookError::InvalidImport(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(ImportFormat::from_path(Path::new("a/b.CSV")), ImportFormat::Csv);
        assert_eq!(ImportFormat::from_path(Path::new("b.json")), ImportFormat::Json);
        assert_eq!(ImportFormat::from_path(Path::new("backup")), ImportFormat::Json);
    }
}
