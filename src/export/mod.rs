//! Export workflow: fetch rows for a validated selection, shape them into a
//! table and write it as a spreadsheet or PDF.

mod document;
mod error;
mod spreadsheet;

pub use error::ExportError;

use crate::backend::{Backend, ExportRow};
use crate::state::export::{ExportFormat, ExportSelection};
use chrono::{DateTime, Local, NaiveDateTime};
use log::*;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Column whose timestamps are reformatted for display.
const CREATED_AT: &str = "created_at";

/// Rows ready for an encoder, cells in column order.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub columns: Vec<String>,
    pub labels: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// Shape raw rows: absent or null values become empty strings and
    /// `created_at` is shown as `YYYY-MM-DD HH:MM` when it parses.
    ///
    pub fn build(columns: &[String], rows: &[ExportRow]) -> Self {
        ExportTable {
            columns: columns.to_vec(),
            labels: columns.iter().map(|key| capitalize(key)).collect(),
            rows: rows
                .iter()
                .map(|row| {
                    columns
                        .iter()
                        .map(|key| cell(key, row.get(key)))
                        .collect()
                })
                .collect(),
        }
    }
}

/// Upper-case the first character of a column key.
///
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn cell(key: &str, value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) if key == CREATED_AT => format_created_at(text),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Reformat a timestamp in local time; unparseable text is kept verbatim.
///
pub fn format_created_at(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M";
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.with_timezone(&Local).format(DISPLAY).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.format(DISPLAY).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Validate the selection, fetch rows and write `export.xlsx` or
/// `export.pdf` into `dir`. Returns the written path. Nothing is requested
/// when validation fails and nothing is written when no rows come back.
///
pub async fn run(
    backend: &Backend,
    selection: &ExportSelection,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let request = selection.prepare()?;
    info!(
        "Exporting {} column(s) from {} to {}...",
        request.columns.len(),
        request.start,
        request.end
    );
    let rows = backend
        .export_rows(&request.columns, request.start, request.end)
        .await?;
    if rows.is_empty() {
        return Err(ExportError::EmptyResult);
    }

    let table = ExportTable::build(&request.columns, &rows);
    let bytes = match format {
        ExportFormat::Spreadsheet => spreadsheet::encode(&table)?,
        ExportFormat::Document => tokio::task::spawn_blocking(move || document::encode(&table))
            .await
            .map_err(|e| ExportError::Encode {
                format: "PDF",
                message: format!("encoder task failed: {}", e),
            })??,
    };

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format.file_name());
    tokio::fs::write(&path, bytes).await?;
    info!("Wrote {} row(s) to {}.", rows.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ExportColumn;
    use crate::state::calendar::CalendarWindow;
    use crate::state::export::{ExportValidationError, RangeField};
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use serde_json::json;

    fn row(value: Value) -> ExportRow {
        value.as_object().unwrap().clone()
    }

    fn selection(columns: &[&str]) -> ExportSelection {
        let window = CalendarWindow::containing(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        let catalog = columns
            .iter()
            .map(|key| ExportColumn {
                key: key.to_string(),
                label: capitalize(key),
            })
            .collect();
        let mut selection = ExportSelection::open(Some(window), catalog);
        for key in columns {
            selection.toggle_column(key);
        }
        selection
    }

    #[test]
    fn capitalize_first_letter_only() {
        assert_eq!(capitalize("title"), "Title");
        assert_eq!(capitalize("created_at"), "Created_at");
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn created_at_reformatted_when_parseable() {
        assert_eq!(format_created_at("2025-05-03T14:07:59"), "2025-05-03 14:07");
        assert_eq!(format_created_at("2025-05-03 14:07:59.123"), "2025-05-03 14:07");
        assert_eq!(format_created_at("yesterday"), "yesterday");
        let with_offset = DateTime::parse_from_rfc3339("2025-05-03T14:07:00+07:00").unwrap();
        assert_eq!(
            format_created_at("2025-05-03T14:07:00+07:00"),
            with_offset
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        );
    }

    #[test]
    fn build_fills_missing_and_null_cells() {
        let columns = vec![
            "id".to_string(),
            "title".to_string(),
            "location".to_string(),
            "created_at".to_string(),
        ];
        let rows = vec![
            row(json!({"id": 7, "title": "Leak", "location": null, "created_at": "2025-05-03T14:07:59"})),
            row(json!({"title": "Noise", "created_at": "not a date"})),
        ];
        let table = ExportTable::build(&columns, &rows);
        assert_eq!(table.labels, vec!["Id", "Title", "Location", "Created_at"]);
        assert_eq!(table.rows[0], vec!["7", "Leak", "", "2025-05-03 14:07"]);
        assert_eq!(table.rows[1], vec!["", "Noise", "", "not a date"]);
    }

    #[tokio::test]
    async fn reversed_range_makes_no_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/case/export/");
            then.status(200).json_body(json!([]));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let mut selection = selection(&["title"]);
        selection.set_range_field(RangeField::Start, "2025-05-10T00:00");
        selection.set_range_field(RangeField::End, "2025-05-01T00:00");
        let dir = tempfile::tempdir().unwrap();

        let result = run(&backend, &selection, ExportFormat::Spreadsheet, dir.path()).await;
        assert!(matches!(
            result,
            Err(ExportError::Validation(ExportValidationError::UnorderedRange))
        ));
        assert_eq!(mock.hits(), 0);
    }

    #[tokio::test]
    async fn no_columns_makes_no_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/case/export/");
            then.status(200).json_body(json!([]));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result = run(&backend, &selection(&[]), ExportFormat::Document, dir.path()).await;
        assert!(matches!(
            result,
            Err(ExportError::Validation(ExportValidationError::NoColumns))
        ));
        assert_eq!(mock.hits(), 0);
    }

    #[tokio::test]
    async fn empty_result_writes_nothing() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/case/export/");
            then.status(200).json_body(json!([]));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result = run(
            &backend,
            &selection(&["title"]),
            ExportFormat::Spreadsheet,
            dir.path(),
        )
        .await;
        assert!(matches!(result, Err(ExportError::EmptyResult)));
        mock.assert();
        assert!(!dir.path().join("export.xlsx").exists());
    }

    #[tokio::test]
    async fn spreadsheet_written_to_export_dir() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/case/export/")
                .json_body_partial(r#"{"columns": ["title", "status"]}"#);
            then.status(200).json_body(json!([
                {"title": "Leak", "status": "pending"},
                {"title": "Noise", "status": null}
            ]));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = run(
            &backend,
            &selection(&["title", "status"]),
            ExportFormat::Spreadsheet,
            &dir.path().join("nested"),
        )
        .await
        .unwrap();
        mock.assert();
        assert_eq!(path, dir.path().join("nested").join("export.xlsx"));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[tokio::test]
    async fn document_written_to_export_dir() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/case/export/");
            then.status(200)
                .json_body(json!([{"title": "Leak", "created_at": "2025-05-03T14:07:59"}]));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = run(
            &backend,
            &selection(&["title", "created_at"]),
            ExportFormat::Document,
            dir.path(),
        )
        .await
        .unwrap();
        assert_eq!(path.file_name().unwrap(), "export.pdf");
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn backend_failure_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/case/export/");
            then.status(500).json_body(json!({"error": "database unavailable"}));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result = run(
            &backend,
            &selection(&["title"]),
            ExportFormat::Spreadsheet,
            dir.path(),
        )
        .await;
        match result {
            Err(ExportError::Backend(e)) => {
                assert_eq!(e.backend_message(), Some("database unavailable"))
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_backend_reports_transport_detail() {
        let backend = Backend::new("http://127.0.0.1:1").unwrap();
        let dir = tempfile::tempdir().unwrap();

        let error = run(
            &backend,
            &selection(&["title"]),
            ExportFormat::Spreadsheet,
            dir.path(),
        )
        .await
        .unwrap_err();
        let message = error.to_string();
        assert!(matches!(error, ExportError::Backend(_)));
        assert!(!message.contains("Unknown error"), "{}", message);
        assert!(message.contains("HTTP request failed"), "{}", message);
        assert!(message.contains("127.0.0.1:1"), "{}", message);
    }
}
