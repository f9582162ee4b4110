//! Export dialog state: date window and column selection.

use super::calendar::CalendarWindow;
use crate::backend::ExportColumn;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Format used for range inputs.
pub const RANGE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Range endpoint.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RangeField {
    Start,
    End,
}

/// Part of the dialog receiving keys.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ExportFocus {
    Columns,
    Range(RangeField),
}

/// Output format of an export.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ExportFormat {
    Spreadsheet,
    Document,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "export.xlsx",
            ExportFormat::Document => "export.pdf",
        }
    }
}

/// Checks run before any rows are requested, in this order.
///
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum ExportValidationError {
    #[error("Please select a valid date range")]
    MissingRange,

    #[error("Invalid date: {0} does not exist in local time")]
    InvalidDate(NaiveDateTime),

    #[error("Start date must be before end date")]
    UnorderedRange,

    #[error("Please select at least one column")]
    NoColumns,
}

/// Validated export parameters.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub columns: Vec<String>,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

/// Selection held while the export dialog is open.
///
#[derive(Debug, Clone, Default)]
pub struct ExportSelection {
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    columns: Vec<String>,
    catalog: Vec<ExportColumn>,
    focus: Option<ExportFocus>,
    column_index: usize,
    input: String,
}

impl ExportSelection {
    /// Initialise from the displayed calendar window, or the first to last
    /// day of the current month when there is none.
    ///
    pub fn open(window: Option<CalendarWindow>, catalog: Vec<ExportColumn>) -> Self {
        let (start, end) = match window {
            Some(window) => (window.start(), window.end()),
            None => {
                let month = CalendarWindow::current();
                (month.start(), month.last_day().and_time(NaiveTime::MIN))
            }
        };
        ExportSelection {
            start: Some(start),
            end: Some(end),
            catalog,
            focus: Some(ExportFocus::Columns),
            ..ExportSelection::default()
        }
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    pub fn catalog(&self) -> &[ExportColumn] {
        &self.catalog
    }

    pub fn selected_columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.columns.iter().any(|column| column == key)
    }

    /// Add `key` when absent, remove it when present.
    ///
    pub fn toggle_column(&mut self, key: &str) {
        match self.columns.iter().position(|column| column == key) {
            Some(index) => {
                self.columns.remove(index);
            }
            None => self.columns.push(key.to_string()),
        }
    }

    /// Parse `raw` into the endpoint; unparseable input leaves it unchanged.
    /// Returns whether the value was applied.
    ///
    pub fn set_range_field(&mut self, which: RangeField, raw: &str) -> bool {
        match parse_date_time(raw) {
            Some(value) => {
                match which {
                    RangeField::Start => self.start = Some(value),
                    RangeField::End => self.end = Some(value),
                }
                true
            }
            None => false,
        }
    }

    /// Validate and resolve the selection into request parameters.
    ///
    pub fn prepare(&self) -> Result<ExportRequest, ExportValidationError> {
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (resolve_local(start)?, resolve_local(end)?),
            _ => return Err(ExportValidationError::MissingRange),
        };
        if start >= end {
            return Err(ExportValidationError::UnorderedRange);
        }
        if self.columns.is_empty() {
            return Err(ExportValidationError::NoColumns);
        }
        Ok(ExportRequest {
            columns: self.columns.clone(),
            start,
            end,
        })
    }

    // Key handling helpers

    pub fn focus(&self) -> Option<ExportFocus> {
        self.focus
    }

    pub fn column_index(&self) -> usize {
        self.column_index
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Cycle focus columns -> start -> end, committing any range input.
    ///
    pub fn next_focus(&mut self) {
        self.commit_input();
        self.focus = Some(match self.focus {
            Some(ExportFocus::Columns) | None => ExportFocus::Range(RangeField::Start),
            Some(ExportFocus::Range(RangeField::Start)) => ExportFocus::Range(RangeField::End),
            Some(ExportFocus::Range(RangeField::End)) => ExportFocus::Columns,
        });
        self.load_input();
    }

    pub fn previous_focus(&mut self) {
        self.commit_input();
        self.focus = Some(match self.focus {
            Some(ExportFocus::Columns) | None => ExportFocus::Range(RangeField::End),
            Some(ExportFocus::Range(RangeField::End)) => ExportFocus::Range(RangeField::Start),
            Some(ExportFocus::Range(RangeField::Start)) => ExportFocus::Columns,
        });
        self.load_input();
    }

    pub fn next_column(&mut self) {
        if !self.catalog.is_empty() {
            self.column_index = (self.column_index + 1) % self.catalog.len();
        }
    }

    pub fn previous_column(&mut self) {
        if !self.catalog.is_empty() {
            self.column_index = self
                .column_index
                .checked_sub(1)
                .unwrap_or(self.catalog.len() - 1);
        }
    }

    pub fn toggle_current_column(&mut self) {
        if let Some(key) = self.catalog.get(self.column_index).map(|c| c.key.clone()) {
            self.toggle_column(&key);
        }
    }

    pub fn push_input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input_char(&mut self) {
        self.input.pop();
    }

    /// Apply the range input to the focused endpoint, then show the stored
    /// value again (so rejected input snaps back).
    ///
    pub fn commit_input(&mut self) {
        if let Some(ExportFocus::Range(which)) = self.focus {
            let raw = std::mem::take(&mut self.input);
            self.set_range_field(which, &raw);
            self.load_input();
        }
    }

    fn load_input(&mut self) {
        self.input = match self.focus {
            Some(ExportFocus::Range(RangeField::Start)) => format_input(self.start),
            Some(ExportFocus::Range(RangeField::End)) => format_input(self.end),
            _ => String::new(),
        };
    }
}

/// Render an endpoint the way the range inputs display it.
///
pub fn format_input(value: Option<NaiveDateTime>) -> String {
    value
        .map(|v| v.format(RANGE_INPUT_FORMAT).to_string())
        .unwrap_or_default()
}

/// Accepts `YYYY-MM-DDTHH:MM[:SS]`, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DD`
/// and RFC 3339.
///
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Local).naive_local())
        })
}

fn resolve_local(value: NaiveDateTime) -> Result<DateTime<Local>, ExportValidationError> {
    Local
        .from_local_datetime(&value)
        .earliest()
        .ok_or(ExportValidationError::InvalidDate(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> NaiveDateTime {
        parse_date_time(raw).unwrap()
    }

    fn catalog() -> Vec<ExportColumn> {
        vec![
            ExportColumn {
                key: "title".to_string(),
                label: "Title".to_string(),
            },
            ExportColumn {
                key: "created_at".to_string(),
                label: "Created At".to_string(),
            },
        ]
    }

    fn may() -> CalendarWindow {
        CalendarWindow::containing(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
    }

    #[test]
    fn open_uses_displayed_window() {
        let selection = ExportSelection::open(Some(may()), catalog());
        assert_eq!(selection.start(), Some(at("2025-05-01T00:00")));
        assert_eq!(selection.end(), Some(at("2025-06-01T00:00")));
        assert_eq!(selection.catalog().len(), 2);
        assert!(selection.selected_columns().is_empty());
    }

    #[test]
    fn open_without_window_uses_current_month() {
        let month = CalendarWindow::current();
        let selection = ExportSelection::open(None, vec![]);
        assert_eq!(selection.start(), Some(month.start()));
        assert_eq!(
            selection.end(),
            Some(month.last_day().and_time(NaiveTime::MIN))
        );
    }

    #[test]
    fn toggle_twice_restores_selection() {
        let mut selection = ExportSelection::open(Some(may()), catalog());
        selection.toggle_column("title");
        let before = selection.selected_columns().to_vec();
        selection.toggle_column("created_at");
        selection.toggle_column("created_at");
        assert_eq!(selection.selected_columns(), before.as_slice());
    }

    #[test]
    fn toggle_keeps_insertion_order() {
        let mut selection = ExportSelection::default();
        selection.toggle_column("status");
        selection.toggle_column("title");
        selection.toggle_column("id");
        selection.toggle_column("title");
        assert_eq!(selection.selected_columns(), ["status", "id"]);
    }

    #[test]
    fn unparseable_range_input_is_ignored() {
        let mut selection = ExportSelection::open(Some(may()), catalog());
        assert!(!selection.set_range_field(RangeField::Start, "next tuesday"));
        assert!(!selection.set_range_field(RangeField::End, ""));
        assert_eq!(selection.start(), Some(at("2025-05-01T00:00")));
        assert_eq!(selection.end(), Some(at("2025-06-01T00:00")));
    }

    #[test]
    fn accepted_range_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 5, 10)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(parse_date_time("2025-05-10T08:30"), Some(expected));
        assert_eq!(parse_date_time("2025-05-10T08:30:00"), Some(expected));
        assert_eq!(parse_date_time(" 2025-05-10 08:30 "), Some(expected));
        assert_eq!(
            parse_date_time("2025-05-10"),
            Some(expected.date().and_time(NaiveTime::MIN))
        );
        assert!(parse_date_time("2025-05-10T08:30:00+00:00").is_some());
        assert_eq!(parse_date_time("2025-13-10"), None);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut selection = ExportSelection::open(Some(may()), catalog());
        selection.toggle_column("title");
        selection.set_range_field(RangeField::Start, "2025-05-10T00:00");
        selection.set_range_field(RangeField::End, "2025-05-01T00:00");
        assert_eq!(
            selection.prepare(),
            Err(ExportValidationError::UnorderedRange)
        );
    }

    #[test]
    fn equal_endpoints_are_rejected() {
        let mut selection = ExportSelection::open(Some(may()), catalog());
        selection.toggle_column("title");
        selection.set_range_field(RangeField::Start, "2025-05-10T00:00");
        selection.set_range_field(RangeField::End, "2025-05-10T00:00");
        assert_eq!(
            selection.prepare(),
            Err(ExportValidationError::UnorderedRange)
        );
    }

    #[test]
    fn empty_column_selection_is_rejected() {
        let selection = ExportSelection::open(Some(may()), catalog());
        assert_eq!(selection.prepare(), Err(ExportValidationError::NoColumns));
    }

    #[test]
    fn missing_range_is_checked_first() {
        let selection = ExportSelection::default();
        assert_eq!(selection.prepare(), Err(ExportValidationError::MissingRange));
    }

    #[test]
    fn valid_selection_prepares_request() {
        let mut selection = ExportSelection::open(Some(may()), catalog());
        selection.toggle_column("created_at");
        selection.toggle_column("title");
        let request = selection.prepare().unwrap();
        assert_eq!(request.columns, vec!["created_at", "title"]);
        assert_eq!(request.start.naive_local(), at("2025-05-01T00:00"));
        assert_eq!(request.end.naive_local(), at("2025-06-01T00:00"));
    }

    #[test]
    fn distinct_messages_per_check() {
        let messages: Vec<String> = [
            ExportValidationError::MissingRange,
            ExportValidationError::InvalidDate(at("2025-03-30T02:30")),
            ExportValidationError::UnorderedRange,
            ExportValidationError::NoColumns,
        ]
        .iter()
        .map(|e| e.to_string())
        .collect();
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn range_input_commits_on_focus_change() {
        let mut selection = ExportSelection::open(Some(may()), catalog());
        selection.next_focus();
        assert_eq!(selection.focus(), Some(ExportFocus::Range(RangeField::Start)));
        assert_eq!(selection.input(), "2025-05-01T00:00");

        for _ in 0..5 {
            selection.pop_input_char();
        }
        for c in "08:15".chars() {
            selection.push_input_char(c);
        }
        selection.next_focus();
        assert_eq!(selection.start(), Some(at("2025-05-01T08:15")));
        assert_eq!(selection.input(), "2025-06-01T00:00");
    }

    #[test]
    fn rejected_range_input_snaps_back() {
        let mut selection = ExportSelection::open(Some(may()), catalog());
        selection.next_focus();
        selection.push_input_char('x');
        selection.commit_input();
        assert_eq!(selection.input(), "2025-05-01T00:00");
        assert_eq!(selection.start(), Some(at("2025-05-01T00:00")));
    }

    #[test]
    fn column_cursor_toggles_catalog_entries() {
        let mut selection = ExportSelection::open(Some(may()), catalog());
        selection.next_column();
        selection.toggle_current_column();
        assert!(selection.is_selected("created_at"));
        selection.next_column();
        assert_eq!(selection.column_index(), 0);
        selection.previous_column();
        assert_eq!(selection.column_index(), 1);
    }
}
