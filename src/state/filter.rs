//! Live filter over the fetched case list.

use crate::backend::{Case, CaseStatus};
use std::fmt;

/// Status filter options.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CaseStatus),
}

impl StatusFilter {
    fn matches(&self, status: CaseStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// All -> each known status in turn -> All.
    ///
    fn next(self) -> Self {
        let statuses = CaseStatus::ALL;
        match self {
            StatusFilter::All => StatusFilter::Only(statuses[0]),
            StatusFilter::Only(status) => match statuses.iter().position(|s| *s == status) {
                Some(index) if index + 1 < statuses.len() => StatusFilter::Only(statuses[index + 1]),
                _ => StatusFilter::All,
            },
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "All"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

/// Filter state owned by the case list view.
///
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CaseFilter {
    status: StatusFilter,
    search: String,
    search_mode: bool,
}

impl CaseFilter {
    pub fn status(&self) -> StatusFilter {
        self.status
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.status = status;
    }

    pub fn cycle_status_filter(&mut self) {
        self.status = self.status.next();
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
    }

    pub fn is_search_mode(&self) -> bool {
        self.search_mode
    }

    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
    }

    pub fn exit_search_mode(&mut self) {
        self.search_mode = false;
    }

    /// Derive the visible cases, keeping source order. Search text matches
    /// title or identifier as a case-insensitive substring.
    ///
    pub fn visible_cases<'a>(&self, cases: &'a [Case]) -> Vec<&'a Case> {
        let needle = self.search.to_lowercase();
        cases
            .iter()
            .filter(|case| self.status.matches(case.status))
            .filter(|case| {
                needle.is_empty()
                    || case.title.to_lowercase().contains(&needle)
                    || case.id.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    fn case(id: &str, title: &str, status: CaseStatus) -> Case {
        Case {
            id: id.to_string(),
            title: title.to_string(),
            status,
            ..Faker.fake::<Case>()
        }
    }

    fn cases() -> Vec<Case> {
        vec![
            case("CASE-001", "Pothole in front of the school", CaseStatus::InProgress),
            case("CASE-002", "Street light request", CaseStatus::Pending),
            case("CASE-003", "Garbage not collected", CaseStatus::Completed),
        ]
    }

    #[test]
    fn default_shows_everything_in_order() {
        let cases = cases();
        let visible = CaseFilter::default().visible_cases(&cases);
        let ids: Vec<&str> = visible.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["CASE-001", "CASE-002", "CASE-003"]);
    }

    #[test]
    fn status_filter_selects_matching_cases() {
        let cases = cases();
        let mut filter = CaseFilter::default();
        filter.set_status_filter(StatusFilter::Only(CaseStatus::Completed));
        let visible = filter.visible_cases(&cases);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "CASE-003");
    }

    #[test]
    fn search_matches_identifier_ignoring_case() {
        let cases = cases();
        let mut filter = CaseFilter::default();
        filter.set_search_text("case-002");
        let visible = filter.visible_cases(&cases);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "CASE-002");

        filter.set_search_text("CaSe-002");
        assert_eq!(filter.visible_cases(&cases)[0].id, "CASE-002");
    }

    #[test]
    fn search_matches_title_substring() {
        let cases = cases();
        let mut filter = CaseFilter::default();
        filter.set_search_text("LIGHT");
        let visible = filter.visible_cases(&cases);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "CASE-002");
    }

    #[test]
    fn status_and_search_combine() {
        let cases = cases();
        let mut filter = CaseFilter::default();
        filter.set_status_filter(StatusFilter::Only(CaseStatus::Completed));
        filter.set_search_text("light");
        assert!(filter.visible_cases(&cases).is_empty());
    }

    #[test]
    fn search_chars_edit_text() {
        let mut filter = CaseFilter::default();
        filter.push_search_char('a');
        filter.push_search_char('b');
        filter.pop_search_char();
        assert_eq!(filter.search(), "a");
    }

    #[test]
    fn cycle_status_filter_visits_every_status() {
        let mut filter = CaseFilter::default();
        let mut seen = vec![filter.status()];
        for _ in 0..4 {
            filter.cycle_status_filter();
            seen.push(filter.status());
        }
        assert_eq!(
            seen,
            vec![
                StatusFilter::All,
                StatusFilter::Only(CaseStatus::Pending),
                StatusFilter::Only(CaseStatus::InProgress),
                StatusFilter::Only(CaseStatus::Completed),
                StatusFilter::All,
            ]
        );
    }
}
