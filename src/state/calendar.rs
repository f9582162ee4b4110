//! Calendar month window the case list is scoped to.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Half-open `[start, end)` window covering one calendar month, in local
/// wall-clock time.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    first_day: NaiveDate,
}

impl CalendarWindow {
    /// Returns the window for the month containing `date`.
    ///
    pub fn containing(date: NaiveDate) -> Self {
        CalendarWindow {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    /// Returns the window for the current month.
    ///
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn start(&self) -> NaiveDateTime {
        self.first_day.and_time(NaiveTime::MIN)
    }

    pub fn end(&self) -> NaiveDateTime {
        self.next().start()
    }

    /// Last day of the month, for display and export defaults.
    ///
    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day - Duration::days(1)
    }

    pub fn next(&self) -> Self {
        let (year, month) = match self.first_day.month() {
            12 => (self.first_day.year() + 1, 1),
            month => (self.first_day.year(), month + 1),
        };
        Self::from_year_month(year, month).unwrap_or(*self)
    }

    pub fn previous(&self) -> Self {
        let (year, month) = match self.first_day.month() {
            1 => (self.first_day.year() - 1, 12),
            month => (self.first_day.year(), month - 1),
        };
        Self::from_year_month(year, month).unwrap_or(*self)
    }

    /// Resolve the window to local timestamps for the case list query.
    /// `None` when a boundary falls in a daylight saving gap.
    ///
    pub fn local_range(&self) -> Option<(DateTime<Local>, DateTime<Local>)> {
        let start = Local.from_local_datetime(&self.start()).earliest()?;
        let end = Local.from_local_datetime(&self.end()).earliest()?;
        Some((start, end))
    }

    /// Header label, e.g. "May 2025".
    ///
    pub fn label(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }

    fn from_year_month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| CalendarWindow { first_day })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_covers_whole_month() {
        let window = CalendarWindow::containing(date(2025, 5, 17));
        assert_eq!(window.start(), date(2025, 5, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(window.end(), date(2025, 6, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(window.last_day(), date(2025, 5, 31));
        assert_eq!(window.label(), "May 2025");
    }

    #[test]
    fn next_and_previous_cross_years() {
        let december = CalendarWindow::containing(date(2024, 12, 3));
        assert_eq!(december.next(), CalendarWindow::containing(date(2025, 1, 1)));
        assert_eq!(
            december.next().previous(),
            CalendarWindow::containing(date(2024, 12, 31))
        );
    }

    #[test]
    fn local_range_keeps_wall_clock() {
        let window = CalendarWindow::containing(date(2025, 5, 17));
        if let Some((start, end)) = window.local_range() {
            assert_eq!(start.naive_local(), window.start());
            assert_eq!(end.naive_local(), window.end());
        }
    }

    #[test]
    fn february_last_day_in_leap_year() {
        let window = CalendarWindow::containing(date(2024, 2, 10));
        assert_eq!(window.last_day(), date(2024, 2, 29));
    }
}
