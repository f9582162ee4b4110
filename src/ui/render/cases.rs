use super::export;
use super::Frame;
use crate::backend::{Case, CaseStatus};
use crate::export::format_created_at;
use crate::state::{Focus, State};
use crate::ui::theme::Theme;
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

/// Render the case list for the selected month with its filter bar. The
/// export dialog is drawn on top when open.
///
pub fn cases(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let active = state.current_focus() == Focus::View && state.export_selection().is_none();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!("Cases: {}", state.case_window().label()),
            styling::active_block_title_style(),
        ))
        .border_style(if active {
            styling::active_block_border_style(theme)
        } else {
            styling::normal_block_border_style(theme)
        });
    let inner = block.inner(size);
    frame.render_widget(block, size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let filter = state.case_filter();
    let search = if filter.is_search_mode() {
        format!("{}▏", filter.search())
    } else if filter.search().is_empty() {
        "(press / to search)".to_string()
    } else {
        filter.search().to_string()
    };
    let filter_line = Line::from(vec![
        Span::styled(" Status: ", styling::muted_text_style(theme)),
        Span::styled(filter.status().to_string(), styling::active_list_item_style(theme)),
        Span::styled("   Search: ", styling::muted_text_style(theme)),
        Span::styled(search, styling::normal_text_style(theme)),
    ]);
    frame.render_widget(Paragraph::new(filter_line), rows[0]);

    if state.is_cases_loading() {
        spinner::render(frame, rows[1], state.get_spinner_index(), "Loading cases...");
    } else {
        let visible = state.visible_cases();
        if visible.is_empty() {
            let message = empty_list_message(state.cases());
            frame.render_widget(
                Paragraph::new(Span::styled(message, styling::muted_text_style(theme)))
                    .alignment(Alignment::Center),
                rows[1],
            );
        } else {
            let type_names = state.case_form().case_types();
            let table_rows: Vec<Row> = visible
                .iter()
                .map(|case| case_row(theme, case, type_name(type_names, case)))
                .collect();
            let table = Table::new(
                table_rows,
                [
                    Constraint::Length(10),
                    Constraint::Percentage(30),
                    Constraint::Length(14),
                    Constraint::Percentage(25),
                    Constraint::Length(12),
                    Constraint::Length(17),
                ],
            )
            .header(
                Row::new(["ID", "Title", "Type", "Location", "Status", "Created"])
                    .style(styling::active_block_title_style()),
            )
            .highlight_style(styling::highlight_style(theme));
            let mut table_state = TableState::default();
            table_state.select(Some(state.case_index()));
            frame.render_stateful_widget(table, rows[1], &mut table_state);
        }
    }

    if state.export_selection().is_some() {
        export::export(frame, size, state);
    }
}

/// Message for an empty table: the month has no cases at all, or the filter
/// hides every one of them.
///
fn empty_list_message(cases: &[Case]) -> &'static str {
    if cases.is_empty() {
        "No cases this month"
    } else {
        "No cases match the current filter"
    }
}

fn type_name(case_types: &[crate::backend::CaseType], case: &Case) -> String {
    let Some(id) = case.case_type.as_deref() else {
        return String::new();
    };
    case_types
        .iter()
        .find(|case_type| case_type.id == id)
        .map(|case_type| case_type.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn status_style(theme: &Theme, status: CaseStatus) -> Style {
    let color = match status {
        CaseStatus::Pending => theme.warning,
        CaseStatus::InProgress => theme.info,
        CaseStatus::Completed => theme.success,
        CaseStatus::Unknown => theme.text_muted,
    };
    Style::default().fg(color.to_color())
}

fn case_row<'a>(theme: &Theme, case: &'a Case, case_type: String) -> Row<'a> {
    Row::new(vec![
        Cell::from(case.id.as_str()),
        Cell::from(case.title.as_str()),
        Cell::from(case_type),
        Cell::from(case.location.as_str()),
        Cell::from(Span::styled(case.status.to_string(), status_style(theme, case.status))),
        Cell::from(
            case.created_at
                .as_deref()
                .map(format_created_at)
                .unwrap_or_default(),
        ),
    ])
    .style(styling::normal_text_style(theme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::filter::{CaseFilter, StatusFilter};
    use fake::{Fake, Faker};

    #[test]
    fn empty_month_and_filtered_out_differ() {
        assert_eq!(empty_list_message(&[]), "No cases this month");

        let cases = vec![Case {
            status: CaseStatus::Pending,
            ..Faker.fake::<Case>()
        }];
        let mut filter = CaseFilter::default();
        filter.set_status_filter(StatusFilter::Only(CaseStatus::Completed));
        assert!(filter.visible_cases(&cases).is_empty());
        assert_eq!(empty_list_message(&cases), "No cases match the current filter");
    }
}
