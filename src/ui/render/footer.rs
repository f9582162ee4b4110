use super::Frame;
use crate::state::export::ExportFocus;
use crate::state::{Focus, State, View};
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Key hints for the current focus and view.
///
fn hints(state: &State) -> &'static str {
    if state.current_focus() == Focus::Menu {
        return " j/k: navigate, Enter: open, Esc: back to view, q: quit";
    }
    match state.current_view() {
        View::Login => " Tab: next field, Space: toggle remember me, Enter: log in, Ctrl-R: forgot password",
        View::Recovery => " Enter: continue, Tab: switch field, Esc: back to login",
        View::NewCase => {
            " Tab/Shift-Tab: fields, ←/→: case type, Enter: attach or submit, Del: drop last attachment, Ctrl-S: submit, Esc: menu"
        }
        View::Cases => match state.export_selection().map(|s| s.focus()) {
            Some(Some(ExportFocus::Columns)) => {
                " Space: toggle column, Tab: date range, Ctrl-E: Excel, Ctrl-P: PDF, Esc: close"
            }
            Some(_) => " Type YYYY-MM-DDTHH:MM, Enter: apply, Tab: next, Ctrl-E: Excel, Ctrl-P: PDF, Esc: close",
            None if state.case_filter().is_search_mode() => " Type to search, Enter/Esc: done",
            None => " /: search, s: status, [/]: month, r: refresh, e: export, Esc: menu",
        },
        View::Dashboard => " r: reload, Esc: menu",
        View::Users => " Tab: next field, ←/→: role, Enter: add user, PgUp/PgDn: scroll, Esc: menu",
    }
}

/// Render the latest notification above the key hints.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(size);

    if let Some(notification) = state.notifications().last() {
        let line = Line::from(Span::styled(
            format!(" {}", notification.message),
            styling::severity_style(theme, notification.severity),
        ));
        frame.render_widget(Paragraph::new(line), rows[0]);
    }

    let hints = Line::from(vec![
        Span::styled(hints(state), styling::muted_text_style(theme)),
        Span::styled("  F2: log, Ctrl-D: dismiss, Ctrl-C: quit", styling::muted_text_style(theme)),
    ]);
    frame.render_widget(Paragraph::new(hints), rows[1]);
}
