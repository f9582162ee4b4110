use super::Frame;
use super::{cases, dashboard, footer, log, login, menu, new_case, recovery, users};
use crate::state::{State, View};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

const MENU_WIDTH: u16 = 22;
const FOOTER_HEIGHT: u16 = 2;

/// Render every widget according to state: menu and view on top, the log
/// panel when toggled, the footer at the bottom.
///
pub fn all(frame: &mut Frame, state: &mut State) {
    let size = frame.size();
    let log_height = if state.is_log_visible() {
        size.height / 3
    } else {
        0
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(log_height),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(size);

    if state.session().is_authenticated() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(MENU_WIDTH), Constraint::Min(0)])
            .split(rows[0]);
        menu::menu(frame, columns[0], state);
        view(frame, columns[1], state);
    } else {
        view(frame, rows[0], state);
    }

    if state.is_log_visible() {
        log::log(frame, rows[1], state);
    }
    footer::footer(frame, rows[2], state);
}

fn view(frame: &mut Frame, size: Rect, state: &mut State) {
    match state.current_view() {
        View::Login => login::login(frame, size, state),
        View::Recovery => recovery::recovery(frame, size, state),
        View::NewCase => new_case::new_case(frame, size, state),
        View::Cases => cases::cases(frame, size, state),
        View::Dashboard => dashboard::dashboard(frame, size, state),
        View::Users => users::users(frame, size, state),
    }
}
