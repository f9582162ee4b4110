use super::login::centered_column;
use super::Frame;
use crate::state::login::{PasswordField, RecoveryStep};
use crate::state::State;
use crate::ui::widgets::{field, spinner, styling};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the two-step password recovery form.
///
pub fn recovery(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let form = state.recovery_form();

    let title = match form.step() {
        RecoveryStep::Username => "Forgot password: confirm username",
        RecoveryStep::NewPassword => "Forgot password: choose a new password",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(styling::active_block_border_style(theme));
    frame.render_widget(block, size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(size);

    if let Some(message) = form.message() {
        let line = Line::from(Span::styled(
            message.to_string(),
            styling::severity_style(theme, crate::state::notification::Severity::Success),
        ));
        frame.render_widget(
            Paragraph::new(line).wrap(Wrap { trim: true }),
            centered_column(rows[0]),
        );
    }

    let lines = match form.step() {
        RecoveryStep::Username => {
            vec![field::field_line(theme, "Username", &form.username, true)]
        }
        RecoveryStep::NewPassword => vec![
            field::field_line(theme, "Username", &form.username, false),
            field::field_line(
                theme,
                "New password",
                &field::masked(&form.password),
                form.field() == PasswordField::Password,
            ),
            field::field_line(
                theme,
                "Confirm",
                &field::masked(&form.confirmation),
                form.field() == PasswordField::Confirmation,
            ),
        ],
    };
    frame.render_widget(Paragraph::new(lines), centered_column(rows[1]));

    if form.is_pending() {
        spinner::render(
            frame,
            centered_column(rows[2]),
            state.get_spinner_index(),
            "Please wait...",
        );
    } else if let Some(error) = form.error() {
        let line = Line::from(Span::styled(error.to_string(), styling::error_text_style(theme)));
        frame.render_widget(
            Paragraph::new(line).wrap(Wrap { trim: true }),
            centered_column(rows[2]),
        );
    }
}
