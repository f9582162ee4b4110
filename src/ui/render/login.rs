use super::Frame;
use crate::state::login::LoginField;
use crate::state::State;
use crate::ui::theme::Theme;
use crate::ui::widgets::{field, spinner, styling};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};

pub const BANNER: &str = r"
   ___ __ _ ___  ___  __| | ___  ___| | __
  / __/ _` / __|/ _ \/ _` |/ _ \/ __| |/ /
 | (_| (_| \__ \  __/ (_| |  __/\__ \   <
  \___\__,_|___/\___|\__,_|\___||___/_|\_\
";

/// Banner text in the theme's banner color.
///
fn banner(theme: &Theme) -> Text<'static> {
    Text::from(BANNER).patch_style(styling::banner_style(theme))
}

/// Render the login form centered under the banner.
///
pub fn login(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let form = state.login_form();

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Log in")
        .border_style(styling::active_block_border_style(theme));
    frame.render_widget(block, size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(size);

    frame.render_widget(Paragraph::new(banner(theme)).alignment(Alignment::Center), rows[0]);

    let lines = vec![
        field::field_line(
            theme,
            "Username",
            &form.username,
            form.field() == LoginField::Username,
        ),
        field::field_line(
            theme,
            "Password",
            &field::masked(&form.password),
            form.field() == LoginField::Password,
        ),
        field::checkbox_line(
            theme,
            "Remember me",
            form.remember,
            form.field() == LoginField::Remember,
        ),
    ];
    frame.render_widget(Paragraph::new(lines), centered_column(rows[1]));

    if form.is_pending() {
        spinner::render(
            frame,
            centered_column(rows[2]),
            state.get_spinner_index(),
            "Logging in...",
        );
    } else if let Some(error) = form.error() {
        let line = Line::from(Span::styled(error.to_string(), styling::error_text_style(theme)));
        frame.render_widget(Paragraph::new(line), centered_column(rows[2]));
    }
}

/// Narrow column in the middle of `area` for form content.
///
pub fn centered_column(area: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(area)[1]
}
