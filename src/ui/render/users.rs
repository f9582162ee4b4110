use super::Frame;
use crate::state::users::UserField;
use crate::state::{Focus, State};
use crate::ui::widgets::{field, styling};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
};

/// Render the user table next to the new user form.
///
pub fn users(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let directory = state.user_directory();
    let active = state.current_focus() == Focus::View;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(size);

    let rows: Vec<Row> = directory
        .users()
        .iter()
        .map(|user| {
            Row::new(vec![
                user.display_name(),
                user.username.clone(),
                directory.role_name(user),
            ])
        })
        .collect();
    let title = if directory.is_loaded() {
        format!("Users ({})", directory.users().len())
    } else {
        "Users (loading...)".to_string()
    };
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ],
    )
    .header(Row::new(["Name", "Username", "Role"]).style(styling::active_block_title_style()))
    .style(styling::normal_text_style(theme))
    .highlight_style(styling::active_list_item_style(theme))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(title, styling::active_block_title_style()))
            .border_style(styling::normal_block_border_style(theme)),
    );
    let mut table_state = TableState::default();
    if !directory.users().is_empty() {
        table_state.select(Some(directory.selected()));
    }
    frame.render_stateful_widget(table, columns[0], &mut table_state);

    let form = &directory.form;
    let focused = |f: UserField| active && form.field() == f;
    let role = form
        .role_id
        .and_then(|id| directory.roles().iter().find(|role| role.id == id))
        .map(|role| role.name.clone())
        .unwrap_or_else(|| "No roles".to_string());
    let lines = vec![
        field::field_line(theme, "Username", &form.username, focused(UserField::Username)),
        field::field_line(
            theme,
            "Password",
            &field::masked(&form.password),
            focused(UserField::Password),
        ),
        field::field_line(theme, "First name", &form.fname, focused(UserField::FirstName)),
        field::field_line(theme, "Last name", &form.lname, focused(UserField::LastName)),
        field::choice_line(theme, "Role", &role, focused(UserField::Role)),
    ];
    let form_widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled("Add user", styling::active_block_title_style()))
            .border_style(if active {
                styling::active_block_border_style(theme)
            } else {
                styling::normal_block_border_style(theme)
            }),
    );
    frame.render_widget(form_widget, columns[1]);
}
