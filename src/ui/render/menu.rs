use super::Frame;
use crate::state::{Focus, MenuItem, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// Render the navigation menu with the signed-in user as title.
///
pub fn menu(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let active = state.current_focus() == Focus::Menu;
    let title = state
        .session()
        .user()
        .map(|user| user.display_name())
        .unwrap_or_else(|| "Menu".to_string());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, styling::active_block_title_style()))
        .border_style(if active {
            styling::active_block_border_style(theme)
        } else {
            styling::normal_block_border_style(theme)
        });

    let items: Vec<ListItem> = MenuItem::ALL
        .iter()
        .map(|item| ListItem::new(Line::from(format!(" {}", item))))
        .collect();

    let list = List::new(items)
        .block(block)
        .style(styling::normal_text_style(theme))
        .highlight_style(if active {
            styling::highlight_style(theme)
        } else {
            styling::active_list_item_style(theme)
        });

    let mut list_state = ListState::default();
    list_state.select(Some(state.menu_index()));
    frame.render_stateful_widget(list, size, &mut list_state);
}
