use super::Frame;
use crate::state::export::{format_input, ExportFocus, RangeField};
use crate::state::State;
use crate::ui::widgets::{field, styling};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

/// Render the export dialog: column checklist on the left, date range on the
/// right.
///
pub fn export(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let Some(selection) = state.export_selection() else {
        return;
    };

    let popup = field::centered_rect(70, 60, size);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("Export cases", styling::active_block_title_style()))
        .border_style(styling::active_block_border_style(theme));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let columns_focused = selection.focus() == Some(ExportFocus::Columns);
    let items: Vec<ListItem> = if selection.catalog().is_empty() {
        vec![ListItem::new(Span::styled(
            "No columns available",
            styling::muted_text_style(theme),
        ))]
    } else {
        selection
            .catalog()
            .iter()
            .map(|column| {
                let mark = if selection.is_selected(&column.key) {
                    "[x]"
                } else {
                    "[ ]"
                };
                ListItem::new(Line::from(format!("{} {}", mark, column.label)))
            })
            .collect()
    };
    let list = List::new(items)
        .style(styling::normal_text_style(theme))
        .highlight_style(if columns_focused {
            styling::highlight_style(theme)
        } else {
            styling::active_list_item_style(theme)
        })
        .block(
            Block::default()
                .borders(Borders::RIGHT)
                .title(format!("Columns ({} selected)", selection.selected_columns().len()))
                .border_style(styling::normal_block_border_style(theme)),
        );
    let mut list_state = ListState::default();
    list_state.select(Some(selection.column_index()));
    frame.render_stateful_widget(list, columns[0], &mut list_state);

    let range_value = |which: RangeField| -> String {
        if selection.focus() == Some(ExportFocus::Range(which)) {
            selection.input().to_string()
        } else {
            let stored = match which {
                RangeField::Start => selection.start(),
                RangeField::End => selection.end(),
            };
            format_input(stored)
        }
    };
    let lines = vec![
        Line::from(""),
        field::field_line(
            theme,
            "Start",
            &range_value(RangeField::Start),
            selection.focus() == Some(ExportFocus::Range(RangeField::Start)),
        ),
        field::field_line(
            theme,
            "End",
            &range_value(RangeField::End),
            selection.focus() == Some(ExportFocus::Range(RangeField::End)),
        ),
        Line::from(""),
        Line::from(Span::styled(
            "  Ctrl-E: Excel (.xlsx)   Ctrl-P: PDF",
            styling::muted_text_style(theme),
        )),
    ];
    let range = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0)])
        .horizontal_margin(1)
        .split(columns[1]);
    frame.render_widget(Paragraph::new(lines), range[0]);
}
