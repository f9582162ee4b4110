use super::styling;
use crate::ui::theme::Theme;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};

const LABEL_WIDTH: usize = 14;

/// One labelled input line. The focused field gets a marker and a cursor.
///
pub fn field_line(theme: &Theme, label: &str, value: &str, focused: bool) -> Line<'static> {
    let marker = if focused { "▸ " } else { "  " };
    let label_style = if focused {
        styling::active_list_item_style(theme)
    } else {
        styling::muted_text_style(theme)
    };
    let mut spans = vec![
        Span::styled(marker.to_string(), label_style),
        Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), label_style),
        Span::styled(value.to_string(), styling::normal_text_style(theme)),
    ];
    if focused {
        spans.push(Span::styled("▏".to_string(), styling::active_list_item_style(theme)));
    }
    Line::from(spans)
}

/// Selection line showing the current choice between arrows.
///
pub fn choice_line(theme: &Theme, label: &str, value: &str, focused: bool) -> Line<'static> {
    let shown = if focused {
        format!("◀ {} ▶", value)
    } else {
        value.to_string()
    };
    let mut line = field_line(theme, label, &shown, false);
    if focused {
        line.spans[0] = Span::styled("▸ ".to_string(), styling::active_list_item_style(theme));
        line.spans[1].style = styling::active_list_item_style(theme);
    }
    line
}

/// Checkbox line.
///
pub fn checkbox_line(theme: &Theme, label: &str, checked: bool, focused: bool) -> Line<'static> {
    let mark = if checked { "[x]" } else { "[ ]" };
    let style = if focused {
        styling::active_list_item_style(theme)
    } else {
        styling::normal_text_style(theme)
    };
    Line::from(vec![
        Span::styled(if focused { "▸ " } else { "  " }.to_string(), style),
        Span::styled(format!("{} {}", mark, label), style),
    ])
}

/// Hide a secret behind bullets.
///
pub fn masked(secret: &str) -> String {
    "•".repeat(secret.chars().count())
}

/// Returns a rectangle centered in `r` sized by percentages.
///
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
