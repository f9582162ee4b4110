use super::Frame;
use crate::state::dashboard::{Dashboard, DashboardSummary};
use crate::state::{Focus, State};
use crate::ui::theme::{ColorSpec, Theme};
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Paragraph, Wrap},
};

/// Render today's statistics.
///
pub fn dashboard(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("Dashboard", styling::active_block_title_style()))
        .border_style(if state.current_focus() == Focus::View {
            styling::active_block_border_style(theme)
        } else {
            styling::normal_block_border_style(theme)
        });
    let inner = block.inner(size);
    frame.render_widget(block, size);

    match state.dashboard() {
        Dashboard::Idle | Dashboard::Loading => {
            spinner::render(frame, inner, state.get_spinner_index(), "Loading dashboard...")
        }
        Dashboard::Failed(message) => {
            let text = Paragraph::new(Span::styled(
                message.clone(),
                styling::error_text_style(theme),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            frame.render_widget(text, inner);
        }
        Dashboard::Loaded(summary) => loaded(frame, inner, theme, summary),
    }
}

fn loaded(frame: &mut Frame, size: Rect, theme: &Theme, summary: &DashboardSummary) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(size);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    stat_card(frame, cards[0], theme, "Total users", summary.total_users);
    stat_card(frame, cards[1], theme, "Cases today", summary.total_today_cases);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[1]);
    bar_chart(frame, charts[0], theme, "Users by role", &summary.users_by_role, theme.primary);
    bar_chart(
        frame,
        charts[1],
        theme,
        "Today's cases by status",
        &summary.cases_by_status,
        theme.accent,
    );
    bar_chart(
        frame,
        charts[2],
        theme,
        "Today's cases by type",
        &summary.cases_by_type,
        theme.success,
    );
}

fn stat_card(frame: &mut Frame, size: Rect, theme: &Theme, label: &str, value: u64) {
    let lines = vec![
        Line::from(Span::styled(label.to_string(), styling::muted_text_style(theme))),
        Line::from(Span::styled(
            value.to_string(),
            Style::default()
                .fg(theme.primary.to_color())
                .add_modifier(Modifier::BOLD),
        )),
    ];
    let card = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styling::normal_block_border_style(theme)),
    );
    frame.render_widget(card, size);
}

fn bar_chart(
    frame: &mut Frame,
    size: Rect,
    theme: &Theme,
    title: &str,
    counts: &[(String, u64)],
    color: ColorSpec,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(styling::normal_block_border_style(theme));
    if counts.is_empty() {
        let empty = Paragraph::new(Span::styled("No data", styling::muted_text_style(theme)))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, size);
        return;
    }

    let data: Vec<(&str, u64)> = counts
        .iter()
        .map(|(label, count)| (label.as_str(), *count))
        .collect();
    let inner_width = size.width.saturating_sub(2);
    let bar_width = (inner_width / data.len() as u16).saturating_sub(1).clamp(3, 12);
    let chart = BarChart::default()
        .block(block)
        .data(data.as_slice())
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(color.to_color()))
        .value_style(
            Style::default()
                .fg(theme.highlight_fg.to_color())
                .bg(color.to_color()),
        )
        .label_style(styling::normal_text_style(theme));
    frame.render_widget(chart, size);
}
