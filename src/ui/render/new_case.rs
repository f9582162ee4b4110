use super::Frame;
use crate::state::draft::{CaseForm, CaseFormRow, CatalogStatus, DraftField};
use crate::state::{Focus, State};
use crate::ui::widgets::{field, spinner, styling};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

/// Text shown in the case type selector.
///
fn case_type_label(form: &CaseForm) -> &str {
    if let Some(name) = form.selected_type_name() {
        return name;
    }
    match form.catalog_status() {
        CatalogStatus::NotRequested | CatalogStatus::Loading => "Loading case types...",
        CatalogStatus::Failed => "No case types available",
        CatalogStatus::Loaded if form.case_types().is_empty() => "No case types available",
        CatalogStatus::Loaded => "Select a case type",
    }
}

/// Render the new case form: fields on top, attachments below.
///
pub fn new_case(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let form = state.case_form();
    let active = state.current_focus() == Focus::View;
    let row = form.focused_row();
    let focused = |r: CaseFormRow| active && row == r;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("New case", styling::active_block_title_style()))
        .border_style(if active {
            styling::active_block_border_style(theme)
        } else {
            styling::normal_block_border_style(theme)
        });
    let inner = block.inner(size);
    frame.render_widget(block, size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(inner);

    let case_type = case_type_label(form);
    let header = vec![
        field::choice_line(theme, "Case type", case_type, focused(CaseFormRow::CaseType)),
        field::field_line(
            theme,
            "Title",
            form.draft.field(DraftField::Title),
            focused(CaseFormRow::Title),
        ),
    ];
    frame.render_widget(Paragraph::new(header), rows[0]);

    let description = Paragraph::new(vec![field::field_line(
        theme,
        "Description",
        form.draft.field(DraftField::Description),
        focused(CaseFormRow::Description),
    )])
    .wrap(Wrap { trim: false });
    frame.render_widget(description, rows[1]);

    let location = vec![
        field::field_line(
            theme,
            "Location",
            form.draft.field(DraftField::Location),
            focused(CaseFormRow::Location),
        ),
        field::field_line(
            theme,
            "Attach file",
            form.attachment_path(),
            focused(CaseFormRow::Attachment),
        ),
    ];
    frame.render_widget(Paragraph::new(location), rows[2]);

    let attachments: Vec<ListItem> = if form.draft.attachments.is_empty() {
        vec![ListItem::new(Span::styled(
            "No images attached",
            styling::muted_text_style(theme),
        ))]
    } else {
        form.draft
            .attachments
            .iter()
            .map(|attachment| {
                ListItem::new(Line::from(format!(
                    "{} ({}, {} bytes)",
                    attachment.file_name,
                    attachment.content_type,
                    attachment.bytes.len()
                )))
            })
            .collect()
    };
    let attachments = List::new(attachments)
        .style(styling::normal_text_style(theme))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title("Attachments")
                .border_style(styling::normal_block_border_style(theme)),
        );
    frame.render_widget(attachments, rows[3]);

    if form.is_submitting() {
        spinner::render(frame, rows[4], state.get_spinner_index(), "Submitting...");
    } else {
        let style = if focused(CaseFormRow::Submit) {
            styling::highlight_style(theme)
        } else {
            styling::active_list_item_style(theme)
        };
        frame.render_widget(Paragraph::new(Span::styled(" [ Submit ] ", style)), rows[4]);
    }
}
