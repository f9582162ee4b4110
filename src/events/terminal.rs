use crate::state::draft::CaseFormRow;
use crate::state::export::{ExportFocus, ExportFormat};
use crate::state::login::RecoveryStep;
use crate::state::users::UserField;
use crate::state::{Focus, State, View};
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::time::Instant;
use std::{sync::mpsc, thread, time::Duration};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread. The
    /// thread stops once the receiving side is gone.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                        if tx_clone.send(Event::Input(key)).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => error!("Failed to read terminal event: {}", e),
                },
                Ok(false) => {}
                Err(e) => error!("Failed to poll terminal events: {}", e),
            }
            if tx_clone.send(Event::Tick).is_err() {
                break;
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, state: &mut State) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(key) => Ok(handle_key(state, key)),
            Event::Tick => {
                state.tick(Instant::now());
                Ok(true)
            }
        }
    }
}

/// Apply one key press. Returns false when exit was requested.
///
pub fn handle_key(state: &mut State, key: KeyEvent) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            debug!("Processing exit terminal event '{:?}'...", key);
            return false;
        }
        (KeyCode::F(2), _) => {
            state.toggle_log();
            return true;
        }
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
            state.dismiss_notifications();
            return true;
        }
        _ => {}
    }

    match state.current_focus() {
        Focus::Menu => menu_key(state, key),
        Focus::View => match state.current_view() {
            View::Login => login_key(state, key),
            View::Recovery => recovery_key(state, key),
            View::NewCase => new_case_key(state, key),
            View::Cases => cases_key(state, key),
            View::Dashboard => dashboard_key(state, key),
            View::Users => users_key(state, key),
        },
    }
}

/// Typed character, if the key is plain or shifted text.
///
fn typed(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT =>
        {
            Some(c)
        }
        _ => None,
    }
}

fn menu_key(state: &mut State, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Down | KeyCode::Char('j') => {
            state.next_menu_item();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.previous_menu_item();
        }
        KeyCode::Enter => {
            state.select_current_menu_item();
        }
        KeyCode::Esc | KeyCode::Right | KeyCode::Char('l') => {
            state.focus_view();
        }
        _ => debug!("Skipping processing of terminal event '{:?}'...", key),
    }
    true
}

fn login_key(state: &mut State, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('r') && key.modifiers == KeyModifiers::CONTROL {
        state.open_recovery();
        return true;
    }
    if let Some(c) = typed(&key) {
        state.login_form_mut().push_char(c);
        return true;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down => state.login_form_mut().next_field(),
        KeyCode::BackTab | KeyCode::Up => state.login_form_mut().previous_field(),
        KeyCode::Backspace => state.login_form_mut().pop_char(),
        KeyCode::Enter => {
            state.submit_login();
        }
        KeyCode::Esc => {
            state.dismiss_notifications();
        }
        _ => {}
    }
    true
}

fn recovery_key(state: &mut State, key: KeyEvent) -> bool {
    if let Some(c) = typed(&key) {
        state.recovery_form_mut().push_char(c);
        return true;
    }
    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
            if state.recovery_form().step() == RecoveryStep::NewPassword {
                state.recovery_form_mut().toggle_field();
            }
        }
        KeyCode::Backspace => state.recovery_form_mut().pop_char(),
        KeyCode::Enter => {
            state.submit_recovery();
        }
        KeyCode::Esc => {
            state.pop_view();
        }
        _ => {}
    }
    true
}

fn new_case_key(state: &mut State, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('s') && key.modifiers == KeyModifiers::CONTROL {
        state.submit_case();
        return true;
    }
    let row = state.case_form().focused_row();
    if let Some(c) = typed(&key) {
        state.case_form_mut().push_char(c);
        return true;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down => state.case_form_mut().next_row(),
        KeyCode::BackTab | KeyCode::Up => state.case_form_mut().previous_row(),
        KeyCode::Left if row == CaseFormRow::CaseType => state.case_form_mut().cycle_case_type(-1),
        KeyCode::Right if row == CaseFormRow::CaseType => state.case_form_mut().cycle_case_type(1),
        KeyCode::Backspace => state.case_form_mut().pop_char(),
        KeyCode::Delete if row == CaseFormRow::Attachment => {
            state.case_form_mut().draft.attachments.pop();
        }
        KeyCode::Enter => match row {
            CaseFormRow::Attachment => {
                state.attach_file();
            }
            CaseFormRow::Submit => {
                state.submit_case();
            }
            _ => state.case_form_mut().next_row(),
        },
        KeyCode::Esc => {
            state.focus_menu();
        }
        _ => {}
    }
    true
}

fn cases_key(state: &mut State, key: KeyEvent) -> bool {
    if state.export_selection().is_some() {
        export_key(state, key);
        return true;
    }
    if state.case_filter().is_search_mode() {
        if let Some(c) = typed(&key) {
            state.case_filter_mut().push_search_char(c);
            return true;
        }
        match key.code {
            KeyCode::Backspace => state.case_filter_mut().pop_search_char(),
            KeyCode::Enter | KeyCode::Esc => state.case_filter_mut().exit_search_mode(),
            _ => {}
        }
        return true;
    }
    match key.code {
        KeyCode::Char('/') => state.case_filter_mut().enter_search_mode(),
        KeyCode::Char('s') => state.case_filter_mut().cycle_status_filter(),
        KeyCode::Char('[') => {
            state.previous_month();
        }
        KeyCode::Char(']') => {
            state.next_month();
        }
        KeyCode::Char('r') => {
            state.refresh_cases();
        }
        KeyCode::Char('e') => {
            state.request_export();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.next_case();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.previous_case();
        }
        KeyCode::Esc => {
            state.focus_menu();
        }
        _ => {}
    }
    true
}

/// Keys for the export dialog. Ctrl-E writes a spreadsheet and Ctrl-P a PDF
/// from any focus; range inputs take all typed characters.
///
fn export_key(state: &mut State, key: KeyEvent) {
    if key.modifiers == KeyModifiers::CONTROL {
        match key.code {
            KeyCode::Char('e') => {
                state.submit_export(ExportFormat::Spreadsheet);
            }
            KeyCode::Char('p') => {
                state.submit_export(ExportFormat::Document);
            }
            _ => {}
        }
        return;
    }
    if key.code == KeyCode::Esc {
        state.close_export();
        return;
    }
    let Some(selection) = state.export_selection_mut() else {
        return;
    };
    match (selection.focus(), key.code) {
        (_, KeyCode::Tab) => selection.next_focus(),
        (_, KeyCode::BackTab) => selection.previous_focus(),
        (Some(ExportFocus::Columns), KeyCode::Down | KeyCode::Char('j')) => {
            selection.next_column()
        }
        (Some(ExportFocus::Columns), KeyCode::Up | KeyCode::Char('k')) => {
            selection.previous_column()
        }
        (Some(ExportFocus::Columns), KeyCode::Char(' ') | KeyCode::Enter) => {
            selection.toggle_current_column()
        }
        (Some(ExportFocus::Range(_)), KeyCode::Char(c)) => selection.push_input_char(c),
        (Some(ExportFocus::Range(_)), KeyCode::Backspace) => selection.pop_input_char(),
        (Some(ExportFocus::Range(_)), KeyCode::Enter) => selection.commit_input(),
        _ => {}
    }
}

fn dashboard_key(state: &mut State, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('r') => {
            state.open_view(View::Dashboard);
        }
        KeyCode::Esc => {
            state.focus_menu();
        }
        _ => {}
    }
    true
}

fn users_key(state: &mut State, key: KeyEvent) -> bool {
    let field = state.user_directory().form.field();
    if let Some(c) = typed(&key) {
        state.user_directory_mut().form.push_char(c);
        return true;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down => state.user_directory_mut().form.next_field(),
        KeyCode::BackTab | KeyCode::Up => state.user_directory_mut().form.previous_field(),
        KeyCode::Left if field == UserField::Role => state.user_directory_mut().cycle_role(-1),
        KeyCode::Right if field == UserField::Role => state.user_directory_mut().cycle_role(1),
        KeyCode::Backspace => state.user_directory_mut().form.pop_char(),
        KeyCode::PageDown => state.user_directory_mut().next_user(),
        KeyCode::PageUp => state.user_directory_mut().previous_user(),
        KeyCode::Enter => {
            state.submit_new_user();
        }
        KeyCode::Esc => {
            state.focus_menu();
        }
        _ => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, User};
    use crate::state::draft::DraftField;
    use crate::state::export::RangeField;
    use crate::state::filter::StatusFilter;
    use fake::{Fake, Faker};

    fn press(state: &mut State, code: KeyCode) -> bool {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(state: &mut State, c: char) -> bool {
        handle_key(state, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(state: &mut State, text: &str) {
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
    }

    fn logged_in() -> State {
        let mut state = State::default();
        state.finish_login(Ok::<User, BackendError>(Faker.fake()), false);
        state
    }

    #[test]
    fn ctrl_c_requests_exit() {
        let mut state = State::default();
        assert!(!ctrl(&mut state, 'c'));
        assert!(press(&mut state, KeyCode::Char('c')));
    }

    #[test]
    fn login_form_receives_typing() {
        let mut state = State::default();
        type_text(&mut state, "somchai");
        press(&mut state, KeyCode::Tab);
        type_text(&mut state, "pw");
        press(&mut state, KeyCode::Backspace);
        assert_eq!(state.login_form().username, "somchai");
        assert_eq!(state.login_form().password, "p");
    }

    #[test]
    fn ctrl_r_opens_recovery_and_esc_returns() {
        let mut state = State::default();
        type_text(&mut state, "malee");
        ctrl(&mut state, 'r');
        assert_eq!(state.current_view(), View::Recovery);
        assert_eq!(state.recovery_form().username, "malee");
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.current_view(), View::Login);
    }

    #[test]
    fn new_case_rows_take_text() {
        let mut state = logged_in();
        press(&mut state, KeyCode::Down);
        type_text(&mut state, "Pothole");
        press(&mut state, KeyCode::Enter);
        type_text(&mut state, "Deep");
        assert_eq!(state.case_form().draft.field(DraftField::Title), "Pothole");
        assert_eq!(state.case_form().draft.field(DraftField::Description), "Deep");
    }

    #[test]
    fn esc_moves_focus_to_menu_and_back() {
        let mut state = logged_in();
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.current_focus(), Focus::Menu);
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.current_view(), View::Cases);
        assert_eq!(state.current_focus(), Focus::View);
    }

    #[test]
    fn cases_search_and_status_keys() {
        let mut state = logged_in();
        state.open_view(View::Cases);
        press(&mut state, KeyCode::Char('s'));
        assert_ne!(state.case_filter().status(), StatusFilter::All);

        press(&mut state, KeyCode::Char('/'));
        type_text(&mut state, "leak s");
        assert_eq!(state.case_filter().search(), "leak s");
        press(&mut state, KeyCode::Enter);
        assert!(!state.case_filter().is_search_mode());
    }

    #[test]
    fn export_dialog_keys() {
        let mut state = logged_in();
        state.open_view(View::Cases);
        state.open_export(
            None,
            Ok(vec![crate::backend::ExportColumn {
                key: "title".to_string(),
                label: "Title".to_string(),
            }]),
        );
        press(&mut state, KeyCode::Char(' '));
        assert!(state.export_selection().unwrap().is_selected("title"));

        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Tab);
        assert_eq!(
            state.export_selection().unwrap().focus(),
            Some(ExportFocus::Range(RangeField::End))
        );
        press(&mut state, KeyCode::Esc);
        assert!(state.export_selection().is_none());
    }

    #[test]
    fn f2_toggles_log_anywhere() {
        let mut state = State::default();
        press(&mut state, KeyCode::F(2));
        assert!(state.is_log_visible());
    }

    #[test]
    fn ctrl_d_dismisses_notifications_in_every_view() {
        use crate::state::notification::Notification;

        let mut state = logged_in();
        for view in [View::NewCase, View::Cases, View::Dashboard, View::Users] {
            state.open_view(view);
            state.notify(Notification::error("Something failed"));
            assert!(ctrl(&mut state, 'd'));
            assert!(state.notifications().is_empty(), "{:?}", view);
        }

        state.open_view(View::Cases);
        state.open_export(None, Ok(vec![]));
        state.notify(Notification::error("Please select at least one column"));
        ctrl(&mut state, 'd');
        assert!(state.notifications().is_empty());
        assert!(state.export_selection().is_some());
    }
}
