use crate::app::{ConfigSaveSender, ConfigUpdate, NetworkEventSender};
use crate::backend::{BackendError, Case, CaseType, ExportColumn, Role, User};
use crate::events::network::Event as NetworkEvent;
use crate::export::ExportError;
use crate::ui::{Theme, SPINNER_FRAME_COUNT};
use log::*;
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::time::Instant;

use super::calendar::CalendarWindow;
use super::dashboard::Dashboard;
use super::draft::CaseForm;
use super::export::{ExportFormat, ExportSelection};
use super::filter::CaseFilter;
use super::login::{LoginForm, RecoveryForm, RecoveryStep};
use super::navigation::{Focus, MenuItem, View};
use super::notification::Notification;
use super::session::Session;
use super::users::{UserDirectory, USER_ALERT_TTL};
use super::StateError;

/// Number of log lines kept for the log panel.
const LOG_CAPACITY: usize = 1000;

/// Houses data representative of application state.
///
pub struct State {
    net_sender: Option<NetworkEventSender>,
    config_save_sender: Option<ConfigSaveSender>,
    remembered_username: Option<String>,
    terminal_size: Rect,
    theme: Theme,
    spinner_index: usize,
    current_focus: Focus,
    menu_index: usize,
    view_stack: Vec<View>,
    session: Session,
    login_form: LoginForm,
    recovery_form: RecoveryForm,
    case_form: CaseForm,
    cases: Vec<Case>,
    cases_loading: bool,
    case_window: CalendarWindow,
    case_filter: CaseFilter,
    case_index: usize,
    export: Option<ExportSelection>,
    dashboard: Dashboard,
    user_directory: UserDirectory,
    notifications: Vec<Notification>,
    log_visible: bool,
    log_entries: Vec<String>,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        State {
            net_sender: None,
            config_save_sender: None,
            remembered_username: None,
            terminal_size: Rect::default(),
            theme: Theme::default(),
            spinner_index: 0,
            current_focus: Focus::View,
            menu_index: 0,
            view_stack: vec![View::Login],
            session: Session::default(),
            login_form: LoginForm::default(),
            recovery_form: RecoveryForm::default(),
            case_form: CaseForm::default(),
            cases: vec![],
            cases_loading: false,
            case_window: CalendarWindow::current(),
            case_filter: CaseFilter::default(),
            case_index: 0,
            export: None,
            dashboard: Dashboard::default(),
            user_directory: UserDirectory::default(),
            notifications: vec![],
            log_visible: false,
            log_entries: vec![],
        }
    }
}

impl State {
    pub fn new(
        net_sender: NetworkEventSender,
        config_save_sender: ConfigSaveSender,
        remembered_username: Option<String>,
    ) -> Self {
        State {
            net_sender: Some(net_sender),
            config_save_sender: Some(config_save_sender),
            login_form: LoginForm::with_username(remembered_username.clone()),
            remembered_username,
            ..State::default()
        }
    }

    /// Sets the terminal size.
    ///
    pub fn set_terminal_size(&mut self, size: Rect) -> &mut Self {
        self.terminal_size = size;
        self
    }

    pub fn terminal_size(&self) -> Rect {
        self.terminal_size
    }

    pub fn set_theme(&mut self, theme: Theme) -> &mut Self {
        self.theme = theme;
        self
    }

    pub fn get_theme(&self) -> &Theme {
        &self.theme
    }

    /// Advance the spinner index.
    ///
    pub fn advance_spinner_index(&mut self) -> &mut Self {
        self.spinner_index = (self.spinner_index + 1) % SPINNER_FRAME_COUNT;
        self
    }

    pub fn get_spinner_index(&self) -> usize {
        self.spinner_index
    }

    /// Periodic housekeeping: spinner and notification expiry.
    ///
    pub fn tick(&mut self, now: Instant) -> &mut Self {
        self.advance_spinner_index();
        self.prune_notifications(now);
        self
    }

    // Focus & menu

    pub fn current_focus(&self) -> Focus {
        self.current_focus
    }

    pub fn focus_menu(&mut self) -> &mut Self {
        if self.session.is_authenticated() {
            self.current_focus = Focus::Menu;
        }
        self
    }

    pub fn focus_view(&mut self) -> &mut Self {
        self.current_focus = Focus::View;
        self
    }

    pub fn menu_index(&self) -> usize {
        self.menu_index
    }

    pub fn next_menu_item(&mut self) -> &mut Self {
        self.menu_index = (self.menu_index + 1) % MenuItem::ALL.len();
        self
    }

    pub fn previous_menu_item(&mut self) -> &mut Self {
        self.menu_index = self
            .menu_index
            .checked_sub(1)
            .unwrap_or(MenuItem::ALL.len() - 1);
        self
    }

    /// Open the view behind the highlighted menu entry, or log out.
    ///
    pub fn select_current_menu_item(&mut self) -> &mut Self {
        match MenuItem::ALL[self.menu_index].view() {
            Some(view) => {
                self.open_view(view);
                self.focus_view();
            }
            None => {
                self.logout();
            }
        }
        self
    }

    // Views

    pub fn current_view(&self) -> View {
        self.view_stack.last().copied().unwrap_or(View::Login)
    }

    pub fn push_view(&mut self, view: View) -> &mut Self {
        self.view_stack.push(view);
        self
    }

    /// Pop the current view, keeping at least one on the stack.
    ///
    pub fn pop_view(&mut self) -> Option<View> {
        if self.view_stack.len() > 1 {
            self.view_stack.pop()
        } else {
            None
        }
    }

    /// Replace the view stack with `view` and start whatever it loads.
    /// Views behind login are refused without a session.
    ///
    pub fn open_view(&mut self, view: View) -> &mut Self {
        if !view.is_public() && !self.session.is_authenticated() {
            warn!("Refusing to open {:?} without a session", view);
            return self;
        }
        debug!("Opening view {:?}...", view);
        self.view_stack.clear();
        self.view_stack.push(view);
        if let Some(index) = MenuItem::ALL.iter().position(|item| item.view() == Some(view)) {
            self.menu_index = index;
        }
        match view {
            View::NewCase => {
                if self.case_form.claim_case_type_fetch() {
                    self.dispatch(NetworkEvent::CaseTypes);
                }
            }
            View::Cases => {
                self.case_filter = CaseFilter::default();
                self.case_index = 0;
                self.export = None;
                self.refresh_cases();
            }
            View::Dashboard => {
                self.dashboard = Dashboard::Loading;
                self.dispatch(NetworkEvent::Dashboard);
            }
            View::Users => {
                self.dispatch(NetworkEvent::Users);
            }
            View::Login | View::Recovery => {}
        }
        self
    }

    // Session, login & recovery

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn login_form(&self) -> &LoginForm {
        &self.login_form
    }

    pub fn login_form_mut(&mut self) -> &mut LoginForm {
        &mut self.login_form
    }

    /// Validate the login form and send credentials to the backend.
    ///
    pub fn submit_login(&mut self) -> &mut Self {
        match self.login_form.begin() {
            Some(Ok(credentials)) => {
                if let Err(e) = self.try_dispatch(NetworkEvent::Login { credentials }) {
                    error!("Failed to send login: {}", e);
                    self.login_form.finish(Some(e.to_string()));
                }
            }
            Some(Err(e)) => debug!("Login form rejected: {}", e),
            None => debug!("Login already in progress."),
        }
        self
    }

    /// Settle a login attempt.
    ///
    pub fn finish_login(&mut self, result: Result<User, BackendError>, remember: bool) -> &mut Self {
        match result {
            Ok(user) => {
                info!("Logged in as '{}'.", user.username);
                self.login_form.finish(None);
                let remembered = if remember {
                    Some(user.username.clone())
                } else {
                    None
                };
                if remembered != self.remembered_username {
                    self.remembered_username = remembered.clone();
                    self.save_config(ConfigUpdate::RememberedUsername(remembered));
                }
                self.notify(Notification::success(format!(
                    "Welcome {}",
                    user.display_name()
                )));
                self.session.login(user);
                self.open_view(View::NewCase);
                self.focus_view();
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                self.login_form
                    .finish(Some(e.user_message("Incorrect username or password")));
            }
        }
        self
    }

    /// Clear the session and every per-view state, then return to login.
    ///
    pub fn logout(&mut self) -> &mut Self {
        info!("Logging out.");
        self.session.logout();
        self.login_form = LoginForm::with_username(self.remembered_username.clone());
        self.recovery_form = RecoveryForm::default();
        self.case_form = CaseForm::default();
        self.cases.clear();
        self.cases_loading = false;
        self.case_window = CalendarWindow::current();
        self.case_filter = CaseFilter::default();
        self.case_index = 0;
        self.export = None;
        self.dashboard = Dashboard::default();
        self.user_directory = UserDirectory::default();
        self.menu_index = 0;
        self.view_stack = vec![View::Login];
        self.focus_view();
        self
    }

    pub fn open_recovery(&mut self) -> &mut Self {
        self.recovery_form = RecoveryForm::for_username(self.login_form.username.trim());
        self.push_view(View::Recovery)
    }

    pub fn recovery_form(&self) -> &RecoveryForm {
        &self.recovery_form
    }

    pub fn recovery_form_mut(&mut self) -> &mut RecoveryForm {
        &mut self.recovery_form
    }

    /// Submit the current recovery step.
    ///
    pub fn submit_recovery(&mut self) -> &mut Self {
        if self.recovery_form.is_pending() {
            return self;
        }
        match self.recovery_form.step() {
            RecoveryStep::Username => {
                if let Ok(username) = self.recovery_form.begin_username() {
                    if let Err(e) = self.try_dispatch(NetworkEvent::ForgotPassword { username }) {
                        error!("Failed to send recovery request: {}", e);
                        self.recovery_form.finish_username(Err(e.to_string()));
                    }
                }
            }
            RecoveryStep::NewPassword => {
                if let Ok((username, password)) = self.recovery_form.begin_reset() {
                    let event = NetworkEvent::ResetPassword { username, password };
                    if let Err(e) = self.try_dispatch(event) {
                        error!("Failed to send password reset: {}", e);
                        self.recovery_form.finish_reset(Some(e.to_string()));
                    }
                }
            }
        }
        self
    }

    pub fn finish_forgot_password(&mut self, result: Result<String, BackendError>) -> &mut Self {
        self.recovery_form.finish_username(
            result.map_err(|e| e.user_message("Unable to process the request, please try again")),
        );
        self
    }

    /// A successful reset returns to the login form.
    ///
    pub fn finish_reset_password(&mut self, result: Result<String, BackendError>) -> &mut Self {
        match result {
            Ok(message) => {
                self.recovery_form.finish_reset(None);
                self.login_form.username = self.recovery_form.username.trim().to_string();
                self.login_form.password.clear();
                self.view_stack = vec![View::Login];
                self.notify(Notification::success(message));
            }
            Err(e) => {
                self.recovery_form.finish_reset(Some(
                    e.user_message("Unable to process the request, please try again"),
                ));
            }
        }
        self
    }

    // New case

    pub fn case_form(&self) -> &CaseForm {
        &self.case_form
    }

    pub fn case_form_mut(&mut self) -> &mut CaseForm {
        &mut self.case_form
    }

    pub fn set_case_types(&mut self, result: Result<Vec<CaseType>, BackendError>) -> &mut Self {
        match result {
            Ok(case_types) => self.case_form.set_case_types(case_types),
            Err(e) => {
                error!("Failed to load case types: {}", e);
                self.case_form.fail_case_type_fetch();
                self.notify(Notification::error(format!(
                    "Failed to load case types: {}",
                    e.user_message("Unknown error")
                )));
            }
        }
        self
    }

    /// Attach the file named in the attachment row.
    ///
    pub fn attach_file(&mut self) -> &mut Self {
        let notification = match self.case_form.attach_from_path() {
            Ok(name) => Notification::info(format!("Attached {}", name)),
            Err(e) => Notification::error(format!("Cannot attach file: {}", e)),
        };
        self.notify(notification);
        self
    }

    /// Validate the draft and hand it to the network thread.
    ///
    pub fn submit_case(&mut self) -> &mut Self {
        match self.case_form.begin_submit(self.session.submitter_id()) {
            Ok(payload) => {
                if let Err(e) = self.try_dispatch(NetworkEvent::SubmitCase { payload }) {
                    error!("Failed to send case submission: {}", e);
                    self.case_form.abort_submit();
                    self.notify(Notification::error(format!("Failed to submit case: {}", e)));
                }
            }
            Err(e) => {
                self.notify(Notification::error(e.to_string()));
            }
        }
        self
    }

    pub fn finish_submit_case(
        &mut self,
        result: Result<crate::backend::CreatedCase, BackendError>,
    ) -> &mut Self {
        let notification = self.case_form.finish_submit(result);
        self.notify(notification)
    }

    // Case list

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn is_cases_loading(&self) -> bool {
        self.cases_loading
    }

    pub fn set_cases(&mut self, result: Result<Vec<Case>, BackendError>) -> &mut Self {
        self.cases_loading = false;
        match result {
            Ok(cases) => {
                self.cases = cases;
                self.case_index = 0;
            }
            Err(e) => {
                error!("Failed to load cases: {}", e);
                self.notify(Notification::error(format!(
                    "Failed to load cases: {}",
                    e.user_message("Unknown error")
                )));
            }
        }
        self
    }

    pub fn visible_cases(&self) -> Vec<&Case> {
        self.case_filter.visible_cases(&self.cases)
    }

    pub fn case_filter(&self) -> &CaseFilter {
        &self.case_filter
    }

    /// Filter edits reset the selection so it stays within the visible set.
    ///
    pub fn case_filter_mut(&mut self) -> &mut CaseFilter {
        self.case_index = 0;
        &mut self.case_filter
    }

    pub fn case_window(&self) -> CalendarWindow {
        self.case_window
    }

    pub fn case_index(&self) -> usize {
        self.case_index
    }

    pub fn next_case(&mut self) -> &mut Self {
        let len = self.visible_cases().len();
        if len > 0 {
            self.case_index = (self.case_index + 1) % len;
        }
        self
    }

    pub fn previous_case(&mut self) -> &mut Self {
        let len = self.visible_cases().len();
        if len > 0 {
            self.case_index = self.case_index.checked_sub(1).unwrap_or(len - 1);
        }
        self
    }

    pub fn next_month(&mut self) -> &mut Self {
        self.case_window = self.case_window.next();
        self.refresh_cases()
    }

    pub fn previous_month(&mut self) -> &mut Self {
        self.case_window = self.case_window.previous();
        self.refresh_cases()
    }

    pub fn refresh_cases(&mut self) -> &mut Self {
        self.cases_loading = true;
        self.dispatch(NetworkEvent::Cases {
            window: self.case_window,
        });
        self
    }

    // Export

    pub fn export_selection(&self) -> Option<&ExportSelection> {
        self.export.as_ref()
    }

    pub fn export_selection_mut(&mut self) -> Option<&mut ExportSelection> {
        self.export.as_mut()
    }

    /// Ask for the column catalog; the dialog opens when it arrives.
    ///
    pub fn request_export(&mut self) -> &mut Self {
        self.dispatch(NetworkEvent::OpenExport {
            window: Some(self.case_window),
        });
        self
    }

    /// Open the dialog. A failed catalog fetch is notified and the dialog
    /// opens with no columns.
    ///
    pub fn open_export(
        &mut self,
        window: Option<CalendarWindow>,
        columns: Result<Vec<ExportColumn>, BackendError>,
    ) -> &mut Self {
        let catalog = match columns {
            Ok(columns) => columns,
            Err(e) => {
                error!("Failed to load export columns: {}", e);
                self.notify(Notification::error(format!(
                    "Failed to load export columns: {}",
                    e.user_message("Unknown error")
                )));
                vec![]
            }
        };
        self.export = Some(ExportSelection::open(window, catalog));
        self
    }

    pub fn close_export(&mut self) -> &mut Self {
        self.export = None;
        self
    }

    /// Validate the selection and start the export. Validation failures are
    /// notified without any request being made.
    ///
    pub fn submit_export(&mut self, format: ExportFormat) -> &mut Self {
        let prepared = match self.export.as_mut() {
            Some(selection) => {
                selection.commit_input();
                selection.prepare().map(|_| selection.clone())
            }
            None => return self,
        };
        match prepared {
            Ok(selection) => self.dispatch(NetworkEvent::Export { selection, format }),
            Err(e) => {
                self.notify(Notification::error(e.to_string()));
            }
        }
        self
    }

    /// Success closes the dialog; failure keeps it open.
    ///
    pub fn finish_export(&mut self, result: Result<PathBuf, ExportError>) -> &mut Self {
        match result {
            Ok(path) => {
                self.export = None;
                self.notify(Notification::success(format!(
                    "Exported to {}",
                    path.display()
                )));
            }
            Err(e) => {
                error!("Export failed: {}", e);
                self.notify(Notification::error(e.to_string()));
            }
        }
        self
    }

    // Dashboard

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn set_dashboard(&mut self, dashboard: Dashboard) -> &mut Self {
        self.dashboard = dashboard;
        self
    }

    // User management

    pub fn user_directory(&self) -> &UserDirectory {
        &self.user_directory
    }

    pub fn user_directory_mut(&mut self) -> &mut UserDirectory {
        &mut self.user_directory
    }

    pub fn set_user_catalogs(
        &mut self,
        result: Result<(Vec<Role>, Vec<User>), BackendError>,
    ) -> &mut Self {
        match result {
            Ok((roles, users)) => self.user_directory.set_catalogs(roles, users),
            Err(e) => {
                error!("Failed to load users: {}", e);
                self.notify(
                    Notification::error(format!(
                        "Failed to load users: {}",
                        e.user_message("Unknown error")
                    ))
                    .with_ttl(USER_ALERT_TTL),
                );
            }
        }
        self
    }

    pub fn submit_new_user(&mut self) -> &mut Self {
        match self.user_directory.form.payload() {
            Ok(payload) => self.dispatch(NetworkEvent::CreateUser { payload }),
            Err(e) => {
                self.notify(Notification::error(e.to_string()).with_ttl(USER_ALERT_TTL));
            }
        }
        self
    }

    pub fn finish_create_user(&mut self, result: Result<User, BackendError>) -> &mut Self {
        let notification = self.user_directory.finish_create(result);
        self.notify(notification)
    }

    // Notifications

    pub fn notify(&mut self, notification: Notification) -> &mut Self {
        self.notifications.push(notification);
        self
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn dismiss_notifications(&mut self) -> &mut Self {
        self.notifications.clear();
        self
    }

    pub fn prune_notifications(&mut self, now: Instant) -> &mut Self {
        self.notifications.retain(|n| !n.is_expired(now));
        self
    }

    // Log panel

    pub fn toggle_log(&mut self) -> &mut Self {
        self.log_visible = !self.log_visible;
        self
    }

    pub fn is_log_visible(&self) -> bool {
        self.log_visible
    }

    /// Add a log entry, dropping the oldest past capacity.
    ///
    pub fn add_log_entry(&mut self, entry: String) {
        self.log_entries.push(entry);
        if self.log_entries.len() > LOG_CAPACITY {
            let excess = self.log_entries.len() - LOG_CAPACITY;
            self.log_entries.drain(..excess);
        }
    }

    pub fn log_entries(&self) -> &[String] {
        &self.log_entries
    }

    /// Dispatches an asynchronous network event.
    ///
    pub fn dispatch(&self, event: NetworkEvent) {
        if let Err(err) = self.try_dispatch(event) {
            error!("Received error from network dispatch: {}", err);
        }
    }

    /// Send a network event, failing when the network thread has gone away.
    /// Without a sender the event is dropped.
    ///
    pub fn try_dispatch(&self, event: NetworkEvent) -> Result<(), StateError> {
        match &self.net_sender {
            Some(net_sender) => net_sender
                .send(event)
                .map_err(|e| StateError::ChannelClosed(e.to_string())),
            None => Ok(()),
        }
    }

    fn save_config(&self, update: ConfigUpdate) {
        if let Some(sender) = &self.config_save_sender {
            if let Err(err) = sender.send(update) {
                error!("Failed to request config save: {}", err);
            }
        }
    }
}
