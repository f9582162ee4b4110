use crate::backend::{Backend, NewCase, NewUser};
use crate::export;
use crate::state::calendar::CalendarWindow;
use crate::state::dashboard::{Dashboard, DashboardSummary, DASHBOARD_LOAD_FAILED};
use crate::state::export::{ExportFormat, ExportSelection};
use crate::state::login::Credentials;
use crate::state::notification::Notification;
use crate::state::State;
use anyhow::Result;
use chrono::Local;
use log::*;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    Login {
        credentials: Credentials,
    },
    ForgotPassword {
        username: String,
    },
    ResetPassword {
        username: String,
        password: String,
    },
    CaseTypes,
    SubmitCase {
        payload: NewCase,
    },
    Cases {
        window: CalendarWindow,
    },
    OpenExport {
        window: Option<CalendarWindow>,
    },
    Export {
        selection: ExportSelection,
        format: ExportFormat,
    },
    Dashboard,
    Users,
    CreateUser {
        payload: NewUser,
    },
}

impl Event {
    /// Event name for logging. Payloads carry credentials and file bytes, so
    /// they are not logged.
    ///
    pub fn name(&self) -> &'static str {
        match self {
            Event::Login { .. } => "Login",
            Event::ForgotPassword { .. } => "ForgotPassword",
            Event::ResetPassword { .. } => "ResetPassword",
            Event::CaseTypes => "CaseTypes",
            Event::SubmitCase { .. } => "SubmitCase",
            Event::Cases { .. } => "Cases",
            Event::OpenExport { .. } => "OpenExport",
            Event::Export { .. } => "Export",
            Event::Dashboard => "Dashboard",
            Event::Users => "Users",
            Event::CreateUser { .. } => "CreateUser",
        }
    }
}

/// Specify struct for managing state with network events.
///
pub struct Handler<'a> {
    state: &'a Arc<Mutex<State>>,
    backend: &'a Backend,
    export_dir: PathBuf,
}

impl<'a> Handler<'a> {
    /// Return new instance with reference to state.
    ///
    pub fn new(state: &'a Arc<Mutex<State>>, backend: &'a Backend, export_dir: PathBuf) -> Self {
        Handler {
            state,
            backend,
            export_dir,
        }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        debug!("Processing network event '{}'...", event.name());
        match event {
            Event::Login { credentials } => self.login(credentials).await,
            Event::ForgotPassword { username } => self.forgot_password(username).await,
            Event::ResetPassword { username, password } => {
                self.reset_password(username, password).await
            }
            Event::CaseTypes => self.case_types().await,
            Event::SubmitCase { payload } => self.submit_case(payload).await,
            Event::Cases { window } => self.cases(window).await,
            Event::OpenExport { window } => self.open_export(window).await,
            Event::Export { selection, format } => self.export(selection, format).await,
            Event::Dashboard => self.dashboard().await,
            Event::Users => self.users().await,
            Event::CreateUser { payload } => self.create_user(payload).await,
        }
        Ok(())
    }

    async fn login(&mut self, credentials: Credentials) {
        info!("Logging in as '{}'...", credentials.username);
        let result = self
            .backend
            .login(
                &credentials.username,
                &credentials.password,
                credentials.remember,
            )
            .await;
        let mut state = self.state.lock().await;
        state.finish_login(result, credentials.remember);
    }

    async fn forgot_password(&mut self, username: String) {
        let result = self.backend.forgot_password(&username).await;
        if let Err(e) = &result {
            warn!("Password reset request for '{}' failed: {}", username, e);
        }
        let mut state = self.state.lock().await;
        state.finish_forgot_password(result);
    }

    async fn reset_password(&mut self, username: String, password: String) {
        let result = self.backend.reset_password(&username, &password).await;
        match &result {
            Ok(_) => info!("Password reset for '{}'.", username),
            Err(e) => warn!("Password reset for '{}' failed: {}", username, e),
        }
        let mut state = self.state.lock().await;
        state.finish_reset_password(result);
    }

    async fn case_types(&mut self) {
        info!("Fetching case type catalog...");
        let result = self.backend.case_types().await;
        let mut state = self.state.lock().await;
        state.set_case_types(result);
    }

    /// Send the payload; the draft is reset or kept by the state once the
    /// result is known.
    ///
    async fn submit_case(&mut self, payload: NewCase) {
        info!("Submitting case '{}'...", payload.title);
        let result = self.backend.create_case(&payload).await;
        match &result {
            Ok(created) => info!("Case submitted (id {:?}).", created.case_id),
            Err(e) => error!("Failed to submit case: {}", e),
        }
        let mut state = self.state.lock().await;
        state.finish_submit_case(result);
    }

    async fn cases(&mut self, window: CalendarWindow) {
        info!("Fetching cases for {}...", window.label());
        let result = match window.local_range() {
            Some((start, end)) => self.backend.cases(start, end).await,
            None => {
                let mut state = self.state.lock().await;
                state.set_cases(Ok(vec![]));
                state.notify(Notification::error(format!(
                    "{} cannot be resolved in local time",
                    window.label()
                )));
                return;
            }
        };
        if let Ok(cases) = &result {
            info!("Received {} case(s) for {}.", cases.len(), window.label());
        }
        let mut state = self.state.lock().await;
        if state.case_window() == window {
            state.set_cases(result);
        } else {
            debug!("Dropping cases for {}; window changed.", window.label());
        }
    }

    async fn open_export(&mut self, window: Option<CalendarWindow>) {
        info!("Fetching exportable columns...");
        let result = self.backend.export_columns().await;
        let mut state = self.state.lock().await;
        state.open_export(window, result);
    }

    async fn export(&mut self, selection: ExportSelection, format: ExportFormat) {
        let result = export::run(self.backend, &selection, format, &self.export_dir).await;
        let mut state = self.state.lock().await;
        state.finish_export(result);
    }

    /// Load the three dashboard counts one after another; the first failure
    /// fails the whole view.
    ///
    async fn dashboard(&mut self) {
        info!("Loading dashboard data...");
        let today = Local::now().date_naive();
        let result = async {
            let users = self.backend.users_by_role().await?;
            let by_status = self.backend.cases_by_status(today).await?;
            let by_type = self.backend.cases_by_type(today).await?;
            Ok::<_, crate::backend::BackendError>(DashboardSummary::from_counts(
                users, by_status, by_type,
            ))
        }
        .await;
        let dashboard = match result {
            Ok(summary) => Dashboard::Loaded(summary),
            Err(e) => {
                error!("Dashboard data loading error: {}", e);
                Dashboard::Failed(DASHBOARD_LOAD_FAILED.to_string())
            }
        };
        let mut state = self.state.lock().await;
        state.set_dashboard(dashboard);
    }

    async fn users(&mut self) {
        info!("Fetching roles and users...");
        let result = tokio::try_join!(self.backend.roles(), self.backend.users());
        let mut state = self.state.lock().await;
        state.set_user_catalogs(result);
    }

    async fn create_user(&mut self, payload: NewUser) {
        info!("Creating user '{}'...", payload.username);
        let result = self.backend.create_user(&payload).await;
        if let Err(e) = &result {
            error!("Error creating user: {}", e);
        }
        let mut state = self.state.lock().await;
        state.finish_create_user(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, User};
    use crate::state::draft::{CaseDraft, DraftField};
    use crate::state::export::RangeField;
    use crate::state::notification::Severity;
    use crate::state::View;
    use fake::{Fake, Faker};
    use httpmock::prelude::*;
    use serde_json::json;

    fn logged_in_state() -> Arc<Mutex<State>> {
        let mut state = State::default();
        let user = User {
            id: 12,
            ..Faker.fake::<User>()
        };
        state.finish_login(Ok::<User, BackendError>(user), false);
        Arc::new(Mutex::new(state))
    }

    fn fill_draft(draft: &mut CaseDraft) {
        draft.update_field(DraftField::CaseType, "1");
        draft.update_field(DraftField::Title, "Broken street light");
        draft.update_field(DraftField::Description, "Dark since Monday");
        draft.update_field(DraftField::Location, "Soi 7");
    }

    async fn begin_submit(state: &Arc<Mutex<State>>) -> NewCase {
        let mut state = state.lock().await;
        let submitter = state.session().submitter_id();
        let form = state.case_form_mut();
        fill_draft(&mut form.draft);
        form.begin_submit(submitter).unwrap()
    }

    #[tokio::test]
    async fn successful_submit_resets_draft() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/create/cases/")
                .body_contains("Broken street light");
            then.status(201)
                .json_body(json!({"message": "created", "case_id": 31}));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let state = logged_in_state();
        let payload = begin_submit(&state).await;
        assert_eq!(payload.submitter_id, Some(12));

        let mut handler = Handler::new(&state, &backend, PathBuf::from("."));
        handler.handle(Event::SubmitCase { payload }).await.unwrap();

        mock.assert();
        let state = state.lock().await;
        assert_eq!(state.case_form().draft, CaseDraft::default());
        assert!(!state.case_form().is_submitting());
        let last = state.notifications().last().unwrap();
        assert_eq!(last.severity, Severity::Success);
        assert!(last.message.contains("31"));
    }

    #[tokio::test]
    async fn failed_submit_keeps_draft() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/create/cases/");
            then.status(400).json_body(json!({
                "message": "Invalid data",
                "errors": {"location": ["This field may not be blank."]}
            }));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let state = logged_in_state();
        let payload = begin_submit(&state).await;
        let before = state.lock().await.case_form().draft.clone();

        let mut handler = Handler::new(&state, &backend, PathBuf::from("."));
        handler.handle(Event::SubmitCase { payload }).await.unwrap();

        let state = state.lock().await;
        assert_eq!(state.case_form().draft, before);
        assert!(!state.case_form().is_submitting());
        let last = state.notifications().last().unwrap();
        assert_eq!(last.severity, Severity::Error);
        assert!(last.message.contains("Invalid data"));
    }

    #[tokio::test]
    async fn login_populates_session() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/login/")
                .json_body_partial(r#"{"username": "somchai", "rememberMe": false}"#);
            then.status(200).json_body(json!({
                "message": "ok",
                "user": {"id": 5, "username": "somchai", "fname": "Som", "lname": "Chai"}
            }));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let state = Arc::new(Mutex::new(State::default()));

        let mut handler = Handler::new(&state, &backend, PathBuf::from("."));
        handler
            .handle(Event::Login {
                credentials: Credentials {
                    username: "somchai".to_string(),
                    password: "pw".to_string(),
                    remember: false,
                },
            })
            .await
            .unwrap();

        let state = state.lock().await;
        assert_eq!(state.session().submitter_id(), Some(5));
        assert_eq!(state.current_view(), View::NewCase);
    }

    #[tokio::test]
    async fn dashboard_failure_shows_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users/by-role/");
            then.status(200)
                .json_body(json!({"usersByRole": [{"role": "admin", "count": 2}]}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/cases/today-by-status/");
            then.status(500);
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let state = logged_in_state();

        let mut handler = Handler::new(&state, &backend, PathBuf::from("."));
        handler.handle(Event::Dashboard).await.unwrap();

        let state = state.lock().await;
        assert_eq!(
            *state.dashboard(),
            Dashboard::Failed(DASHBOARD_LOAD_FAILED.to_string())
        );
    }

    #[tokio::test]
    async fn dashboard_loads_totals() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users/by-role/");
            then.status(200).json_body(json!({"usersByRole": [
                {"role": "admin", "count": 2},
                {"role": "officer", "count": 3}
            ]}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/cases/today-by-status/");
            then.status(200).json_body(json!({"todayCasesByStatus": [
                {"status": "pending", "count": 4}
            ]}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/cases/today-by-type/");
            then.status(200)
                .json_body(json!({"todayCasesByType": [{"type": "Noise", "count": 4}]}));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let state = logged_in_state();

        let mut handler = Handler::new(&state, &backend, PathBuf::from("."));
        handler.handle(Event::Dashboard).await.unwrap();

        let state = state.lock().await;
        match state.dashboard() {
            Dashboard::Loaded(summary) => {
                assert_eq!(summary.total_users, 5);
                assert_eq!(summary.total_today_cases, 4);
            }
            other => panic!("unexpected dashboard {:?}", other),
        }
    }

    #[tokio::test]
    async fn export_success_closes_dialog() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/case/columns/");
            then.status(200)
                .json_body(json!([{"key": "title", "label": "Title"}]));
        });
        server.mock(|when, then| {
            when.method(POST).path("/case/export/");
            then.status(200).json_body(json!([{"title": "Leak"}]));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let state = logged_in_state();
        let dir = tempfile::tempdir().unwrap();
        let mut handler = Handler::new(&state, &backend, dir.path().to_path_buf());

        handler
            .handle(Event::OpenExport { window: None })
            .await
            .unwrap();
        let selection = {
            let mut state = state.lock().await;
            let selection = state.export_selection_mut().unwrap();
            selection.toggle_column("title");
            selection.clone()
        };
        handler
            .handle(Event::Export {
                selection,
                format: ExportFormat::Spreadsheet,
            })
            .await
            .unwrap();

        let state = state.lock().await;
        assert!(state.export_selection().is_none());
        assert!(dir.path().join("export.xlsx").exists());
    }

    #[tokio::test]
    async fn export_empty_result_keeps_dialog() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/case/columns/");
            then.status(200)
                .json_body(json!([{"key": "title", "label": "Title"}]));
        });
        server.mock(|when, then| {
            when.method(POST).path("/case/export/");
            then.status(200).json_body(json!([]));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let state = logged_in_state();
        let dir = tempfile::tempdir().unwrap();
        let mut handler = Handler::new(&state, &backend, dir.path().to_path_buf());

        handler
            .handle(Event::OpenExport { window: None })
            .await
            .unwrap();
        let selection = {
            let mut state = state.lock().await;
            let selection = state.export_selection_mut().unwrap();
            selection.toggle_column("title");
            selection.set_range_field(RangeField::End, "2999-01-01T00:00");
            selection.clone()
        };
        handler
            .handle(Event::Export {
                selection,
                format: ExportFormat::Document,
            })
            .await
            .unwrap();

        let state = state.lock().await;
        assert!(state.export_selection().is_some());
        assert_eq!(
            state.notifications().last().unwrap().message,
            "No data found for the selected criteria"
        );
        assert!(!dir.path().join("export.pdf").exists());
    }

    #[tokio::test]
    async fn created_user_is_listed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/roles/");
            then.status(200)
                .json_body(json!([{"id": 1, "name": "admin", "description": ""}]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/users/");
            then.status(200).json_body(json!([]));
        });
        server.mock(|when, then| {
            when.method(POST).path("/users/create/");
            then.status(201).json_body(json!({
                "message": "created",
                "user": {"id": 9, "username": "malee", "fname": "Malee", "lname": "Suk"}
            }));
        });
        let backend = Backend::new(&server.base_url()).unwrap();
        let state = logged_in_state();
        let mut handler = Handler::new(&state, &backend, PathBuf::from("."));

        handler.handle(Event::Users).await.unwrap();
        let payload = {
            let mut state = state.lock().await;
            let form = &mut state.user_directory_mut().form;
            form.username = "malee".to_string();
            form.password = "pw".to_string();
            form.fname = "Malee".to_string();
            form.lname = "Suk".to_string();
            form.payload().unwrap()
        };
        assert_eq!(payload.role_id, 1);
        handler.handle(Event::CreateUser { payload }).await.unwrap();

        let state = state.lock().await;
        assert_eq!(state.user_directory().users().len(), 1);
        assert_eq!(state.user_directory().form.username, "");
    }
}
