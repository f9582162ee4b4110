mod client;
mod error;
mod resource;

pub use error::BackendError;
pub use resource::*;

use chrono::{DateTime, Local, NaiveDate};
use client::Client;
use log::*;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// One row of export output, keyed by column.
pub type ExportRow = Map<String, Value>;

/// Responsible for asynchronous interaction with the case backend including
/// transformation of response data into explicitly-defined types. One method
/// per endpoint; no retries or caching.
///
pub struct Backend {
    client: Client,
}

impl Backend {
    /// Returns a new instance for the given backend base URL.
    ///
    pub fn new(base_url: &str) -> Result<Backend, BackendError> {
        debug!("Initializing backend client for {}...", base_url);
        Ok(Backend {
            client: Client::new(base_url)?,
        })
    }

    /// Authenticate and return the identity of the logged in user.
    ///
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<User, BackendError> {
        debug!("Authenticating user '{}'...", username);

        #[derive(Deserialize)]
        struct LoginResponse {
            user: User,
        }

        let response: LoginResponse = self
            .client
            .post_json(
                "login/",
                &json!({
                    "username": username,
                    "password": password,
                    "rememberMe": remember,
                }),
            )
            .await?;
        Ok(response.user)
    }

    /// Ask the backend whether a password reset may proceed for the username.
    /// Returns the backend's confirmation message.
    ///
    pub async fn forgot_password(&self, username: &str) -> Result<String, BackendError> {
        debug!("Requesting password reset for '{}'...", username);
        let response: DetailResponse = self
            .client
            .post_json("forgot-password/", &json!({ "username": username }))
            .await?;
        Ok(response.detail)
    }

    /// Apply a new password for the username. Returns the backend's
    /// confirmation message.
    ///
    pub async fn reset_password(
        &self,
        username: &str,
        new_password: &str,
    ) -> Result<String, BackendError> {
        debug!("Applying new password for '{}'...", username);
        let response: DetailResponse = self
            .client
            .post_json(
                "reset-password/",
                &json!({ "username": username, "new_password": new_password }),
            )
            .await?;
        Ok(response.detail)
    }

    /// Returns the case type catalog.
    ///
    pub async fn case_types(&self) -> Result<Vec<CaseType>, BackendError> {
        debug!("Requesting case type catalog...");
        self.client.get("case/type/", None).await
    }

    /// Submit a new case as multipart form data, attachments included.
    ///
    pub async fn create_case(&self, case: &NewCase) -> Result<CreatedCase, BackendError> {
        debug!(
            "Creating case '{}' with {} attachment(s)...",
            case.title,
            case.attachments.len()
        );

        let mut form = Form::new()
            .text("caseTitle", case.title.clone())
            .text("caseType", case.case_type.clone())
            .text("description", case.description.clone())
            .text("location", case.location.clone());
        if let Some(submitter_id) = case.submitter_id {
            form = form.text("userId", submitter_id.to_string());
        }
        for attachment in &case.attachments {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(&attachment.content_type)?;
            form = form.part("images", part);
        }

        self.client.post_multipart("create/cases/", form).await
    }

    /// Returns the cases created inside the given window.
    ///
    pub async fn cases(
        &self,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Vec<Case>, BackendError> {
        debug!("Requesting cases between {} and {}...", start, end);
        let start = start.to_rfc3339();
        let end = end.to_rfc3339();
        let cases: Vec<Case> = self
            .client
            .get(
                "case/list/",
                Some(vec![("start", start.as_str()), ("end", end.as_str())]),
            )
            .await?;
        debug!("Retrieved {} cases", cases.len());
        Ok(cases)
    }

    /// Returns the catalog of exportable columns.
    ///
    pub async fn export_columns(&self) -> Result<Vec<ExportColumn>, BackendError> {
        debug!("Requesting exportable columns...");
        self.client.get("case/columns/", None).await
    }

    /// Returns rows holding the selected columns for cases inside the window.
    ///
    pub async fn export_rows(
        &self,
        columns: &[String],
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Vec<ExportRow>, BackendError> {
        debug!(
            "Requesting export of {} column(s) between {} and {}...",
            columns.len(),
            start,
            end
        );
        self.client
            .post_json(
                "case/export/",
                &json!({
                    "columns": columns,
                    "start": start.to_rfc3339(),
                    "end": end.to_rfc3339(),
                }),
            )
            .await
    }

    /// Returns the number of users holding each role.
    ///
    pub async fn users_by_role(&self) -> Result<Vec<RoleCount>, BackendError> {
        debug!("Requesting users by role...");

        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "usersByRole")]
            users_by_role: Vec<RoleCount>,
        }

        let response: Response = self.client.get("users/by-role/", None).await?;
        Ok(response.users_by_role)
    }

    /// Returns the number of cases created on the date in each status.
    ///
    pub async fn cases_by_status(&self, date: NaiveDate) -> Result<Vec<StatusCount>, BackendError> {
        debug!("Requesting cases by status for {}...", date);

        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "todayCasesByStatus")]
            cases_by_status: Vec<StatusCount>,
        }

        let date = date.format("%Y-%m-%d").to_string();
        let response: Response = self
            .client
            .get("cases/today-by-status/", Some(vec![("date", date.as_str())]))
            .await?;
        Ok(response.cases_by_status)
    }

    /// Returns the number of cases created on the date of each type.
    ///
    pub async fn cases_by_type(&self, date: NaiveDate) -> Result<Vec<TypeCount>, BackendError> {
        debug!("Requesting cases by type for {}...", date);

        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "todayCasesByType")]
            cases_by_type: Vec<TypeCount>,
        }

        let date = date.format("%Y-%m-%d").to_string();
        let response: Response = self
            .client
            .get("cases/today-by-type/", Some(vec![("date", date.as_str())]))
            .await?;
        Ok(response.cases_by_type)
    }

    /// Returns all users.
    ///
    pub async fn users(&self) -> Result<Vec<User>, BackendError> {
        debug!("Requesting users...");
        self.client.get("users/", None).await
    }

    /// Returns all roles.
    ///
    pub async fn roles(&self) -> Result<Vec<Role>, BackendError> {
        debug!("Requesting roles...");
        self.client.get("roles/", None).await
    }

    /// Create a user and return the created record.
    ///
    pub async fn create_user(&self, user: &NewUser) -> Result<User, BackendError> {
        debug!("Creating user '{}'...", user.username);

        #[derive(Deserialize)]
        struct Response {
            user: User,
        }

        let response: Response = self.client.post_json("users/create/", user).await?;
        Ok(response.user)
    }
}

#[derive(Deserialize)]
struct DetailResponse {
    #[serde(default)]
    detail: String,
}
