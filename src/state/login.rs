//! Login and password recovery forms.

/// Client side checks on the login and recovery forms.
///
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum LoginError {
    #[error("Please enter your username and password")]
    MissingCredentials,

    #[error("Please enter your username to continue")]
    MissingUsername,

    #[error("Please fill in both password fields")]
    MissingPassword,

    #[error("The passwords do not match")]
    PasswordMismatch,
}

/// Rows of the login form.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
    Remember,
}

/// Validated login input.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub remember: bool,
}

/// Login form state.
///
#[derive(Debug, Default, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub remember: bool,
    field: LoginField,
    error: Option<String>,
    pending: bool,
}

impl LoginForm {
    /// Start a form pre-filled with a remembered username.
    ///
    pub fn with_username(username: Option<String>) -> Self {
        let remember = username.is_some();
        let mut form = LoginForm {
            username: username.unwrap_or_default(),
            remember,
            ..LoginForm::default()
        };
        if remember {
            form.field = LoginField::Password;
        }
        form
    }

    pub fn field(&self) -> LoginField {
        self.field
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Remember,
            LoginField::Remember => LoginField::Username,
        };
    }

    pub fn previous_field(&mut self) {
        self.field = match self.field {
            LoginField::Username => LoginField::Remember,
            LoginField::Password => LoginField::Username,
            LoginField::Remember => LoginField::Password,
        };
    }

    pub fn push_char(&mut self, c: char) {
        match self.field {
            LoginField::Username => self.username.push(c),
            LoginField::Password => self.password.push(c),
            LoginField::Remember if c == ' ' => self.remember = !self.remember,
            LoginField::Remember => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.field {
            LoginField::Username => {
                self.username.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
            LoginField::Remember => {}
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Validate and mark the attempt as pending. Returns `None` while an
    /// attempt is already outstanding.
    ///
    pub fn begin(&mut self) -> Option<Result<Credentials, LoginError>> {
        if self.pending {
            return None;
        }
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            self.error = Some(LoginError::MissingCredentials.to_string());
            return Some(Err(LoginError::MissingCredentials));
        }
        self.pending = true;
        self.error = None;
        Some(Ok(Credentials {
            username: username.to_string(),
            password: self.password.clone(),
            remember: self.remember,
        }))
    }

    /// Settle an attempt. Failure keeps the username and clears the password.
    ///
    pub fn finish(&mut self, error: Option<String>) {
        self.pending = false;
        if let Some(message) = error {
            self.password.clear();
            self.error = Some(message);
        }
    }
}

/// Steps of password recovery.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum RecoveryStep {
    #[default]
    Username,
    NewPassword,
}

/// Inputs of the new password step.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum PasswordField {
    #[default]
    Password,
    Confirmation,
}

/// Password recovery form: confirm the username, then set a new password.
///
#[derive(Debug, Default, Clone)]
pub struct RecoveryForm {
    pub username: String,
    pub password: String,
    pub confirmation: String,
    step: RecoveryStep,
    field: PasswordField,
    message: Option<String>,
    error: Option<String>,
    pending: bool,
}

impl RecoveryForm {
    /// Fresh form on the username step, prefilled with `username`.
    ///
    pub fn for_username(username: impl Into<String>) -> Self {
        RecoveryForm {
            username: username.into(),
            ..RecoveryForm::default()
        }
    }

    pub fn step(&self) -> RecoveryStep {
        self.step
    }

    pub fn field(&self) -> PasswordField {
        self.field
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            PasswordField::Password => PasswordField::Confirmation,
            PasswordField::Confirmation => PasswordField::Password,
        };
    }

    pub fn push_char(&mut self, c: char) {
        match (self.step, self.field) {
            (RecoveryStep::Username, _) => self.username.push(c),
            (RecoveryStep::NewPassword, PasswordField::Password) => self.password.push(c),
            (RecoveryStep::NewPassword, PasswordField::Confirmation) => {
                self.confirmation.push(c)
            }
        }
    }

    pub fn pop_char(&mut self) {
        match (self.step, self.field) {
            (RecoveryStep::Username, _) => self.username.pop(),
            (RecoveryStep::NewPassword, PasswordField::Password) => self.password.pop(),
            (RecoveryStep::NewPassword, PasswordField::Confirmation) => self.confirmation.pop(),
        };
    }

    /// Backend confirmation shown above the inputs.
    ///
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Validate the username step and mark it pending.
    ///
    pub fn begin_username(&mut self) -> Result<String, LoginError> {
        let username = self.username.trim().to_string();
        if username.is_empty() {
            self.error = Some(LoginError::MissingUsername.to_string());
            return Err(LoginError::MissingUsername);
        }
        self.pending = true;
        self.error = None;
        Ok(username)
    }

    /// Advance to the new password step once the backend accepted the
    /// username, or show its error.
    ///
    pub fn finish_username(&mut self, result: Result<String, String>) {
        self.pending = false;
        match result {
            Ok(message) => {
                self.step = RecoveryStep::NewPassword;
                self.message = Some(message);
                self.error = None;
            }
            Err(message) => self.error = Some(message),
        }
    }

    /// Validate the new password step, returning `(username, password)`.
    ///
    pub fn begin_reset(&mut self) -> Result<(String, String), LoginError> {
        let checked = if self.password.is_empty() || self.confirmation.is_empty() {
            Err(LoginError::MissingPassword)
        } else if self.password != self.confirmation {
            Err(LoginError::PasswordMismatch)
        } else {
            Ok((self.username.trim().to_string(), self.password.clone()))
        };
        match &checked {
            Ok(_) => {
                self.pending = true;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        checked
    }

    /// Settle the reset. Failures stay on the password step.
    ///
    pub fn finish_reset(&mut self, error: Option<String>) {
        self.pending = false;
        if let Some(message) = error {
            self.error = Some(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        let mut form = LoginForm::default();
        form.username = "somchai".to_string();
        assert_eq!(form.begin(), Some(Err(LoginError::MissingCredentials)));
        assert!(!form.is_pending());
        assert!(form.error().is_some());
    }

    #[test]
    fn login_trims_username_and_blocks_second_attempt() {
        let mut form = LoginForm::default();
        " somchai ".chars().for_each(|c| form.push_char(c));
        form.next_field();
        "secret".chars().for_each(|c| form.push_char(c));
        form.next_field();
        form.push_char(' ');

        let credentials = form.begin().unwrap().unwrap();
        assert_eq!(
            credentials,
            Credentials {
                username: "somchai".to_string(),
                password: "secret".to_string(),
                remember: true,
            }
        );
        assert!(form.begin().is_none());
    }

    #[test]
    fn failed_login_clears_password_only() {
        let mut form = LoginForm {
            username: "somchai".to_string(),
            password: "wrong".to_string(),
            ..LoginForm::default()
        };
        form.begin().unwrap().unwrap();
        form.finish(Some("Invalid credentials".to_string()));
        assert_eq!(form.username, "somchai");
        assert!(form.password.is_empty());
        assert_eq!(form.error(), Some("Invalid credentials"));
        assert!(!form.is_pending());
    }

    #[test]
    fn remembered_username_prefills_form() {
        let form = LoginForm::with_username(Some("somchai".to_string()));
        assert_eq!(form.username, "somchai");
        assert!(form.remember);
        assert_eq!(form.field(), LoginField::Password);
    }

    #[test]
    fn recovery_walks_both_steps() {
        let mut form = RecoveryForm::default();
        assert_eq!(form.begin_username(), Err(LoginError::MissingUsername));

        "somchai".chars().for_each(|c| form.push_char(c));
        assert_eq!(form.begin_username().unwrap(), "somchai");
        form.finish_username(Ok("User found".to_string()));
        assert_eq!(form.step(), RecoveryStep::NewPassword);
        assert_eq!(form.message(), Some("User found"));

        "n3w".chars().for_each(|c| form.push_char(c));
        form.toggle_field();
        "n3x".chars().for_each(|c| form.push_char(c));
        assert_eq!(form.begin_reset(), Err(LoginError::PasswordMismatch));

        form.pop_char();
        form.push_char('w');
        assert_eq!(
            form.begin_reset().unwrap(),
            ("somchai".to_string(), "n3w".to_string())
        );
    }

    #[test]
    fn unknown_username_stays_on_first_step() {
        let mut form = RecoveryForm {
            username: "ghost".to_string(),
            ..RecoveryForm::default()
        };
        form.begin_username().unwrap();
        form.finish_username(Err("User not found".to_string()));
        assert_eq!(form.step(), RecoveryStep::Username);
        assert_eq!(form.error(), Some("User not found"));
    }

    #[test]
    fn reset_requires_both_passwords() {
        let mut form = RecoveryForm::default();
        form.password = "only-one".to_string();
        assert_eq!(form.begin_reset(), Err(LoginError::MissingPassword));
        assert!(!form.is_pending());
    }
}
