//! User management: role catalog, user table and the new user form.

use super::notification::Notification;
use crate::backend::{BackendError, NewUser, Role, User};
use std::time::Duration;

/// User management alerts disappear faster than other notifications.
pub const USER_ALERT_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum UserFormError {
    #[error("Please fill in all fields")]
    Incomplete,
}

/// Rows of the new user form.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum UserField {
    #[default]
    Username,
    Password,
    FirstName,
    LastName,
    Role,
}

impl UserField {
    const ORDER: [UserField; 5] = [
        UserField::Username,
        UserField::Password,
        UserField::FirstName,
        UserField::LastName,
        UserField::Role,
    ];

    fn step(self, step: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ORDER[(index + step).rem_euclid(len) as usize]
    }
}

/// Input of the new user form.
///
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NewUserForm {
    pub username: String,
    pub password: String,
    pub fname: String,
    pub lname: String,
    pub role_id: Option<i64>,
    field: UserField,
}

impl NewUserForm {
    /// Empty form with the role preset to the first one in the catalog.
    ///
    pub fn for_roles(roles: &[Role]) -> Self {
        NewUserForm {
            role_id: roles.first().map(|role| role.id),
            ..NewUserForm::default()
        }
    }

    pub fn field(&self) -> UserField {
        self.field
    }

    pub fn next_field(&mut self) {
        self.field = self.field.step(1);
    }

    pub fn previous_field(&mut self) {
        self.field = self.field.step(-1);
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            UserField::Username => Some(&mut self.username),
            UserField::Password => Some(&mut self.password),
            UserField::FirstName => Some(&mut self.fname),
            UserField::LastName => Some(&mut self.lname),
            UserField::Role => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.text_mut() {
            text.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Move the role selection through the catalog, wrapping.
    ///
    pub fn cycle_role(&mut self, roles: &[Role], step: isize) {
        if roles.is_empty() {
            return;
        }
        let len = roles.len() as isize;
        let index = self
            .role_id
            .and_then(|id| roles.iter().position(|role| role.id == id))
            .map(|index| (index as isize + step).rem_euclid(len))
            .unwrap_or(0);
        self.role_id = Some(roles[index as usize].id);
    }

    /// Every field is required.
    ///
    pub fn payload(&self) -> Result<NewUser, UserFormError> {
        let role_id = self.role_id.ok_or(UserFormError::Incomplete)?;
        if [&self.username, &self.password, &self.fname, &self.lname]
            .iter()
            .any(|value| value.trim().is_empty())
        {
            return Err(UserFormError::Incomplete);
        }
        Ok(NewUser {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            fname: self.fname.trim().to_string(),
            lname: self.lname.trim().to_string(),
            role_id,
        })
    }
}

/// State of the user management view.
///
#[derive(Debug, Default, Clone)]
pub struct UserDirectory {
    pub form: NewUserForm,
    roles: Vec<Role>,
    users: Vec<User>,
    loaded: bool,
    selected: usize,
}

impl UserDirectory {
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Store both catalogs and preset the form role.
    ///
    pub fn set_catalogs(&mut self, roles: Vec<Role>, users: Vec<User>) {
        self.form = NewUserForm::for_roles(&roles);
        self.roles = roles;
        self.users = users;
        self.loaded = true;
        self.selected = 0;
    }

    pub fn role_name(&self, user: &User) -> String {
        user.role_name
            .clone()
            .or_else(|| {
                let id = user.role_id?;
                self.roles
                    .iter()
                    .find(|role| role.id == id)
                    .map(|role| role.name.clone())
            })
            .unwrap_or_default()
    }

    pub fn cycle_role(&mut self, step: isize) {
        self.form.cycle_role(&self.roles, step);
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn next_user(&mut self) {
        if !self.users.is_empty() {
            self.selected = (self.selected + 1) % self.users.len();
        }
    }

    pub fn previous_user(&mut self) {
        if !self.users.is_empty() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.users.len() - 1);
        }
    }

    /// Apply the create result. Success appends the user and resets the
    /// form; failure keeps the input.
    ///
    pub fn finish_create(&mut self, result: Result<User, BackendError>) -> Notification {
        let notification = match result {
            Ok(user) => {
                let message = format!("User \"{}\" was added", user.username);
                self.users.push(user);
                self.form = NewUserForm::for_roles(&self.roles);
                Notification::success(message)
            }
            Err(e) => Notification::error(format!(
                "Failed to create user: {}",
                e.user_message("Unknown error")
            )),
        };
        notification.with_ttl(USER_ALERT_TTL)
    }
}
