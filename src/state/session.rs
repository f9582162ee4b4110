//! Logged in identity.

use crate::backend::User;

/// Identity of the logged in user for the lifetime of the process.
///
#[derive(Debug, Default, Clone)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Identifier sent as the submitter of new cases.
    ///
    pub fn submitter_id(&self) -> Option<i64> {
        self.user.as_ref().map(|user| user.id)
    }

    pub fn login(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn logout(&mut self) {
        self.user = None;
    }
}
