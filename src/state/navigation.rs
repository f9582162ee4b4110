//! Navigation-related state types.
//!
//! Views, focus and the sidebar menu.

use std::fmt;

/// Specifying the different foci.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Focus {
    Menu,
    View,
}

/// Specifying the different views.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum View {
    Login,
    Recovery,
    NewCase,
    Cases,
    Dashboard,
    Users,
}

impl View {
    /// Views reachable without a session.
    ///
    pub fn is_public(&self) -> bool {
        matches!(self, View::Login | View::Recovery)
    }
}

/// Entries of the sidebar menu.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MenuItem {
    NewCase,
    Cases,
    Dashboard,
    Users,
    Logout,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::NewCase,
        MenuItem::Cases,
        MenuItem::Dashboard,
        MenuItem::Users,
        MenuItem::Logout,
    ];

    /// View opened by the entry; `None` for log out.
    ///
    pub fn view(&self) -> Option<View> {
        match self {
            MenuItem::NewCase => Some(View::NewCase),
            MenuItem::Cases => Some(View::Cases),
            MenuItem::Dashboard => Some(View::Dashboard),
            MenuItem::Users => Some(View::Users),
            MenuItem::Logout => None,
        }
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuItem::NewCase => "New case",
            MenuItem::Cases => "Cases",
            MenuItem::Dashboard => "Dashboard",
            MenuItem::Users => "Users",
            MenuItem::Logout => "Log out",
        };
        write!(f, "{}", label)
    }
}
