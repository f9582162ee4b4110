//! Application state management module.
//!
//! This module contains the core state management for the application, including:
//! - Main `State` struct that holds all application data
//! - Per-view state: login and recovery, case draft, case filter, export
//!   selection, dashboard and user management
//! - Navigation types (View, Focus, MenuItem)
//! - State error handling

pub mod calendar;
pub mod dashboard;
pub mod draft;
mod error;
pub mod export;
pub mod filter;
pub mod login;
mod navigation;
pub mod notification;
pub mod session;
pub mod users;

pub use error::StateError;
pub use navigation::{Focus, MenuItem, View};

#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::State;
