//! casedesk: a terminal front-end for reporting, tracking and exporting
//! cases held by a case management backend.

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod logger;
pub mod state;
pub mod ui;
