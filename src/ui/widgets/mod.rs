//! Reusable UI widget components.
//!
//! This module contains the loading spinner, form field lines, popup layout
//! and styling helpers.

pub mod field;
pub mod spinner;
pub mod styling;
