//! Event handling module.
//!
//! This module contains handlers for different types of events:
//! - Network events: case backend requests and exports
//! - Terminal events: key input and ticks

pub mod network;
pub mod terminal;
