//! Event handling module.
//!
//! This module contains handlers for different types of events:
//! - Network events: board API interactions run on the network thread
//! - Terminal events: user input and terminal interactions

pub mod network;
pub mod terminal;
