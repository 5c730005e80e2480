//! Application state management module.
//!
//! This module contains the core state management for the board view, including:
//! - Main `State` struct that holds the board snapshot, cursor and overlays
//! - Navigation types (View, FilterEntry, Confirm)
//! - Form editing types (TaskForm, ColumnForm)

mod form;
mod navigation;

pub use form::{ColumnForm, TaskField, TaskForm};
pub use navigation::{Confirm, FilterEntry, FilterKind, View};

// State struct, methods and Default impl are in state_impl.rs
#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::{Finder, State};
