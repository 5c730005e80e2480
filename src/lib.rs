//! Terminal client for the Taskboard kanban API.
//!
//! The library exposes the typed API client, the stored session, and the
//! board view controller (state store, filters, optimistic mutations and
//! drag reordering) that the terminal interface is built on.

pub mod api;
pub mod app;
pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod session;
pub mod state;
pub mod ui;
pub mod utils;
