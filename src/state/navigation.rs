//! Navigation-related state types.
//!
//! This module contains enums and types related to views, overlays and the
//! filter menu.

/// Specifying the different views.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum View {
    Board,
    Filters,
    TaskForm,
    ColumnForm,
    Confirm,
    Finder,
}

/// Filter dimension a menu entry toggles.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FilterKind {
    Priority,
    Status,
    Assignee,
}

/// One selectable row of the filter menu.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FilterEntry {
    pub kind: FilterKind,
    pub value: String, // Priority label, status, or assignee id
    pub label: String,
}

/// Destructive action awaiting confirmation.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Confirm {
    DeleteTask { id: String, title: String },
    DeleteColumn { id: String, name: String },
}

impl Confirm {
    pub fn prompt(&self) -> String {
        match self {
            Confirm::DeleteTask { title, .. } => format!("Delete task '{}'?", title),
            Confirm::DeleteColumn { name, .. } => {
                format!("Delete column '{}' and all of its tasks?", name)
            }
        }
    }
}
