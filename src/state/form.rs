//! Form editing state types.
//!
//! This module contains the task and column forms shown as overlays on the
//! board view, including field focus and client-side validation.

use crate::api::{Column, Priority, Task, User};
use crate::board::{TaskDraft, TaskUpdate};
use crate::utils::validation::{self, FieldError};

/// Specifying the focused task form field.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TaskField {
    Title,
    Description,
    Priority,
    Column,
    Assignee,
}

impl TaskField {
    const ORDER: [TaskField; 5] = [
        TaskField::Title,
        TaskField::Description,
        TaskField::Priority,
        TaskField::Column,
        TaskField::Assignee,
    ];

    fn position(&self) -> usize {
        TaskField::ORDER
            .iter()
            .position(|f| f == self)
            .unwrap_or(0)
    }

    pub fn next(&self) -> TaskField {
        TaskField::ORDER[(self.position() + 1) % TaskField::ORDER.len()]
    }

    pub fn previous(&self) -> TaskField {
        let len = TaskField::ORDER.len();
        TaskField::ORDER[(self.position() + len - 1) % len]
    }

    /// Text fields take typed characters; the others cycle through choices.
    ///
    pub fn is_text(&self) -> bool {
        matches!(self, TaskField::Title | TaskField::Description)
    }
}

/// Create or edit task form.
///
#[derive(Clone, Debug, PartialEq)]
pub struct TaskForm {
    pub task_id: Option<String>, // None when creating
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub column_id: String,
    pub assignee: Option<String>,
    pub field: TaskField,
    pub error: Option<String>,
}

impl TaskForm {
    /// Empty form for a new task in the given column.
    ///
    pub fn create(column_id: &str) -> Self {
        TaskForm {
            task_id: None,
            title: String::new(),
            description: String::new(),
            priority: Priority::Medium,
            column_id: column_id.to_string(),
            assignee: None,
            field: TaskField::Title,
            error: None,
        }
    }

    /// Form prefilled from an existing task living in the given column.
    ///
    pub fn edit(task: &Task, column_id: &str) -> Self {
        TaskForm {
            task_id: Some(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
            column_id: column_id.to_string(),
            assignee: task.assignee_id().map(str::to_string),
            field: TaskField::Title,
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.task_id.is_some()
    }

    pub fn input(&mut self, c: char) {
        match self.field {
            TaskField::Title => self.title.push(c),
            TaskField::Description => self.description.push(c),
            _ => return,
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        match self.field {
            TaskField::Title => {
                self.title.pop();
            }
            TaskField::Description => {
                self.description.pop();
            }
            _ => (),
        }
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn previous_field(&mut self) {
        self.field = self.field.previous();
    }

    /// Step the focused choice field forward or backward.
    ///
    pub fn cycle(&mut self, forward: bool, columns: &[Column], users: &[User]) {
        match self.field {
            TaskField::Priority => {
                self.priority = if forward {
                    self.priority.next()
                } else {
                    self.priority.previous()
                };
            }
            TaskField::Column => {
                let ids: Vec<Option<String>> = columns.iter().map(|c| Some(c.id.clone())).collect();
                if let Some(Some(id)) = step(&ids, &Some(self.column_id.clone()), forward) {
                    self.column_id = id;
                }
            }
            TaskField::Assignee => {
                let mut ids: Vec<Option<String>> = vec![None];
                ids.extend(users.iter().map(|u| Some(u.id.clone())));
                if let Some(id) = step(&ids, &self.assignee, forward) {
                    self.assignee = id;
                }
            }
            _ => (),
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        validation::required("Title", &self.title)?;
        validation::required("Column", &self.column_id)
    }

    pub fn draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            priority: self.priority,
            column_id: self.column_id.clone(),
            assignee: self.assignee.clone(),
        }
    }

    pub fn update(&self) -> TaskUpdate {
        TaskUpdate {
            title: Some(self.title.trim().to_string()),
            description: Some(self.description.clone()),
            priority: Some(self.priority),
            assignee: Some(self.assignee.clone()),
            column_id: Some(self.column_id.clone()),
        }
    }
}

/// Next or previous element after `current`, wrapping. Unknown current
/// values start from the first element.
///
fn step<T: Clone + PartialEq>(options: &[T], current: &T, forward: bool) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let index = match options.iter().position(|o| o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    Some(options[index].clone())
}

/// New column form.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnForm {
    pub name: String,
    pub error: Option<String>,
}

impl ColumnForm {
    pub fn input(&mut self, c: char) {
        self.name.push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.name.pop();
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        validation::required("Name", &self.name)
    }
}
