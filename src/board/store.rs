//! Board state store.
//!
//! Holds the authoritative column and task lists for the mounted board view
//! along with its loading flags. Fetch results are tagged with the mount
//! generation they were requested under; anything older than the current
//! generation is dropped on arrival.

use crate::api::{ApiError, Board, BoardPayload, Column, ColumnModel, Task, TaskPatch, UserRef};

/// Why the last visible load failed.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadFailure {
    NotFound,
    Network(String),
}

/// Mutable board state for one board view.
///
#[derive(Clone, Debug, Default)]
pub struct BoardStore {
    board: Option<Board>,
    loading: bool,
    silent_loading: bool,
    load_failed: Option<LoadFailure>,
    mounted: bool,
    generation: u64,
}

impl BoardStore {
    pub fn new() -> Self {
        BoardStore::default()
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn board_mut(&mut self) -> Option<&mut Board> {
        self.board.as_mut()
    }

    pub fn columns(&self) -> &[Column] {
        self.board.as_ref().map(|b| b.columns.as_slice()).unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_silent_loading(&self) -> bool {
        self.silent_loading
    }

    pub fn load_failed(&self) -> Option<&LoadFailure> {
        self.load_failed.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a fresh view lifetime. Previous state is dropped.
    ///
    pub fn mount(&mut self) -> &mut Self {
        self.generation += 1;
        self.mounted = true;
        self.board = None;
        self.load_failed = None;
        self.loading = false;
        self.silent_loading = false;
        self
    }

    /// End the view lifetime. In-flight fetches will be discarded.
    ///
    pub fn unmount(&mut self) -> &mut Self {
        self.generation += 1;
        self.mounted = false;
        self.board = None;
        self.loading = false;
        self.silent_loading = false;
        self
    }

    /// Mark a fetch as started and return the generation to tag it with.
    /// A silent fetch leaves the visible loading flag untouched.
    ///
    pub fn begin_load(&mut self, silent: bool) -> u64 {
        if silent {
            self.silent_loading = true;
        } else {
            self.loading = true;
        }
        self.generation
    }

    /// Apply a fetch result. Returns false when the result was discarded
    /// because the view unmounted or remounted since the fetch began.
    ///
    pub fn finish_load(
        &mut self,
        generation: u64,
        silent: bool,
        result: Result<Board, LoadFailure>,
    ) -> bool {
        if generation != self.generation || !self.mounted {
            return false;
        }
        if silent {
            self.silent_loading = false;
        } else {
            self.loading = false;
        }
        match result {
            Ok(board) => {
                self.board = Some(board);
                self.load_failed = None;
            }
            // A failed background refresh keeps what is on screen
            Err(failure) if silent && self.board.is_some() => {
                log::warn!("Silent board refresh failed: {:?}", failure);
            }
            Err(failure) => {
                self.load_failed = Some(failure);
            }
        }
        true
    }
}

/// Build a board from the fetch payload: columns sorted ascending by order,
/// identifiers canonicalized, unresolved task references materialized as
/// placeholders.
///
pub fn normalize(payload: BoardPayload) -> Result<Board, ApiError> {
    let mut columns = payload
        .columns
        .unwrap_or_default()
        .into_iter()
        .map(ColumnModel::into_column)
        .collect::<Result<Vec<_>, _>>()?;
    columns.sort_by_key(|c| c.order);

    Ok(Board {
        id: payload.id.canonical(),
        name: payload.name,
        organization_id: payload.organization.as_ref().map(|o| o.id()),
        columns,
    })
}

impl Board {
    /// Position of the task as (column index, task index).
    ///
    pub fn locate_task(&self, task_id: &str) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(ci, column)| {
            column
                .tasks
                .iter()
                .position(|t| t.id == task_id)
                .map(|ti| (ci, ti))
        })
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.locate_task(task_id)
            .map(|(ci, ti)| &self.columns[ci].tasks[ti])
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    /// Column currently holding the task.
    ///
    pub fn column_of(&self, task_id: &str) -> Option<&Column> {
        self.locate_task(task_id).map(|(ci, _)| &self.columns[ci])
    }

    /// Append a task to the end of a column. Returns false if the column is
    /// not on the board.
    ///
    pub fn insert_task(&mut self, column_id: &str, mut task: Task) -> bool {
        match self.columns.iter_mut().find(|c| c.id == column_id) {
            Some(column) => {
                task.column_id = Some(column.id.clone());
                column.tasks.push(task);
                true
            }
            None => false,
        }
    }

    pub fn remove_task(&mut self, task_id: &str) -> Option<Task> {
        let (ci, ti) = self.locate_task(task_id)?;
        Some(self.columns[ci].tasks.remove(ti))
    }

    /// Merge supplied fields into the task wherever it lives.
    ///
    pub fn merge_task(&mut self, task_id: &str, patch: &TaskPatch) -> bool {
        let (ci, ti) = match self.locate_task(task_id) {
            Some(position) => position,
            None => return false,
        };
        let task = &mut self.columns[ci].tasks[ti];
        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = Some(description.clone());
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = &patch.status {
            task.status = status.clone();
        }
        if let Some(assignee) = &patch.assignee {
            task.assignee = match assignee {
                Some(id) if task.assignee_id() == Some(id.as_str()) => task.assignee.take(),
                Some(id) => Some(UserRef::Id(id.clone())),
                None => None,
            };
        }
        true
    }

    /// Move a task from one column to the end of another, setting its
    /// status to the destination column's name. Returns the source index
    /// and the destination index it was appended at.
    ///
    pub fn relocate_task(
        &mut self,
        task_id: &str,
        from_column: &str,
        to_column: &str,
    ) -> Option<(usize, usize)> {
        let from = self.column_index(from_column)?;
        let to = self.column_index(to_column)?;
        let source_index = self.columns[from]
            .tasks
            .iter()
            .position(|t| t.id == task_id)?;

        let mut task = self.columns[from].tasks.remove(source_index);
        let destination = &mut self.columns[to];
        task.status = destination.name.clone();
        task.column_id = Some(destination.id.clone());
        let destination_index = destination.tasks.len();
        destination.tasks.push(task);
        Some((source_index, destination_index))
    }

    /// Append a column to the right end of the board.
    ///
    pub fn push_column(&mut self, mut column: Column) {
        if let Some(last) = self.columns.last() {
            column.order = column.order.max(last.order + 1);
        }
        self.columns.push(column);
    }

    /// Remove a column together with its tasks.
    ///
    pub fn remove_column(&mut self, column_id: &str) -> Option<Column> {
        let index = self.column_index(column_id)?;
        Some(self.columns.remove(index))
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}
