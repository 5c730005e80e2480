//! Optimistic mutation coordinator.
//!
//! Every mutation is applied to the local store right away and then sent to
//! the server. A failed request is not rolled back piecemeal: the whole board
//! is re-fetched with the visible loading flag. A successful one schedules a
//! silent refresh a short moment later so server-side changes converge.

use super::error::BoardError;
use super::reorder::{self, DragEnd};
use super::store::{self, BoardStore, LoadFailure};
use crate::api::{Api, Column, MoveTaskRequest, NewTask, Priority, Task, TaskPatch};
use log::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_millis(300);

/// Result of a mutating action that passed validation.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Applied locally and accepted by the server
    Applied,
    /// Nothing to do
    Skipped,
    /// A request failed and the board was re-fetched
    Resynced,
}

/// Fields collected by the new task form.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub column_id: String,
    pub assignee: Option<String>,
}

/// Fields collected by the edit task form. `None` leaves a field as is;
/// `assignee: Some(None)` unassigns.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub assignee: Option<Option<String>>,
    pub column_id: Option<String>,
}

/// Coordinates the board view's local state with the API.
///
#[derive(Clone)]
pub struct BoardController {
    api: Api,
    store: Arc<Mutex<BoardStore>>,
    board_id: String,
    reload_delay: Duration,
}

impl BoardController {
    pub fn new(api: Api, board_id: &str) -> Self {
        BoardController {
            api,
            store: Arc::new(Mutex::new(BoardStore::new())),
            board_id: board_id.to_string(),
            reload_delay: DEFAULT_RELOAD_DELAY,
        }
    }

    pub fn with_reload_delay(mut self, delay: Duration) -> Self {
        self.reload_delay = delay;
        self
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    /// Shared handle to the store for readers such as the renderer.
    ///
    pub fn store(&self) -> Arc<Mutex<BoardStore>> {
        self.store.clone()
    }

    /// Copy of the current store contents.
    ///
    pub async fn snapshot(&self) -> BoardStore {
        self.store.lock().await.clone()
    }

    /// Start the view lifetime and fetch the board.
    ///
    pub async fn mount(&self) -> Result<(), BoardError> {
        self.store.lock().await.mount();
        self.reload(false).await
    }

    /// End the view lifetime. Responses still in flight are discarded.
    ///
    pub async fn unmount(&self) {
        self.store.lock().await.unmount();
        debug!("Board {} unmounted", self.board_id);
    }

    /// Fetch the board. A silent reload does not flip the loading flag.
    ///
    pub async fn reload(&self, silent: bool) -> Result<(), BoardError> {
        let generation = self.store.lock().await.begin_load(silent);
        debug!(
            "Fetching board {} ({})...",
            self.board_id,
            if silent { "silent" } else { "visible" }
        );

        let result = match self.api.board(&self.board_id).await {
            Ok(payload) => store::normalize(payload).map_err(BoardError::Network),
            Err(e) => Err(BoardError::from_load(e, &self.board_id)),
        };
        let applied = {
            let outcome = match &result {
                Ok(board) => Ok(board.clone()),
                Err(BoardError::NotFound { .. }) => Err(LoadFailure::NotFound),
                Err(e) => Err(LoadFailure::Network(e.to_string())),
            };
            self.store
                .lock()
                .await
                .finish_load(generation, silent, outcome)
        };
        if !applied {
            debug!("Discarded stale fetch of board {}", self.board_id);
        }
        result.map(|_| ())
    }

    /// Create a task at the end of the draft's column.
    ///
    pub async fn create_task(&self, draft: TaskDraft) -> Result<MutationOutcome, BoardError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(BoardError::Validation("Task title is required".to_string()));
        }
        if draft.column_id.is_empty() {
            return Err(BoardError::Validation("Task column is required".to_string()));
        }
        let status = {
            let store = self.store.lock().await;
            match store.board().and_then(|b| b.column(&draft.column_id)) {
                Some(column) => column.name.clone(),
                None => {
                    debug!("Column {} is not on the board, skipping create", draft.column_id);
                    return Ok(MutationOutcome::Skipped);
                }
            }
        };

        let request = NewTask {
            title: title.to_string(),
            description: draft.description.clone(),
            priority: draft.priority,
            status,
            column_id: draft.column_id.clone(),
            assignee: draft.assignee.clone().filter(|a| !a.is_empty()),
        };
        match self.api.create_task(&request).await {
            Ok(task) => {
                info!("Created task '{}'", task.title);
                if let Some(board) = self.store.lock().await.board_mut() {
                    board.insert_task(&draft.column_id, task);
                }
                self.schedule_silent_reload();
                Ok(MutationOutcome::Applied)
            }
            Err(e) => Ok(self.resync("Create task", e.into()).await),
        }
    }

    /// Merge the update into the task. A column change is sent as a move
    /// first and the field patch second.
    ///
    pub async fn update_task(
        &self,
        task_id: &str,
        update: TaskUpdate,
    ) -> Result<MutationOutcome, BoardError> {
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(BoardError::Validation("Task title is required".to_string()));
            }
        }

        let (move_request, patch) = {
            let mut store = self.store.lock().await;
            let board = match store.board_mut() {
                Some(board) => board,
                None => return Ok(MutationOutcome::Skipped),
            };
            let current_column = match board.column_of(task_id) {
                Some(column) => column.id.clone(),
                None => {
                    debug!("Task {} is not on the board, skipping update", task_id);
                    return Ok(MutationOutcome::Skipped);
                }
            };
            let target_column = update
                .column_id
                .clone()
                .unwrap_or_else(|| current_column.clone());
            let target_name = match board.column(&target_column) {
                Some(column) => column.name.clone(),
                None => {
                    debug!("Column {} is not on the board, skipping update", target_column);
                    return Ok(MutationOutcome::Skipped);
                }
            };

            let mut move_request = None;
            if target_column != current_column {
                if let Some((source_index, destination_index)) =
                    board.relocate_task(task_id, &current_column, &target_column)
                {
                    move_request = Some(MoveTaskRequest {
                        task_id: task_id.to_string(),
                        source_column_id: current_column.clone(),
                        destination_column_id: target_column.clone(),
                        source_index,
                        destination_index,
                    });
                }
            }

            let patch = TaskPatch {
                title: update.title.map(|t| t.trim().to_string()),
                description: update.description,
                priority: update.priority,
                status: Some(target_name),
                assignee: update
                    .assignee
                    .map(|a| a.filter(|id| !id.is_empty())),
            };
            board.merge_task(task_id, &patch);
            (move_request, patch)
        };

        let mut failure: Option<BoardError> = None;
        if let Some(request) = &move_request {
            if let Err(e) = self.api.move_task(&self.board_id, request).await {
                error!("Failed to move task {}: {}", task_id, e);
                failure = Some(e.into());
            }
        }
        if let Err(e) = self.api.update_task(task_id, &patch).await {
            failure = Some(e.into());
        }

        match failure {
            Some(e) => Ok(self.resync("Update task", e).await),
            None => {
                info!("Updated task {}", task_id);
                self.schedule_silent_reload();
                Ok(MutationOutcome::Applied)
            }
        }
    }

    /// Remove the task locally if present and always ask the server to
    /// delete it.
    ///
    pub async fn delete_task(&self, task_id: &str) -> Result<MutationOutcome, BoardError> {
        if let Some(board) = self.store.lock().await.board_mut() {
            if board.remove_task(task_id).is_none() {
                debug!("Task {} was not on the board", task_id);
            }
        }
        match self.api.delete_task(task_id).await {
            Ok(()) => {
                info!("Deleted task {}", task_id);
                self.schedule_silent_reload();
                Ok(MutationOutcome::Applied)
            }
            Err(e) => Ok(self.resync("Delete task", e.into()).await),
        }
    }

    /// Apply a finished drag gesture.
    ///
    pub async fn move_task(&self, drag: DragEnd) -> Result<MutationOutcome, BoardError> {
        let request = {
            let mut store = self.store.lock().await;
            let board = match store.board_mut() {
                Some(board) => board,
                None => return Ok(MutationOutcome::Skipped),
            };
            let request = match reorder::resolve(board, &drag) {
                Some(request) => request,
                None => return Ok(MutationOutcome::Skipped),
            };
            board.relocate_task(
                &request.task_id,
                &request.source_column_id,
                &request.destination_column_id,
            );
            request
        };

        match self.api.move_task(&self.board_id, &request).await {
            Ok(()) => {
                info!(
                    "Moved task {} to column {}",
                    request.task_id, request.destination_column_id
                );
                self.schedule_silent_reload();
                Ok(MutationOutcome::Applied)
            }
            Err(e) => Ok(self.resync("Move task", e.into()).await),
        }
    }

    /// Create a column at the right end of the board.
    ///
    pub async fn create_column(&self, name: &str) -> Result<MutationOutcome, BoardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BoardError::Validation("Column name is required".to_string()));
        }
        match self.api.create_column(&self.board_id, name).await {
            Ok(created) => {
                info!("Created column '{}'", created.name);
                if let Some(board) = self.store.lock().await.board_mut() {
                    board.push_column(Column {
                        tasks: vec![],
                        ..created
                    });
                }
                self.schedule_silent_reload();
                Ok(MutationOutcome::Applied)
            }
            Err(e) => Ok(self.resync("Create column", e.into()).await),
        }
    }

    /// Remove a column and its tasks locally, then on the server.
    ///
    pub async fn delete_column(&self, column_id: &str) -> Result<MutationOutcome, BoardError> {
        if let Some(board) = self.store.lock().await.board_mut() {
            if let Some(column) = board.remove_column(column_id) {
                debug!(
                    "Removed column '{}' with {} tasks",
                    column.name,
                    column.tasks.len()
                );
            }
        }
        match self.api.delete_column(&self.board_id, column_id).await {
            Ok(()) => {
                info!("Deleted column {}", column_id);
                self.schedule_silent_reload();
                Ok(MutationOutcome::Applied)
            }
            Err(e) => Ok(self.resync("Delete column", e.into()).await),
        }
    }

    /// Copy of a task on the loaded board.
    ///
    pub async fn task(&self, task_id: &str) -> Option<Task> {
        self.store
            .lock()
            .await
            .board()
            .and_then(|b| b.task(task_id).cloned())
    }

    /// Refresh quietly once the server has settled.
    ///
    fn schedule_silent_reload(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(controller.reload_delay).await;
            if let Err(e) = controller.reload(true).await {
                warn!("Background refresh of board {} failed: {}", controller.board_id, e);
            }
        });
    }

    /// Recover from a failed mutation by re-fetching the whole board.
    ///
    async fn resync(&self, action: &str, error: BoardError) -> MutationOutcome {
        error!("{} failed: {}. Reloading board...", action, error);
        if let Err(e) = self.reload(false).await {
            error!("Reload of board {} failed: {}", self.board_id, e);
        }
        MutationOutcome::Resynced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::reorder::DropLocation;
    use crate::session::Session;
    use httpmock::prelude::*;
    use serde_json::json;

    fn board_json() -> serde_json::Value {
        json!({
            "_id": "b1",
            "name": "Roadmap",
            "organization": "o1",
            "columns": [
                { "_id": "c2", "name": "In Progress", "order": 1, "tasks": [
                    { "_id": "t3", "title": "Refactor parser", "priority": "medium", "status": "in-progress" }
                ]},
                { "_id": "c1", "name": "To Do", "order": 0, "tasks": [
                    { "_id": "t1", "title": "Fix bug", "priority": "high", "status": "To Do" },
                    { "_id": "t2", "title": "Write docs", "priority": "low", "status": "To Do" }
                ]},
                { "_id": "c3", "name": "Done", "order": 2, "tasks": [] }
            ]
        })
    }

    fn controller(server: &MockServer) -> BoardController {
        let api = Api::new(&server.base_url(), Session::in_memory());
        // Keep background refreshes out of the way unless a test waits for one
        BoardController::new(api, "b1").with_reload_delay(Duration::from_secs(3600))
    }

    async fn mounted(server: &MockServer) -> BoardController {
        let controller = controller(server);
        controller.mount().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn mount_loads_sorted_board() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;

        let controller = mounted(&server).await;
        mock.assert_async().await;

        let store = controller.snapshot().await;
        assert!(!store.is_loading());
        let names: Vec<String> = store.columns().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["To Do", "In Progress", "Done"]);
    }

    #[tokio::test]
    async fn mount_not_found_is_terminal() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(404).json_body(json!({ "message": "Board not found" }));
            })
            .await;

        let controller = controller(&server);
        let err = controller.mount().await.unwrap_err();
        assert!(matches!(err, BoardError::NotFound { kind: "Board", .. }));
        assert_eq!(
            controller.snapshot().await.load_failed(),
            Some(&LoadFailure::NotFound)
        );
    }

    #[tokio::test]
    async fn failed_move_resyncs_to_server_state() {
        let server = MockServer::start_async().await;
        let board = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;
        let moved = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/column/b1/move-task");
                then.status(500).json_body(json!({ "message": "Server error" }));
            })
            .await;

        let controller = mounted(&server).await;
        let outcome = controller
            .move_task(DragEnd {
                task_id: "t1".to_string(),
                source: DropLocation::new("c1", 0),
                destination: Some(DropLocation::new("c3", 0)),
            })
            .await
            .unwrap();

        assert_eq!(outcome, MutationOutcome::Resynced);
        moved.assert_async().await;
        board.assert_hits_async(2).await;

        let fresh = store::normalize(serde_json::from_value(board_json()).unwrap()).unwrap();
        assert_eq!(controller.snapshot().await.board(), Some(&fresh));
    }

    #[tokio::test]
    async fn move_applies_locally_then_refreshes_silently() {
        let server = MockServer::start_async().await;
        let board = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;
        let moved = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/column/b1/move-task")
                    .json_body(json!({
                        "taskId": "t1",
                        "sourceColumnId": "c1",
                        "destinationColumnId": "c3",
                        "sourceIndex": 0,
                        "destinationIndex": 0
                    }));
                then.status(200).json_body(json!({ "message": "Task moved" }));
            })
            .await;

        let api = Api::new(&server.base_url(), Session::in_memory());
        let controller =
            BoardController::new(api, "b1").with_reload_delay(Duration::from_millis(20));
        controller.mount().await.unwrap();

        let outcome = controller
            .move_task(DragEnd {
                task_id: "t1".to_string(),
                source: DropLocation::new("c1", 0),
                destination: Some(DropLocation::new("c3", 0)),
            })
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Applied);
        moved.assert_async().await;

        {
            let store = controller.snapshot().await;
            let done = store.board().and_then(|b| b.column("c3")).unwrap();
            assert_eq!(done.tasks.len(), 1);
            assert_eq!(done.tasks[0].status, "Done");
        }

        tokio::time::sleep(Duration::from_millis(300)).await;
        board.assert_hits_async(2).await;
        assert!(!controller.snapshot().await.is_silent_loading());
    }

    #[tokio::test]
    async fn drop_without_destination_is_skipped() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;
        let moved = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/column/b1/move-task");
                then.status(200);
            })
            .await;

        let controller = mounted(&server).await;
        let outcome = controller
            .move_task(DragEnd {
                task_id: "t1".to_string(),
                source: DropLocation::new("c1", 0),
                destination: None,
            })
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Skipped);
        moved.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn create_task_requires_title() {
        let server = MockServer::start_async().await;
        let created = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/tasks");
                then.status(201);
            })
            .await;

        let controller = controller(&server);
        let err = controller
            .create_task(TaskDraft {
                title: "   ".to_string(),
                column_id: "c1".to_string(),
                ..TaskDraft::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
        created.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn create_task_appends_to_column() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;
        let created = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/tasks").json_body(json!({
                    "title": "Plan sprint",
                    "description": "",
                    "priority": "medium",
                    "status": "In Progress",
                    "columnId": "c2",
                    "assignee": "u1"
                }));
                then.status(201).json_body(json!({
                    "_id": 77,
                    "title": "Plan sprint",
                    "description": "",
                    "priority": "medium",
                    "status": "In Progress",
                    "assignee": "u1"
                }));
            })
            .await;

        let controller = mounted(&server).await;
        let outcome = controller
            .create_task(TaskDraft {
                title: "Plan sprint".to_string(),
                column_id: "c2".to_string(),
                assignee: Some("u1".to_string()),
                ..TaskDraft::default()
            })
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Applied);
        created.assert_async().await;

        let task = controller.task("77").await.unwrap();
        assert_eq!(task.assignee_id(), Some("u1"));
        let store = controller.snapshot().await;
        let column = store.board().and_then(|b| b.column("c2")).unwrap();
        assert_eq!(column.tasks.last().map(|t| t.id.as_str()), Some("77"));
    }

    #[tokio::test]
    async fn update_task_moves_before_patching() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;
        let moved = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/column/b1/move-task")
                    .json_body(json!({
                        "taskId": "t2",
                        "sourceColumnId": "c1",
                        "destinationColumnId": "c2",
                        "sourceIndex": 1,
                        "destinationIndex": 1
                    }));
                then.status(200).json_body(json!({ "message": "Task moved" }));
            })
            .await;
        let patched = server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/tasks/t2").json_body(json!({
                    "title": "Write better docs",
                    "status": "In Progress",
                    "assignee": null
                }));
                then.status(200).json_body(json!({
                    "_id": "t2",
                    "title": "Write better docs",
                    "priority": "low",
                    "status": "In Progress"
                }));
            })
            .await;

        let controller = mounted(&server).await;
        let outcome = controller
            .update_task(
                "t2",
                TaskUpdate {
                    title: Some("Write better docs".to_string()),
                    assignee: Some(None),
                    column_id: Some("c2".to_string()),
                    ..TaskUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Applied);
        moved.assert_async().await;
        patched.assert_async().await;

        let store = controller.snapshot().await;
        let board = store.board().unwrap();
        assert_eq!(board.column_of("t2").map(|c| c.id.as_str()), Some("c2"));
        let task = board.task("t2").unwrap();
        assert_eq!(task.title, "Write better docs");
        assert_eq!(task.status, "In Progress");
    }

    #[tokio::test]
    async fn update_task_failed_move_still_patches_then_resyncs() {
        let server = MockServer::start_async().await;
        let board = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/column/b1/move-task");
                then.status(500);
            })
            .await;
        let patched = server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/tasks/t1");
                then.status(200)
                    .json_body(json!({ "_id": "t1", "title": "Fix bug", "priority": "high" }));
            })
            .await;

        let controller = mounted(&server).await;
        let outcome = controller
            .update_task(
                "t1",
                TaskUpdate {
                    column_id: Some("c3".to_string()),
                    ..TaskUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Resynced);
        patched.assert_async().await;
        board.assert_hits_async(2).await;
        let store = controller.snapshot().await;
        assert_eq!(
            store.board().and_then(|b| b.column_of("t1")).map(|c| c.id.as_str()),
            Some("c1")
        );
    }

    #[tokio::test]
    async fn update_missing_task_is_skipped() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;

        let controller = mounted(&server).await;
        let outcome = controller
            .update_task("nope", TaskUpdate::default())
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Skipped);
    }

    #[tokio::test]
    async fn unknown_target_column_is_skipped() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;
        let patched = server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/tasks/t1");
                then.status(200);
            })
            .await;
        let created = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/tasks");
                then.status(201);
            })
            .await;

        let controller = mounted(&server).await;
        let before = controller.snapshot().await.board().cloned();
        let update = TaskUpdate {
            title: Some("Fix bug".to_string()),
            column_id: Some("gone".to_string()),
            ..TaskUpdate::default()
        };
        let outcome = controller.update_task("t1", update).await.unwrap();
        assert_eq!(outcome, MutationOutcome::Skipped);

        let draft = TaskDraft {
            title: "New".to_string(),
            description: String::new(),
            priority: Priority::Medium,
            column_id: "gone".to_string(),
            assignee: None,
        };
        let outcome = controller.create_task(draft).await.unwrap();
        assert_eq!(outcome, MutationOutcome::Skipped);

        patched.assert_hits_async(0).await;
        created.assert_hits_async(0).await;
        assert_eq!(controller.snapshot().await.board().cloned(), before);
    }

    #[tokio::test]
    async fn delete_missing_task_still_calls_server() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;
        let deleted = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/tasks/ghost");
                then.status(200).json_body(json!({ "message": "Task deleted" }));
            })
            .await;

        let controller = mounted(&server).await;
        let before = controller.snapshot().await.board().cloned();
        let outcome = controller.delete_task("ghost").await.unwrap();
        assert_eq!(outcome, MutationOutcome::Applied);
        deleted.assert_async().await;
        assert_eq!(controller.snapshot().await.board().cloned(), before);
    }

    #[tokio::test]
    async fn create_and_delete_column() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;
        let created = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/column/b1")
                    .json_body(json!({ "name": "Review" }));
                then.status(201)
                    .json_body(json!({ "_id": "c4", "name": "Review", "order": 3, "tasks": [] }));
            })
            .await;
        let deleted = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/column/b1/c1");
                then.status(200).json_body(json!({ "message": "Column deleted" }));
            })
            .await;

        let controller = mounted(&server).await;
        assert_eq!(
            controller.create_column("  Review ").await.unwrap(),
            MutationOutcome::Applied
        );
        assert_eq!(
            controller.delete_column("c1").await.unwrap(),
            MutationOutcome::Applied
        );
        created.assert_async().await;
        deleted.assert_async().await;

        let store = controller.snapshot().await;
        let board = store.board().unwrap();
        let names: Vec<&str> = board.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["In Progress", "Done", "Review"]);
        assert!(board.task("t1").is_none());
        assert!(board.task("t2").is_none());
        assert!(board.task("t3").is_some());
    }

    #[tokio::test]
    async fn create_column_requires_name() {
        let server = MockServer::start_async().await;
        let controller = controller(&server);
        assert!(matches!(
            controller.create_column(" ").await,
            Err(BoardError::Validation(_))
        ));
    }
}
