use crate::board::{
    BoardController, BoardError, DragEnd, DropLocation, MutationOutcome, ReorderSink, TaskDraft,
    TaskUpdate,
};
use crate::state::State;
use anyhow::Result;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    LoadBoard,
    Reload { silent: bool },
    CreateTask(TaskDraft),
    UpdateTask { task_id: String, update: TaskUpdate },
    DeleteTask { task_id: String },
    MoveTask(DragEnd),
    CreateColumn { name: String },
    DeleteColumn { column_id: String },
    FetchUsers,
    SearchTasks { query: String },
    Unmount,
}

/// Finished keyboard or mouse drags are queued for the network thread.
///
impl ReorderSink for std::sync::mpsc::Sender<Event> {
    fn on_reorder(&self, task_id: &str, from: DropLocation, to: Option<DropLocation>) {
        let drag = DragEnd {
            task_id: task_id.to_string(),
            source: from,
            destination: to,
        };
        if let Err(e) = self.send(Event::MoveTask(drag)) {
            error!("Failed to queue move of task {}: {}", task_id, e);
        }
    }
}

/// Specify struct for managing state with network events.
///
#[derive(Clone)]
pub struct Handler {
    state: Arc<Mutex<State>>,
    controller: BoardController,
}

impl Handler {
    /// Return new instance with reference to state.
    ///
    pub fn new(state: Arc<Mutex<State>>, controller: BoardController) -> Self {
        Handler { state, controller }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&self, event: Event) -> Result<()> {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::LoadBoard => self.load_board().await?,
            Event::Reload { silent } => self.reload(silent).await?,
            Event::CreateTask(draft) => {
                let outcome = self.controller.create_task(draft).await;
                self.report("create task", outcome).await;
            }
            Event::UpdateTask { task_id, update } => {
                let outcome = self.controller.update_task(&task_id, update).await;
                self.report("update task", outcome).await;
            }
            Event::DeleteTask { task_id } => {
                let outcome = self.controller.delete_task(&task_id).await;
                self.report("delete task", outcome).await;
            }
            Event::MoveTask(drag) => {
                let outcome = self.controller.move_task(drag).await;
                self.report("move task", outcome).await;
            }
            Event::CreateColumn { name } => {
                let outcome = self.controller.create_column(&name).await;
                self.report("create column", outcome).await;
            }
            Event::DeleteColumn { column_id } => {
                let outcome = self.controller.delete_column(&column_id).await;
                self.report("delete column", outcome).await;
            }
            Event::FetchUsers => self.fetch_users().await?,
            Event::SearchTasks { query } => self.search_tasks(query).await?,
            Event::Unmount => self.controller.unmount().await,
        }
        Ok(())
    }

    /// Mount the board view and fetch the board.
    ///
    async fn load_board(&self) -> Result<()> {
        info!("Loading board {}...", self.controller.board_id());
        match self.controller.mount().await {
            Ok(()) => {
                info!("Loaded board {}.", self.controller.board_id());
                Ok(())
            }
            Err(e) => {
                self.set_status(&e.to_string()).await;
                Err(e.into())
            }
        }
    }

    async fn reload(&self, silent: bool) -> Result<()> {
        if let Err(e) = self.controller.reload(silent).await {
            if !silent {
                self.set_status(&e.to_string()).await;
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Update state with users available for assignment.
    ///
    async fn fetch_users(&self) -> Result<()> {
        info!("Fetching users...");
        let users = self.controller.api().users().await?;
        info!("Received {} users.", users.len());
        let mut state = self.state.lock().await;
        state.set_users(users);
        Ok(())
    }

    /// Update state with search results for the finder.
    ///
    async fn search_tasks(&self, query: String) -> Result<()> {
        let hits = self.controller.api().search_tasks(&query).await?;
        let mut state = self.state.lock().await;
        state.set_finder_results(&query, hits);
        Ok(())
    }

    /// Surface the result of a mutation on the status line.
    ///
    async fn report(&self, action: &str, outcome: Result<MutationOutcome, BoardError>) {
        match outcome {
            Ok(MutationOutcome::Applied) => {
                info!("Completed {}.", action);
                self.clear_status().await;
            }
            Ok(MutationOutcome::Skipped) => debug!("Nothing to do for {}.", action),
            Ok(MutationOutcome::Resynced) => {
                self.set_status(&format!("Could not {}; board reloaded", action))
                    .await;
            }
            Err(e) => {
                warn!("Rejected {}: {}", action, e);
                self.set_status(&e.to_string()).await;
            }
        }
    }

    async fn set_status(&self, message: &str) {
        self.state.lock().await.set_status_message(message);
    }

    async fn clear_status(&self) {
        self.state.lock().await.clear_status_message();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Api;
    use crate::session::Session;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::sync::mpsc;
    use std::time::Duration;

    fn handler(server: &MockServer) -> (Handler, Arc<Mutex<State>>) {
        let api = Api::new(&server.base_url(), Session::in_memory());
        let controller =
            BoardController::new(api, "b1").with_reload_delay(Duration::from_secs(3600));
        let state = Arc::new(Mutex::new(State::default()));
        (Handler::new(state.clone(), controller), state)
    }

    fn board_json() -> serde_json::Value {
        json!({
            "_id": "b1",
            "name": "Roadmap",
            "columns": [
                { "_id": "c1", "name": "To Do", "order": 0, "tasks": [
                    { "_id": "t1", "title": "Fix bug", "priority": "high", "status": "To Do" }
                ]},
                { "_id": "c2", "name": "Done", "order": 1, "tasks": [] }
            ]
        })
    }

    #[test]
    fn sender_forwards_reorder_as_move_event() {
        let (tx, rx) = mpsc::channel();
        tx.on_reorder(
            "t1",
            DropLocation::new("c1", 0),
            Some(DropLocation::new("c2", 0)),
        );
        match rx.try_recv().unwrap() {
            Event::MoveTask(drag) => {
                assert_eq!(drag.task_id, "t1");
                assert_eq!(drag.destination, Some(DropLocation::new("c2", 0)));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn load_board_mounts_controller() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;

        let (handler, _) = handler(&server);
        handler.handle(Event::LoadBoard).await?;
        mock.assert_async().await;

        let store = handler.controller.snapshot().await;
        assert!(store.is_mounted());
        assert_eq!(store.columns().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn load_board_not_found_sets_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(404).json_body(json!({ "message": "Board not found" }));
            })
            .await;

        let (handler, state) = handler(&server);
        assert!(handler.handle(Event::LoadBoard).await.is_err());
        let state = state.lock().await;
        assert!(state.get_status_message().unwrap().contains("b1"));
    }

    #[tokio::test]
    async fn failed_delete_reports_resync() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/board/b1");
                then.status(200).json_body(board_json());
            })
            .await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/tasks/t1");
                then.status(500).json_body(json!({ "message": "boom" }));
            })
            .await;

        let (handler, state) = handler(&server);
        handler.handle(Event::LoadBoard).await?;
        handler
            .handle(Event::DeleteTask {
                task_id: "t1".to_string(),
            })
            .await?;
        delete.assert_async().await;

        let message = state.lock().await.get_status_message().map(str::to_string);
        assert_eq!(message.as_deref(), Some("Could not delete task; board reloaded"));
        let store = handler.controller.snapshot().await;
        assert_eq!(store.columns()[0].tasks.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn fetch_users_updates_state() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/auth/users");
                then.status(200).json_body(json!([
                    { "_id": "u1", "name": "Ada", "email": "ada@example.com" }
                ]));
            })
            .await;

        let (handler, state) = handler(&server);
        handler.handle(Event::FetchUsers).await?;
        let state = state.lock().await;
        assert_eq!(state.get_users().len(), 1);
        assert_eq!(state.get_users()[0].name, "Ada");
        Ok(())
    }

    #[tokio::test]
    async fn search_results_reach_finder() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/tasks/search")
                    .query_param("query", "fix");
                then.status(200).json_body(json!([
                    { "_id": "t1", "title": "Fix bug", "board": { "_id": "b1", "name": "Roadmap" } }
                ]));
            })
            .await;

        let (handler, state) = handler(&server);
        {
            let mut state = state.lock().await;
            state.open_finder();
            for c in "fix".chars() {
                state.add_finder_char(c);
            }
        }
        handler
            .handle(Event::SearchTasks {
                query: "fix".to_string(),
            })
            .await?;

        let state = state.lock().await;
        let finder = state.get_finder();
        assert_eq!(finder.results.len(), 1);
        assert_eq!(finder.results[0].board_name.as_deref(), Some("Roadmap"));
        Ok(())
    }
}
