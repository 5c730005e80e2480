mod client;
mod error;
mod models;
mod resource;

pub use client::Client;
pub use error::ApiError;
pub use models::{
    BoardPayload, ColumnModel, EntityRef, MoveTaskRequest, NewTask, ProfileUpdate, RawId,
    TaskModel, TaskPatch,
};
pub use resource::*;

use crate::session::Session;
use log::*;
use models::*;
use reqwest::Method;
use serde::Deserialize;
use std::collections::HashMap;

/// Responsible for asynchronous interaction with the Taskboard API including
/// transformation of response data into explicitly-defined types.
///
#[derive(Clone)]
pub struct Api {
    client: Client,
}

/// User payload that some endpoints wrap in `{ "user": ... }`.
///
#[derive(Deserialize)]
#[serde(untagged)]
enum UserEnvelope {
    Wrapped { user: User },
    Bare(User),
}

impl From<UserEnvelope> for User {
    fn from(envelope: UserEnvelope) -> Self {
        match envelope {
            UserEnvelope::Wrapped { user } => user,
            UserEnvelope::Bare(user) => user,
        }
    }
}

impl Api {
    /// Returns a new instance for the given base URL and session.
    ///
    pub fn new(base_url: &str, session: Session) -> Api {
        debug!("Initializing Taskboard client for {}...", base_url);
        Api {
            client: Client::new(base_url, session),
        }
    }

    pub fn session(&self) -> &Session {
        &self.client.session
    }

    // Authentication

    /// Create an account. The server does not sign the user in.
    ///
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError> {
        debug!("Registering account for {}...", email);
        let body = serde_json::to_value(RegisterRequest {
            name,
            email,
            password,
        })?;
        let user: UserEnvelope = self
            .client
            .send(Method::POST, "/api/auth/register", body)
            .await?;
        Ok(user.into())
    }

    /// Sign in and store the returned token and user in the session.
    ///
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        debug!("Signing in as {}...", email);
        let body = serde_json::to_value(LoginRequest { email, password })?;
        let auth: AuthResponse = self.client.send(Method::POST, "/api/auth/login", body).await?;
        self.client.session.set(&auth)?;
        info!("Signed in as {}", auth.user.email);
        Ok(auth)
    }

    /// Forget the stored token and user.
    ///
    pub fn logout(&self) -> Result<(), ApiError> {
        self.client.session.clear()?;
        info!("Signed out");
        Ok(())
    }

    /// Request a password reset email and return the server message.
    ///
    pub async fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        debug!("Requesting password reset for {}...", email);
        let body = serde_json::to_value(EmailRequest { email })?;
        let response: MessageResponse = self
            .client
            .send(Method::POST, "/api/auth/forgot-password", body)
            .await?;
        Ok(response.message)
    }

    pub async fn validate_reset_token(&self, token: &str) -> Result<ResetTokenStatus, ApiError> {
        debug!("Validating reset token...");
        self.client
            .get(&format!("/api/auth/validate-reset-token/{}", token), &[])
            .await
    }

    /// Set a new password with a reset token and store the returned session.
    ///
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<AuthResponse, ApiError> {
        debug!("Resetting password...");
        let body = serde_json::to_value(ResetPasswordRequest {
            token,
            new_password,
        })?;
        let auth: AuthResponse = self
            .client
            .send(Method::POST, "/api/auth/reset-password", body)
            .await?;
        self.client.session.set(&auth)?;
        Ok(auth)
    }

    /// Update the signed-in user's profile and refresh the stored user.
    ///
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        debug!("Updating profile...");
        let body = serde_json::to_value(update)?;
        let user: UserEnvelope = self
            .client
            .send(Method::PUT, "/api/auth/profile", body)
            .await?;
        let user = User::from(user);
        self.client.session.set_user(&user)?;
        Ok(user)
    }

    /// Returns every user known to the server.
    ///
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        debug!("Requesting users...");
        self.client.get("/api/auth/users", &[]).await
    }

    // Organizations

    pub async fn organizations(&self) -> Result<Vec<Organization>, ApiError> {
        debug!("Requesting organizations...");
        let data: Vec<OrganizationModel> = self.client.get("/api/organization", &[]).await?;
        Ok(data.into_iter().map(Organization::from).collect())
    }

    pub async fn create_organization(&self, name: &str) -> Result<Organization, ApiError> {
        debug!("Creating organization '{}'...", name);
        let body = serde_json::to_value(NameRequest { name })?;
        let data: OrganizationModel = self
            .client
            .send(Method::POST, "/api/organization", body)
            .await?;
        Ok(data.into())
    }

    pub async fn organization(&self, id: &str) -> Result<Organization, ApiError> {
        debug!("Requesting organization {}...", id);
        let data: OrganizationModel = self
            .client
            .get(&format!("/api/organization/{}", id), &[])
            .await?;
        Ok(data.into())
    }

    pub async fn rename_organization(&self, id: &str, name: &str) -> Result<Organization, ApiError> {
        debug!("Renaming organization {} to '{}'...", id, name);
        let body = serde_json::to_value(NameRequest { name })?;
        let data: OrganizationModel = self
            .client
            .send(Method::PUT, &format!("/api/organization/{}", id), body)
            .await?;
        Ok(data.into())
    }

    pub async fn delete_organization(&self, id: &str) -> Result<(), ApiError> {
        debug!("Deleting organization {}...", id);
        self.client
            .send_unit(Method::DELETE, &format!("/api/organization/{}", id), None)
            .await
    }

    pub async fn members(&self, organization_id: &str) -> Result<Vec<User>, ApiError> {
        debug!("Requesting members of organization {}...", organization_id);
        self.client
            .get(&format!("/api/organization/{}/members", organization_id), &[])
            .await
    }

    /// Add a member by email and return the updated organization.
    ///
    pub async fn add_member(&self, organization_id: &str, email: &str) -> Result<Organization, ApiError> {
        debug!("Adding {} to organization {}...", email, organization_id);
        let body = serde_json::to_value(EmailRequest { email })?;
        let data: OrganizationModel = self
            .client
            .send(
                Method::POST,
                &format!("/api/organization/{}/members", organization_id),
                body,
            )
            .await?;
        Ok(data.into())
    }

    pub async fn remove_member(&self, organization_id: &str, user_id: &str) -> Result<(), ApiError> {
        debug!("Removing {} from organization {}...", user_id, organization_id);
        self.client
            .send_unit(
                Method::DELETE,
                &format!("/api/organization/{}/members/{}", organization_id, user_id),
                None,
            )
            .await
    }

    // Boards

    pub async fn boards(&self, organization_id: &str) -> Result<Vec<BoardSummary>, ApiError> {
        debug!("Requesting boards for organization {}...", organization_id);
        let data: Vec<BoardSummaryModel> = self
            .client
            .get(&format!("/api/board/organization/{}", organization_id), &[])
            .await?;
        Ok(data.into_iter().map(BoardSummary::from).collect())
    }

    pub async fn create_board(&self, name: &str, organization_id: &str) -> Result<BoardSummary, ApiError> {
        debug!("Creating board '{}' in organization {}...", name, organization_id);
        let body = serde_json::to_value(CreateBoardRequest {
            name,
            organization_id,
        })?;
        let data: BoardSummaryModel = self.client.send(Method::POST, "/api/board", body).await?;
        Ok(data.into())
    }

    pub async fn delete_board(&self, id: &str) -> Result<(), ApiError> {
        debug!("Deleting board {}...", id);
        self.client
            .send_unit(Method::DELETE, &format!("/api/board/{}", id), None)
            .await
    }

    /// Returns the board with its embedded columns as sent by the server.
    ///
    pub async fn board(&self, id: &str) -> Result<BoardPayload, ApiError> {
        debug!("Requesting board {}...", id);
        self.client.get(&format!("/api/board/{}", id), &[]).await
    }

    // Columns

    pub async fn create_column(&self, board_id: &str, name: &str) -> Result<Column, ApiError> {
        debug!("Creating column '{}' on board {}...", name, board_id);
        let body = serde_json::to_value(NameRequest { name })?;
        let data: ColumnModel = self
            .client
            .send(Method::POST, &format!("/api/column/{}", board_id), body)
            .await?;
        data.into_column()
    }

    pub async fn delete_column(&self, board_id: &str, column_id: &str) -> Result<(), ApiError> {
        debug!("Deleting column {} from board {}...", column_id, board_id);
        self.client
            .send_unit(
                Method::DELETE,
                &format!("/api/column/{}/{}", board_id, column_id),
                None,
            )
            .await
    }

    /// Move a task between or within columns.
    ///
    pub async fn move_task(&self, board_id: &str, request: &MoveTaskRequest) -> Result<(), ApiError> {
        debug!(
            "Moving task {} from column {}[{}] to {}[{}]...",
            request.task_id,
            request.source_column_id,
            request.source_index,
            request.destination_column_id,
            request.destination_index
        );
        let body = serde_json::to_value(request)?;
        self.client
            .send_unit(
                Method::POST,
                &format!("/api/column/{}/move-task", board_id),
                Some(body),
            )
            .await
    }

    // Tasks

    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        debug!("Creating task '{}' in column {}...", task.title, task.column_id);
        let body = serde_json::to_value(task)?;
        let data: TaskModel = self.client.send(Method::POST, "/api/tasks", body).await?;
        let mut created = data.into_task(Some(&task.status))?;
        created.column_id.get_or_insert_with(|| task.column_id.clone());
        Ok(created)
    }

    pub async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task, ApiError> {
        debug!("Updating task {}...", id);
        let body = serde_json::to_value(patch)?;
        let data: TaskModel = self
            .client
            .send(Method::PUT, &format!("/api/tasks/{}", id), body)
            .await?;
        data.into_task(patch.status.as_deref())
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        debug!("Deleting task {}...", id);
        self.client
            .send_unit(Method::DELETE, &format!("/api/tasks/{}", id), None)
            .await
    }

    /// Returns the five most recently updated tasks.
    ///
    pub async fn recent_tasks(&self) -> Result<Vec<Task>, ApiError> {
        debug!("Requesting recent tasks...");
        let data: Vec<TaskModel> = self
            .client
            .get("/api/tasks", &[("limit", "5"), ("sort", "-updatedAt")])
            .await?;
        data.into_iter().map(|t| t.into_task(None)).collect()
    }

    /// Search tasks across boards. Hits are enriched with their board name;
    /// a failed board lookup leaves the name unknown.
    ///
    pub async fn search_tasks(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        debug!("Searching tasks for '{}'...", query);
        let data: Vec<TaskModel> = self
            .client
            .get("/api/tasks/search", &[("query", query)])
            .await?;

        let mut board_names: HashMap<String, Option<String>> = HashMap::new();
        let mut hits = Vec::with_capacity(data.len());
        for model in data {
            let embedded_name = model.board_name();
            let task = model.into_task(None)?;
            let board_name = match (embedded_name, &task.board_id) {
                (Some(name), _) => Some(name),
                (None, Some(board_id)) => {
                    if !board_names.contains_key(board_id) {
                        let name = match self.board(board_id).await {
                            Ok(board) => Some(board.name),
                            Err(e) => {
                                warn!("Failed to look up board {}: {}", board_id, e);
                                None
                            }
                        };
                        board_names.insert(board_id.clone(), name);
                    }
                    board_names.get(board_id).cloned().flatten()
                }
                (None, None) => None,
            };
            hits.push(SearchHit { task, board_name });
        }
        debug!("Search for '{}' returned {} tasks", query, hits.len());
        Ok(hits)
    }
}
