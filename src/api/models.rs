//! Wire-level request and response models.
//!
//! Responses are deserialized leniently into these shapes and then validated
//! into the explicit types from `resource`, so nothing downstream ever sees a
//! half-populated record.

use super::error::ApiError;
use super::resource::{BoardSummary, Column, Organization, Priority, Task, User, UserRef};
use log::*;
use serde::{Deserialize, Serialize};

/// Identifier as sent by the API, which may be a string or a number.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    /// Canonical string form used for every identifier in the client.
    ///
    pub fn canonical(&self) -> String {
        match self {
            RawId::Text(text) => text.clone(),
            RawId::Number(number) => number.to_string(),
        }
    }
}

/// Reference to another entity, either populated or a bare identifier.
///
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Embedded {
        #[serde(rename = "_id")]
        id: RawId,
        #[serde(default)]
        name: Option<String>,
    },
    Id(RawId),
}

impl EntityRef {
    pub fn id(&self) -> String {
        match self {
            EntityRef::Embedded { id, .. } => id.canonical(),
            EntityRef::Id(id) => id.canonical(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            EntityRef::Embedded { name, .. } => name.as_deref(),
            EntityRef::Id(_) => None,
        }
    }
}

/// User reference as sent by the API.
///
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum UserRefModel {
    User(User),
    Id(RawId),
}

impl From<UserRefModel> for UserRef {
    fn from(model: UserRefModel) -> Self {
        match model {
            UserRefModel::User(user) => UserRef::User(user),
            UserRefModel::Id(id) => UserRef::Id(id.canonical()),
        }
    }
}

/// Task as sent by the API.
///
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskModel {
    #[serde(rename = "_id")]
    pub id: RawId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assignee: Option<UserRefModel>,
    #[serde(default)]
    pub board: Option<EntityRef>,
    #[serde(default, alias = "column")]
    pub column_id: Option<EntityRef>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl TaskModel {
    /// Validate into a task. An empty status falls back to the given value,
    /// which on board load is the name of the enclosing column.
    ///
    pub fn into_task(self, fallback_status: Option<&str>) -> Result<Task, ApiError> {
        let id = self.id.canonical();
        let title = self
            .title
            .ok_or_else(|| ApiError::MalformedPayload(format!("task {} has no title", id)))?;
        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => Priority::default(),
            Some(value) => Priority::parse(value).unwrap_or_else(|| {
                warn!("Task {} has unknown priority '{}', using Medium", id, value);
                Priority::default()
            }),
        };
        let status = match self.status {
            Some(status) if !status.is_empty() => status,
            _ => fallback_status.unwrap_or_default().to_string(),
        };
        Ok(Task {
            id,
            title,
            description: self.description,
            priority,
            status,
            assignee: self.assignee.map(UserRef::from),
            board_id: self.board.as_ref().map(EntityRef::id),
            column_id: self.column_id.as_ref().map(EntityRef::id),
            created_at: self.created_at,
            updated_at: self.updated_at,
            placeholder: false,
        })
    }

    /// Name of the enclosing board when the API populated it.
    ///
    pub fn board_name(&self) -> Option<String> {
        self.board
            .as_ref()
            .and_then(|b| b.name())
            .map(str::to_string)
    }
}

/// Task reference inside a column: resolved object or bare identifier.
///
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum TaskRefModel {
    Task(TaskModel),
    Id(RawId),
}

/// Column as sent by the API.
///
#[derive(Clone, Debug, Deserialize)]
pub struct ColumnModel {
    #[serde(rename = "_id")]
    pub id: RawId,
    pub name: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub tasks: Option<Vec<TaskRefModel>>,
}

impl ColumnModel {
    /// Validate into a column. Bare task identifiers become placeholder
    /// tasks until the next fetch resolves them.
    ///
    pub fn into_column(self) -> Result<Column, ApiError> {
        let id = self.id.canonical();
        let name = self.name;
        let tasks = self
            .tasks
            .unwrap_or_default()
            .into_iter()
            .map(|task| match task {
                TaskRefModel::Task(model) => model.into_task(Some(&name)).map(|mut task| {
                    task.column_id.get_or_insert_with(|| id.clone());
                    task
                }),
                TaskRefModel::Id(raw) => Ok(Task::placeholder(raw.canonical(), &name, &id)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Column {
            id,
            name,
            order: self.order,
            tasks,
        })
    }
}

/// Board as sent by `GET /api/board/{id}`, before normalization.
///
#[derive(Clone, Debug, Deserialize)]
pub struct BoardPayload {
    #[serde(rename = "_id")]
    pub id: RawId,
    pub name: String,
    #[serde(default, alias = "organizationId")]
    pub organization: Option<EntityRef>,
    #[serde(default)]
    pub columns: Option<Vec<ColumnModel>>,
}

/// Board listing row as sent by the API.
///
#[derive(Clone, Debug, Deserialize)]
pub struct BoardSummaryModel {
    #[serde(rename = "_id")]
    pub id: RawId,
    pub name: String,
    #[serde(default, alias = "organizationId")]
    pub organization: Option<EntityRef>,
}

impl From<BoardSummaryModel> for BoardSummary {
    fn from(model: BoardSummaryModel) -> Self {
        BoardSummary {
            id: model.id.canonical(),
            name: model.name,
            organization_id: model.organization.as_ref().map(EntityRef::id),
        }
    }
}

/// Organization as sent by the API.
///
#[derive(Clone, Debug, Deserialize)]
pub struct OrganizationModel {
    #[serde(rename = "_id")]
    pub id: RawId,
    pub name: String,
    #[serde(default)]
    pub owner: Option<UserRefModel>,
    #[serde(default)]
    pub members: Option<Vec<UserRefModel>>,
}

impl From<OrganizationModel> for Organization {
    fn from(model: OrganizationModel) -> Self {
        Organization {
            id: model.id.canonical(),
            name: model.name,
            owner: model.owner.map(UserRef::from),
            members: model
                .members
                .unwrap_or_default()
                .into_iter()
                .map(UserRef::from)
                .collect(),
        }
    }
}

/// Generic `{ "message": ... }` response.
///
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    #[serde(rename = "newPassword")]
    pub new_password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NameRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest<'a> {
    pub name: &'a str,
    pub organization_id: &'a str,
}

/// Partial profile update. Only supplied fields are sent.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// Body of `POST /api/tasks`.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: String,
    pub column_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

/// Body of `PUT /api/tasks/{id}`. Absent fields are left untouched by the
/// server; `assignee: Some(None)` is sent as `null` to unassign.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Option<String>>,
}

/// Body of `POST /api/column/{boardId}/move-task`.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskRequest {
    pub task_id: String,
    pub source_column_id: String,
    pub destination_column_id: String,
    pub source_index: usize,
    pub destination_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_id_canonical() {
        let text: RawId = serde_json::from_value(json!("65f0c1")).unwrap();
        let number: RawId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(text.canonical(), "65f0c1");
        assert_eq!(number.canonical(), "42");
    }

    #[test]
    fn test_task_ref_resolves_object_or_id() {
        let refs: Vec<TaskRefModel> = serde_json::from_value(json!([
            { "_id": 7, "title": "Fix bug", "priority": "HIGH" },
            "abc123",
            99
        ]))
        .unwrap();
        assert!(matches!(refs[0], TaskRefModel::Task(_)));
        assert!(matches!(&refs[1], TaskRefModel::Id(id) if id.canonical() == "abc123"));
        assert!(matches!(&refs[2], TaskRefModel::Id(id) if id.canonical() == "99"));
    }

    #[test]
    fn test_task_model_into_task_defaults() {
        let model: TaskModel = serde_json::from_value(json!({
            "_id": 7,
            "title": "Fix bug",
            "assignee": { "_id": "u1", "name": "Ada", "email": "ada@example.com" }
        }))
        .unwrap();
        let task = model.into_task(Some("To Do")).unwrap();
        assert_eq!(task.id, "7");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, "To Do");
        assert_eq!(task.assignee_id(), Some("u1"));
        assert!(!task.placeholder);
    }

    #[test]
    fn test_task_model_unknown_priority_defaults_to_medium() {
        let model: TaskModel = serde_json::from_value(json!({
            "_id": "t1",
            "title": "Fix bug",
            "priority": "urgent"
        }))
        .unwrap();
        let task = model.into_task(None).unwrap();
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_task_model_rejects_missing_title() {
        let model: TaskModel = serde_json::from_value(json!({ "_id": "t1" })).unwrap();
        assert!(model.into_task(None).is_err());
    }

    #[test]
    fn test_task_model_bare_assignee_and_board() {
        let model: TaskModel = serde_json::from_value(json!({
            "_id": "t1",
            "title": "Write docs",
            "assignee": "u9",
            "board": { "_id": "b1", "name": "Roadmap" },
            "status": "done"
        }))
        .unwrap();
        assert_eq!(model.board_name().as_deref(), Some("Roadmap"));
        let task = model.into_task(Some("To Do")).unwrap();
        assert_eq!(task.assignee, Some(UserRef::Id("u9".to_string())));
        assert_eq!(task.board_id.as_deref(), Some("b1"));
        assert_eq!(task.status, "done");
    }

    #[test]
    fn test_column_into_column_materializes_placeholders() {
        let model: ColumnModel = serde_json::from_value(json!({
            "_id": "c1",
            "name": "In Progress",
            "order": 1,
            "tasks": [
                "t1",
                { "_id": "t2", "title": "Ship it", "status": "" }
            ]
        }))
        .unwrap();
        let column = model.into_column().unwrap();
        assert_eq!(column.tasks.len(), 2);

        let placeholder = &column.tasks[0];
        assert!(placeholder.placeholder);
        assert_eq!(placeholder.title, "Loading...");
        assert_eq!(placeholder.status, "In Progress");
        assert_eq!(placeholder.priority, Priority::Medium);

        let resolved = &column.tasks[1];
        assert_eq!(resolved.status, "In Progress");
        assert_eq!(resolved.column_id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_column_tasks_null_is_empty() {
        let model: ColumnModel =
            serde_json::from_value(json!({ "_id": 3, "name": "Done", "tasks": null })).unwrap();
        let column = model.into_column().unwrap();
        assert_eq!(column.id, "3");
        assert!(column.tasks.is_empty());
    }

    #[test]
    fn test_task_patch_serializes_only_supplied_fields() {
        let patch = TaskPatch {
            title: Some("New title".to_string()),
            assignee: Some(None),
            ..TaskPatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "title": "New title", "assignee": null }));
    }

    #[test]
    fn test_move_task_request_is_camel_case() {
        let request = MoveTaskRequest {
            task_id: "t1".to_string(),
            source_column_id: "c1".to_string(),
            destination_column_id: "c2".to_string(),
            source_index: 0,
            destination_index: 3,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "taskId": "t1",
                "sourceColumnId": "c1",
                "destinationColumnId": "c2",
                "sourceIndex": 0,
                "destinationIndex": 3
            })
        );
    }

    #[test]
    fn test_organization_members_mixed_refs() {
        let model: OrganizationModel = serde_json::from_value(json!({
            "_id": "o1",
            "name": "Acme",
            "owner": "u1",
            "members": ["u1", { "_id": "u2", "name": "Bob", "email": "bob@example.com" }]
        }))
        .unwrap();
        let org = Organization::from(model);
        assert_eq!(org.members.len(), 2);
        assert_eq!(org.members[1].name(), Some("Bob"));
        assert_eq!(org.owner.as_ref().map(UserRef::id), Some("u1"));
    }
}
