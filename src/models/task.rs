use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use super::{RecordId, UserSummary};

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
///
/// The usual progression is `pending → in-progress → completed`, but any value
/// may follow any other.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Pending,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a task entity as stored in the database and returned after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub project_id: RecordId,
    /// Globally unique task name.
    pub task_name: String,
    pub des: String,
    pub task_status: TaskStatus,
    /// The assigner.
    pub created_by: RecordId,
    /// The assignee. Never equal to `created_by`.
    pub created_for: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task with its assigner and assignee resolved.
///
/// `P` is the project reference: the bare id in per-project listings, a
/// [`ProjectSummary`](super::ProjectSummary) in the caller's own task list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail<P = RecordId> {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub project_id: P,
    pub task_name: String,
    pub des: String,
    pub task_status: TaskStatus,
    pub created_by: Option<UserSummary>,
    pub created_for: Option<UserSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trimmed projection returned by both update endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedTask {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub task_name: String,
    pub task_status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for UpdatedTask {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            task_name: task.task_name,
            task_status: task.task_status,
            remarks: task.remarks,
            updated_at: task.updated_at,
        }
    }
}

/// Body of `POST /task/add` and `PUT /task/{taskId}`.
///
/// Everything is optional and untyped here so that the registry can report
/// missing or malformed fields with its own messages. `taskStatus` and `remarks`
/// are only honoured by the full update.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskInput {
    pub project_id: Option<String>,
    pub task_name: Option<String>,
    pub des: Option<String>,
    pub created_for: Option<String>,
    pub task_status: Option<String>,
    pub remarks: Option<String>,
}

/// Body of `PATCH /task/statusUpdate/{taskId}`.
///
/// Values stay as raw JSON until the caller is known to be the assignee, so a
/// badly typed field never answers before the permission check does.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StatusUpdateInput {
    pub task_status: Option<serde_json::Value>,
    pub remarks: Option<serde_json::Value>,
}

impl StatusUpdateInput {
    /// Picks `taskStatus` and `remarks` out of any JSON body. Other keys, `null`
    /// values and non-object bodies contribute nothing.
    pub fn from_body(body: serde_json::Value) -> Self {
        let serde_json::Value::Object(mut fields) = body else {
            return Self::default();
        };
        let mut take = |key: &str| fields.remove(key).filter(|value| !value.is_null());
        Self {
            task_status: take("taskStatus"),
            remarks: take("remarks"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.task_status.is_none() && self.remarks.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: RecordId,
    pub task_name: String,
    pub des: String,
    pub created_by: RecordId,
    pub created_for: RecordId,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub task_name: Option<String>,
    pub task_status: Option<TaskStatus>,
    pub remarks: Option<String>,
    pub des: Option<String>,
    pub project_id: Option<RecordId>,
    pub created_for: Option<RecordId>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    pub fn apply(self, task: &mut Task) {
        if let Some(name) = self.task_name {
            task.task_name = name;
        }
        if let Some(status) = self.task_status {
            task.task_status = status;
        }
        if let Some(remarks) = self.remarks {
            task.remarks = Some(remarks);
        }
        if let Some(des) = self.des {
            task.des = des;
        }
        if let Some(project_id) = self.project_id {
            task.project_id = project_id;
        }
        if let Some(created_for) = self.created_for {
            task.created_for = created_for;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            serde_json::json!("in-progress")
        );
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);

        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("done"), None);
        assert_eq!(TaskStatus::parse("In-Progress"), None);
        assert_eq!(TaskStatus::parse(""), None);
    }

    #[test]
    fn test_patch_apply_keeps_untouched_fields() {
        let now = Utc::now();
        let mut task = Task {
            id: RecordId::generate(),
            project_id: RecordId::generate(),
            task_name: "Write docs".to_string(),
            des: "Document the public API".to_string(),
            task_status: TaskStatus::Pending,
            created_by: RecordId::generate(),
            created_for: RecordId::generate(),
            remarks: None,
            created_at: now,
            updated_at: now,
        };

        let patch = TaskPatch {
            task_status: Some(TaskStatus::Completed),
            remarks: Some("done early".to_string()),
            ..TaskPatch::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut task);

        assert_eq!(task.task_status, TaskStatus::Completed);
        assert_eq!(task.remarks.as_deref(), Some("done early"));
        assert_eq!(task.task_name, "Write docs");
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn test_status_update_input_keeps_only_its_own_keys() {
        let input =
            StatusUpdateInput::from_body(json!({ "taskName": "renamed", "createdFor": "x" }));
        assert!(input.is_empty());

        let input = StatusUpdateInput::from_body(json!({ "taskStatus": 5, "remarks": null }));
        assert_eq!(input.task_status, Some(json!(5)));
        assert_eq!(input.remarks, None);

        assert!(StatusUpdateInput::from_body(json!([1, 2])).is_empty());
        assert!(StatusUpdateInput::from_body(json!("completed")).is_empty());
    }
}
