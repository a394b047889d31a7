//! Persistence seam.
//!
//! Registries talk to a `dyn Store` and never to a concrete backend. The process
//! creates exactly one store at startup (see `main.rs`) and shares it through
//! `web::Data<dyn Store>`. Every method is a single round-trip; nothing here spans
//! more than one record, so callers that check-then-write are not atomic.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::fmt;

use crate::models::{
    NewProject, NewTask, NewUser, Project, ProjectPatch, RecordId, Task, TaskPatch, User,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Failures reported by a store backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the human name of the field.
    Duplicate(&'static str),
    /// Any other constraint rejected the write.
    Invalid(String),
    /// The backend itself failed.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Duplicate(field) => write!(f, "{} already exists", field),
            StoreError::Invalid(msg) => write!(f, "constraint violated: {}", msg),
            StoreError::Backend(msg) => write!(f, "store failure: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user(&self, id: &RecordId) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn insert_project(&self, project: NewProject) -> Result<Project, StoreError>;
    async fn find_project(&self, id: &RecordId) -> Result<Option<Project>, StoreError>;
    /// All projects in creation order.
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
    async fn list_projects_by_owner(&self, owner: &RecordId) -> Result<Vec<Project>, StoreError>;
    /// Returns `None` if the project vanished before the write.
    async fn update_project(
        &self,
        id: &RecordId,
        patch: ProjectPatch,
    ) -> Result<Option<Project>, StoreError>;
    /// Returns whether a row was removed.
    async fn delete_project(&self, id: &RecordId) -> Result<bool, StoreError>;

    /// Inserts with status `pending`.
    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError>;
    async fn find_task(&self, id: &RecordId) -> Result<Option<Task>, StoreError>;
    async fn list_tasks_by_project(&self, project_id: &RecordId) -> Result<Vec<Task>, StoreError>;
    async fn list_tasks_by_assignee(&self, user_id: &RecordId) -> Result<Vec<Task>, StoreError>;
    async fn update_task(&self, id: &RecordId, patch: TaskPatch)
        -> Result<Option<Task>, StoreError>;
    async fn delete_task(&self, id: &RecordId) -> Result<bool, StoreError>;
}
