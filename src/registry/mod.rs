//! Ownership, role and lifecycle rules for users, projects and tasks.
//!
//! Each registry borrows the shared store for the length of one request. All input
//! checks run before the first write, so a rejected request leaves nothing behind.

pub mod identity;
pub mod projects;
pub mod tasks;

use std::collections::HashMap;

use crate::error::AppError;
use crate::models::{ProjectSummary, RecordId, UserSummary};
use crate::store::Store;

pub use identity::Identity;
pub use projects::Projects;
pub use tasks::Tasks;

fn invalid(msg: &str) -> AppError {
    AppError::ValidationError(msg.to_string())
}

/// Treats an empty string the same as a missing field.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Resolves referenced users and projects, looking each id up at most once.
///
/// Dangling references resolve to `None`.
struct Resolver<'a> {
    store: &'a dyn Store,
    users: HashMap<RecordId, Option<UserSummary>>,
    projects: HashMap<RecordId, Option<ProjectSummary>>,
}

impl<'a> Resolver<'a> {
    fn new(store: &'a dyn Store) -> Self {
        Self {
            store,
            users: HashMap::new(),
            projects: HashMap::new(),
        }
    }

    async fn user(&mut self, id: &RecordId) -> Result<Option<UserSummary>, AppError> {
        if let Some(cached) = self.users.get(id) {
            return Ok(cached.clone());
        }
        let summary = self.store.find_user(id).await?.as_ref().map(UserSummary::from);
        self.users.insert(id.clone(), summary.clone());
        Ok(summary)
    }

    async fn project(&mut self, id: &RecordId) -> Result<Option<ProjectSummary>, AppError> {
        if let Some(cached) = self.projects.get(id) {
            return Ok(cached.clone());
        }
        let summary = self
            .store
            .find_project(id)
            .await?
            .as_ref()
            .map(ProjectSummary::from);
        self.projects.insert(id.clone(), summary.clone());
        Ok(summary)
    }
}
