use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{RecordId, UserSummary};

/// A project as stored and as returned right after a write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// Globally unique display name.
    pub project_name: String,
    pub des: String,
    /// Owner of the project; the only user allowed to edit or delete it.
    pub created_by: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a project, without the owner and audit fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub project_name: String,
    pub des: String,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            project_name: project.project_name,
            des: project.des,
            created_at: project.created_at,
        }
    }
}

/// Entry of the global project list, with the owner resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListing {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub project_name: String,
    pub des: String,
    /// `None` if the owner account no longer exists.
    pub created_by: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
}

/// Project fields embedded in a task listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub project_name: String,
    pub des: String,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            project_name: project.project_name.clone(),
            des: project.des.clone(),
        }
    }
}

/// Body of `POST /project/add` and `PATCH /project/edit/{id}`.
///
/// Unknown keys are ignored, so owner or audit fields can never be patched in.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectInput {
    pub project_name: Option<String>,
    pub des: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub project_name: String,
    pub des: String,
    pub created_by: RecordId,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub project_name: Option<String>,
    pub des: Option<String>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.project_name.is_none() && self.des.is_none()
    }

    pub fn apply(self, project: &mut Project) {
        if let Some(name) = self.project_name {
            project.project_name = name;
        }
        if let Some(des) = self.des {
            project.des = des;
        }
    }
}
