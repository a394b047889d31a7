use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Store, StoreError};
use crate::models::{
    NewProject, NewTask, NewUser, Project, ProjectPatch, RecordId, Task, TaskPatch, TaskStatus,
    User,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
}

/// In-process store with the same uniqueness rules as the Postgres schema.
///
/// Rows are kept in insertion order, which doubles as creation order. The lock
/// is never held across an `.await`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

fn check_task_row(tables: &Tables, task: &Task) -> Result<(), StoreError> {
    if task.created_by == task.created_for {
        return Err(StoreError::Invalid(
            "Task cannot be assigned to its creator".into(),
        ));
    }
    if tables
        .tasks
        .iter()
        .any(|other| other.id != task.id && other.task_name == task.task_name)
    {
        return Err(StoreError::Duplicate("Task name"));
    }
    Ok(())
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.write()?;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("Email"));
        }

        let now = Utc::now();
        let row = User {
            id: RecordId::generate(),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user(&self, id: &RecordId) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_project(&self, project: NewProject) -> Result<Project, StoreError> {
        let mut tables = self.write()?;
        if tables
            .projects
            .iter()
            .any(|p| p.project_name == project.project_name)
        {
            return Err(StoreError::Duplicate("Project name"));
        }

        let now = Utc::now();
        let row = Project {
            id: RecordId::generate(),
            project_name: project.project_name,
            des: project.des,
            created_by: project.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.projects.push(row.clone());
        Ok(row)
    }

    async fn find_project(&self, id: &RecordId) -> Result<Option<Project>, StoreError> {
        Ok(self.read()?.projects.iter().find(|p| &p.id == id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.read()?.projects.clone())
    }

    async fn list_projects_by_owner(&self, owner: &RecordId) -> Result<Vec<Project>, StoreError> {
        Ok(self
            .read()?
            .projects
            .iter()
            .filter(|p| &p.created_by == owner)
            .cloned()
            .collect())
    }

    async fn update_project(
        &self,
        id: &RecordId,
        patch: ProjectPatch,
    ) -> Result<Option<Project>, StoreError> {
        let mut tables = self.write()?;
        if let Some(name) = &patch.project_name {
            if tables
                .projects
                .iter()
                .any(|p| &p.id != id && &p.project_name == name)
            {
                return Err(StoreError::Duplicate("Project name"));
            }
        }

        let Some(project) = tables.projects.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };
        patch.apply(project);
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: &RecordId) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        let before = tables.projects.len();
        tables.projects.retain(|p| &p.id != id);
        Ok(tables.projects.len() != before)
    }

    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let mut tables = self.write()?;
        let now = Utc::now();
        let row = Task {
            id: RecordId::generate(),
            project_id: task.project_id,
            task_name: task.task_name,
            des: task.des,
            task_status: TaskStatus::Pending,
            created_by: task.created_by,
            created_for: task.created_for,
            remarks: None,
            created_at: now,
            updated_at: now,
        };
        check_task_row(&tables, &row)?;
        tables.tasks.push(row.clone());
        Ok(row)
    }

    async fn find_task(&self, id: &RecordId) -> Result<Option<Task>, StoreError> {
        Ok(self.read()?.tasks.iter().find(|t| &t.id == id).cloned())
    }

    async fn list_tasks_by_project(&self, project_id: &RecordId) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .read()?
            .tasks
            .iter()
            .filter(|t| &t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_tasks_by_assignee(&self, user_id: &RecordId) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .read()?
            .tasks
            .iter()
            .filter(|t| &t.created_for == user_id)
            .cloned()
            .collect())
    }

    async fn update_task(
        &self,
        id: &RecordId,
        patch: TaskPatch,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.write()?;
        let Some(index) = tables.tasks.iter().position(|t| &t.id == id) else {
            return Ok(None);
        };

        let mut updated = tables.tasks[index].clone();
        patch.apply(&mut updated);
        updated.updated_at = Utc::now();
        check_task_row(&tables, &updated)?;

        tables.tasks[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_task(&self, id: &RecordId) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| &t.id != id);
        Ok(tables.tasks.len() != before)
    }
}
