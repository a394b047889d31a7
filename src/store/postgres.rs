use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{Store, StoreError};
use crate::models::{
    NewProject, NewTask, NewUser, Project, ProjectPatch, RecordId, Task, TaskPatch, User,
};

const USER_COLUMNS: &str = "id, email, password_hash, name, role, created_at, updated_at";
const PROJECT_COLUMNS: &str = "id, project_name, des, created_by, created_at, updated_at";
const TASK_COLUMNS: &str = "id, project_id, task_name, des, task_status, created_by, \
     created_for, remarks, created_at, updated_at";

/// Maps the default Postgres names of our unique constraints to field names.
fn duplicate_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_email_key") => "Email",
        Some("projects_project_name_key") => "Project name",
        Some("tasks_task_name_key") => "Task name",
        _ => "Record",
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match &error {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate(duplicate_field(db_err.constraint()))
            }
            sqlx::Error::Database(db_err)
                if db_err.is_check_violation() || db_err.is_foreign_key_violation() =>
            {
                StoreError::Invalid(db_err.message().to_string())
            }
            _ => StoreError::Backend(error.to_string()),
        }
    }
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and brings the schema up to date. Fails fast; there is no retry.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(format!("migration failed: {}", e)))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, email, password_hash, name, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(RecordId::generate())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_user(&self, id: &RecordId) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_project(&self, project: NewProject) -> Result<Project, StoreError> {
        let sql = format!(
            "INSERT INTO projects (id, project_name, des, created_by) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            PROJECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Project>(&sql)
            .bind(RecordId::generate())
            .bind(&project.project_name)
            .bind(&project.des)
            .bind(&project.created_by)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_project(&self, id: &RecordId) -> Result<Option<Project>, StoreError> {
        let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);
        let row = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let sql = format!(
            "SELECT {} FROM projects ORDER BY created_at, id",
            PROJECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, Project>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_projects_by_owner(&self, owner: &RecordId) -> Result<Vec<Project>, StoreError> {
        let sql = format!(
            "SELECT {} FROM projects WHERE created_by = $1 ORDER BY created_at, id",
            PROJECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, Project>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_project(
        &self,
        id: &RecordId,
        patch: ProjectPatch,
    ) -> Result<Option<Project>, StoreError> {
        let sql = format!(
            "UPDATE projects \
             SET project_name = COALESCE($2, project_name), \
                 des = COALESCE($3, des), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            PROJECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(patch.project_name)
            .bind(patch.des)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_project(&self, id: &RecordId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let sql = format!(
            "INSERT INTO tasks (id, project_id, task_name, des, created_by, created_for) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            TASK_COLUMNS
        );
        let row = sqlx::query_as::<_, Task>(&sql)
            .bind(RecordId::generate())
            .bind(&task.project_id)
            .bind(&task.task_name)
            .bind(&task.des)
            .bind(&task.created_by)
            .bind(&task.created_for)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_task(&self, id: &RecordId) -> Result<Option<Task>, StoreError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let row = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_tasks_by_project(&self, project_id: &RecordId) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE project_id = $1 ORDER BY created_at, id",
            TASK_COLUMNS
        );
        let rows = sqlx::query_as::<_, Task>(&sql)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_tasks_by_assignee(&self, user_id: &RecordId) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE created_for = $1 ORDER BY created_at, id",
            TASK_COLUMNS
        );
        let rows = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_task(
        &self,
        id: &RecordId,
        patch: TaskPatch,
    ) -> Result<Option<Task>, StoreError> {
        let sql = format!(
            "UPDATE tasks \
             SET task_name = COALESCE($2, task_name), \
                 task_status = COALESCE($3, task_status), \
                 remarks = COALESCE($4, remarks), \
                 des = COALESCE($5, des), \
                 project_id = COALESCE($6, project_id), \
                 created_for = COALESCE($7, created_for), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        );
        let row = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(patch.task_name)
            .bind(patch.task_status)
            .bind(patch.remarks)
            .bind(patch.des)
            .bind(patch.project_id)
            .bind(patch.created_for)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_task(&self, id: &RecordId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_field_names() {
        assert_eq!(duplicate_field(Some("users_email_key")), "Email");
        assert_eq!(duplicate_field(Some("projects_project_name_key")), "Project name");
        assert_eq!(duplicate_field(Some("tasks_task_name_key")), "Task name");
        assert_eq!(duplicate_field(None), "Record");
    }

    #[test]
    fn test_non_database_errors_are_backend_failures() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
