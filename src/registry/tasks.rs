use validator::validate_length;

use super::{invalid, present, Resolver};
use crate::error::AppError;
use crate::models::{
    NewTask, ProjectSummary, RecordId, StatusUpdateInput, Task, TaskDetail, TaskInput, TaskPatch,
    TaskStatus, UpdatedTask, UserProfile,
};
use crate::store::Store;

const MIN_TASK_NAME_LEN: u64 = 3;
const MIN_TASK_DES_LEN: u64 = 10;

/// Task assignment and progress tracking.
pub struct Tasks<'a> {
    store: &'a dyn Store,
}

/// Create/update payload after every check has passed.
struct Assignment {
    project_id: RecordId,
    task_name: String,
    des: String,
    created_for: RecordId,
}

fn parse_task_id(raw: &str, msg: &str) -> Result<RecordId, AppError> {
    RecordId::parse(raw).ok_or_else(|| invalid(msg))
}

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

fn parse_status(raw: Option<&str>) -> Result<Option<TaskStatus>, AppError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    TaskStatus::parse(raw).map(Some).ok_or_else(|| {
        let allowed: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
        AppError::ValidationError(format!(
            "Invalid task status. Allowed values: {}",
            allowed.join(", ")
        ))
    })
}

impl<'a> Tasks<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Creates a `pending` task assigned by `caller`.
    pub async fn create(&self, input: TaskInput, caller: &UserProfile) -> Result<Task, AppError> {
        let assignment = self
            .check_assignment(&input, caller, "Insufficient permissions to create a task")
            .await?;

        let task = self
            .store
            .insert_task(NewTask {
                project_id: assignment.project_id,
                task_name: assignment.task_name,
                des: assignment.des,
                created_by: caller.id.clone(),
                created_for: assignment.created_for,
            })
            .await?;
        log::info!(
            "user {} assigned task {} to {}",
            caller.id,
            task.id,
            task.created_for
        );
        Ok(task)
    }

    pub async fn list_by_project(&self, raw_project_id: &str) -> Result<Vec<TaskDetail>, AppError> {
        let project_id =
            RecordId::parse(raw_project_id).ok_or_else(|| invalid("Invalid project ID"))?;
        if self.store.find_project(&project_id).await?.is_none() {
            return Err(AppError::NotFound("Project not found".into()));
        }

        let tasks = self.store.list_tasks_by_project(&project_id).await?;
        let mut resolver = Resolver::new(self.store);
        let mut details = Vec::with_capacity(tasks.len());
        for task in tasks {
            let project_id = task.project_id.clone();
            details.push(detail(task, project_id, &mut resolver).await?);
        }
        Ok(details)
    }

    /// Tasks assigned to `caller`, each with its project summary attached.
    pub async fn list_by_assignee(
        &self,
        caller: &UserProfile,
    ) -> Result<Vec<TaskDetail<Option<ProjectSummary>>>, AppError> {
        let tasks = self.store.list_tasks_by_assignee(&caller.id).await?;
        let mut resolver = Resolver::new(self.store);
        let mut details = Vec::with_capacity(tasks.len());
        for task in tasks {
            let project = resolver.project(&task.project_id).await?;
            details.push(detail(task, project, &mut resolver).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, raw_id: &str) -> Result<TaskDetail, AppError> {
        let id = parse_task_id(raw_id, "Invalid task ID")?;
        let task = self.store.find_task(&id).await?.ok_or_else(task_not_found)?;
        let project_id = task.project_id.clone();
        detail(task, project_id, &mut Resolver::new(self.store)).await
    }

    /// Progress update by the assignee. Only `taskStatus` and `remarks` are read,
    /// and only once the caller is known to be the assignee.
    pub async fn update_status(
        &self,
        raw_id: &str,
        caller: &UserProfile,
        input: StatusUpdateInput,
    ) -> Result<UpdatedTask, AppError> {
        let id = parse_task_id(raw_id, "Invalid task ID format")?;
        let task = self.store.find_task(&id).await?.ok_or_else(task_not_found)?;
        if task.created_for != caller.id {
            log::info!("user {} denied status update on task {}", caller.id, id);
            return Err(not_authorized());
        }

        if input.is_empty() {
            return Err(invalid(
                "No valid fields provided. Allowed fields: taskStatus, remarks",
            ));
        }
        // A non-string status is reported like any other unknown status.
        let task_status = input
            .task_status
            .as_ref()
            .map(|value| value.as_str().unwrap_or_default());
        let remarks = match input.remarks {
            None => None,
            Some(serde_json::Value::String(remarks)) => Some(remarks),
            Some(_) => return Err(invalid("Remarks must be a string")),
        };
        let patch = TaskPatch {
            task_status: parse_status(task_status)?,
            remarks,
            ..TaskPatch::default()
        };

        self.apply(&id, patch).await
    }

    /// Full rewrite by the assigner, under the same rules as creation.
    pub async fn update(
        &self,
        raw_id: &str,
        caller: &UserProfile,
        input: TaskInput,
    ) -> Result<UpdatedTask, AppError> {
        let id = parse_task_id(raw_id, "Invalid task ID format")?;
        let assignment = self
            .check_assignment(&input, caller, "Insufficient permissions to update a task")
            .await?;

        let task = self.store.find_task(&id).await?.ok_or_else(task_not_found)?;
        if task.created_by != caller.id {
            log::info!("user {} denied update on task {}", caller.id, id);
            return Err(not_authorized());
        }

        let patch = TaskPatch {
            task_name: Some(assignment.task_name),
            task_status: parse_status(input.task_status.as_deref())?,
            remarks: input.remarks,
            des: Some(assignment.des),
            project_id: Some(assignment.project_id),
            created_for: Some(assignment.created_for),
        };

        self.apply(&id, patch).await
    }

    /// Removes a task. Allowed for its assigner and for moderators.
    pub async fn delete(&self, raw_id: &str, caller: &UserProfile) -> Result<(), AppError> {
        let id = parse_task_id(raw_id, "Invalid task ID")?;
        let task = self.store.find_task(&id).await?.ok_or_else(task_not_found)?;
        if task.created_by != caller.id && !caller.role.can_delete_any_task() {
            return Err(AppError::Forbidden(
                "Insufficient permissions to delete this task".into(),
            ));
        }

        if !self.store.delete_task(&id).await? {
            return Err(task_not_found());
        }
        log::info!("user {} deleted task {}", caller.id, id);
        Ok(())
    }

    async fn apply(&self, id: &RecordId, patch: TaskPatch) -> Result<UpdatedTask, AppError> {
        if patch.is_empty() {
            return Err(invalid(
                "No valid fields provided. Allowed fields: taskStatus, remarks",
            ));
        }
        self.store
            .update_task(id, patch)
            .await?
            .map(UpdatedTask::from)
            .ok_or_else(task_not_found)
    }

    /// Shared create/update checks. The first failing check is reported.
    async fn check_assignment(
        &self,
        input: &TaskInput,
        caller: &UserProfile,
        denied: &str,
    ) -> Result<Assignment, AppError> {
        let (Some(project_id), Some(task_name), Some(des), Some(created_for)) = (
            present(&input.project_id),
            present(&input.task_name),
            present(&input.des),
            present(&input.created_for),
        ) else {
            return Err(invalid("All fields are required"));
        };

        let (Some(project_id), Some(created_for)) =
            (RecordId::parse(project_id), RecordId::parse(created_for))
        else {
            return Err(invalid("Invalid project ID or createdFor ID"));
        };
        if !validate_length(task_name, Some(MIN_TASK_NAME_LEN), None, None) {
            return Err(invalid("Task name must be at least 3 characters long"));
        }
        if !validate_length(des, Some(MIN_TASK_DES_LEN), None, None) {
            return Err(invalid("Description must be at least 10 characters long"));
        }
        if created_for == caller.id {
            return Err(invalid("Task cannot be assigned to yourself"));
        }
        if !caller.role.can_assign_tasks() {
            return Err(AppError::Forbidden(denied.to_string()));
        }

        if self.store.find_project(&project_id).await?.is_none() {
            return Err(AppError::NotFound("Project not found".into()));
        }
        if self.store.find_user(&created_for).await?.is_none() {
            return Err(AppError::NotFound(
                "User to whom task is assigned not found".into(),
            ));
        }

        Ok(Assignment {
            project_id,
            task_name: task_name.to_string(),
            des: des.to_string(),
            created_for,
        })
    }
}

fn not_authorized() -> AppError {
    AppError::Forbidden("You are not authorized to update this task".into())
}

async fn detail<P>(
    task: Task,
    project_id: P,
    resolver: &mut Resolver<'_>,
) -> Result<TaskDetail<P>, AppError> {
    let created_by = resolver.user(&task.created_by).await?;
    let created_for = resolver.user(&task.created_for).await?;
    Ok(TaskDetail {
        id: task.id,
        project_id,
        task_name: task.task_name,
        des: task.des,
        task_status: task.task_status,
        created_by,
        created_for,
        remarks: task.remarks,
        created_at: task.created_at,
        updated_at: task.updated_at,
    })
}
