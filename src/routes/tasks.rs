use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde_json::json;

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{StatusUpdateInput, TaskInput},
    registry::Tasks,
    store::Store,
};

/// Assigns a new task to another user.
///
/// ## Request Body:
/// - `projectId`: Id of an existing project.
/// - `taskName`: Unique name, at least 3 characters.
/// - `des`: Description, at least 10 characters.
/// - `createdFor`: Id of the assignee. Must not be the caller.
///
/// ## Responses:
/// - `200 OK`: `{success, msg, taskInfo}`; the task starts as `pending`.
/// - `400 Bad Request`: The first failed input check, or the name is taken.
/// - `403 Forbidden`: The caller is a moderator.
/// - `404 Not Found`: The project or the assignee does not exist.
#[post("/add")]
pub async fn add_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    body: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = Tasks::new(store.get_ref())
        .create(body.into_inner(), &user)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "msg": "Task created successfully",
        "taskInfo": task
    })))
}

/// Tasks of one project, with assigner and assignee resolved.
#[get("/all/{project_id}")]
pub async fn tasks_by_project(
    store: web::Data<dyn Store>,
    _user: AuthenticatedUser,
    project_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let tasks = Tasks::new(store.get_ref())
        .list_by_project(&project_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "tasks": tasks })))
}

/// Tasks assigned to the caller.
#[get("/allbyuser")]
pub async fn tasks_by_user(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = Tasks::new(store.get_ref()).list_by_assignee(&user).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "tasks": tasks })))
}

/// Progress update by the assignee.
///
/// Only `taskStatus` and `remarks` are read from the body.
///
/// ## Responses:
/// - `200 OK`: `{success, msg, updatedTask}`.
/// - `400 Bad Request`: Malformed id, nothing to update, or an unknown status.
/// - `403 Forbidden`: The caller is not the assignee, whatever the body holds.
/// - `404 Not Found`: No such task.
#[patch("/statusUpdate/{task_id}")]
pub async fn update_status(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> Result<impl Responder, AppError> {
    let input = StatusUpdateInput::from_body(body.into_inner());
    let task = Tasks::new(store.get_ref())
        .update_status(&task_id, &user, input)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "msg": "Task status updated successfully",
        "updatedTask": task
    })))
}

#[get("/{task_id}")]
pub async fn get_task(
    store: web::Data<dyn Store>,
    _user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = Tasks::new(store.get_ref()).get(&task_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "taskInfo": task })))
}

/// Rewrites a task. Only its assigner may do this.
///
/// The body is checked exactly as on creation. `taskStatus` and `remarks` may
/// be sent as well.
#[put("/{task_id}")]
pub async fn update_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
    body: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = Tasks::new(store.get_ref())
        .update(&task_id, &user, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "msg": "Task updated successfully",
        "updatedTask": task
    })))
}

#[delete("/{task_id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    Tasks::new(store.get_ref()).delete(&task_id, &user).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "msg": "Task deleted successfully"
    })))
}
