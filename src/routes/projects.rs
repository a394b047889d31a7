use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;

use crate::{
    auth::AuthenticatedUser, error::AppError, models::ProjectInput, registry::Projects,
    store::Store,
};

/// Creates a project owned by the caller.
///
/// ## Request Body:
/// - `projectName`: Globally unique name (required).
/// - `des`: Description (required).
///
/// ## Responses:
/// - `200 OK`: `{success, msg, projectInfo}` with the stored project.
/// - `400 Bad Request`: A field is missing, or the name is taken.
#[post("/add")]
pub async fn add_project(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    body: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    let project = Projects::new(store.get_ref())
        .create(body.into_inner(), &user.id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "msg": "Project created successfully",
        "projectInfo": project
    })))
}

/// Partially updates a project the caller owns.
///
/// ## Path Parameters:
/// - `id`: The project id.
///
/// ## Responses:
/// - `200 OK`: `{success, msg, updatedProject}`.
/// - `400 Bad Request`: Malformed id, or neither field present.
/// - `404 Not Found`: No such project, or the caller does not own it.
#[patch("/edit/{id}")]
pub async fn edit_project(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    id: web::Path<String>,
    body: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    let project = Projects::new(store.get_ref())
        .update(&id, &user.id, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "msg": "Project updated successfully",
        "updatedProject": project
    })))
}

#[get("/info/{id}")]
pub async fn project_info(
    store: web::Data<dyn Store>,
    _user: AuthenticatedUser,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let project = Projects::new(store.get_ref()).get(&id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "msg": "Project Info",
        "projectInfo": project
    })))
}

/// Projects owned by the caller. An empty list is still a success.
#[get("/listbyuser")]
pub async fn list_by_user(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let list = Projects::new(store.get_ref())
        .list_by_owner(&user.id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "msg": "Project list",
        "list": list
    })))
}

/// Every project, with its owner's name and email.
#[get("/list")]
pub async fn list_projects(
    store: web::Data<dyn Store>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let list = Projects::new(store.get_ref()).list_all().await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "msg": "Project list",
        "list": list
    })))
}

#[delete("/delete/{id}")]
pub async fn delete_project(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    Projects::new(store.get_ref()).delete(&id, &user.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "msg": "Project deleted successfully"
    })))
}
