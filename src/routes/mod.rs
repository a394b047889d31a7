pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route of the API.
///
/// `/api/auth` is public. `/project` and `/task` sit behind [`AuthMiddleware`].
/// Under `/task` the literal paths are registered before `/{task_id}`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health::welcome)
        .service(health::health)
        .service(
            web::scope("/api/auth")
                .service(auth::signup)
                .service(auth::signin)
                .service(auth::logout),
        )
        .service(
            web::scope("/project")
                .wrap(AuthMiddleware)
                .service(projects::add_project)
                .service(projects::edit_project)
                .service(projects::project_info)
                .service(projects::list_by_user)
                .service(projects::list_projects)
                .service(projects::delete_project),
        )
        .service(
            web::scope("/task")
                .wrap(AuthMiddleware)
                .service(tasks::add_task)
                .service(tasks::tasks_by_user)
                .service(tasks::tasks_by_project)
                .service(tasks::update_status)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// Body errors use the same envelope as every other 400.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("rejected request body: {}", err);
        AppError::ValidationError(format!("Invalid request body: {}", err)).into()
    })
}
