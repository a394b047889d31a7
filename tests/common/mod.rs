#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, web,
};
use serde_json::{json, Value};
use taskmaster::{
    auth::{PasswordHasher, TokenKeys, TOKEN_COOKIE},
    routes,
    store::{MemoryStore, Store},
};

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Passw0rd!";

/// Shared state of one test app, backed by a fresh in-memory store.
#[derive(Clone)]
pub struct TestState {
    pub store: web::Data<dyn Store>,
    pub keys: web::Data<TokenKeys>,
    pub hasher: web::Data<PasswordHasher>,
}

impl TestState {
    pub fn new() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        Self {
            store: web::Data::from(store),
            keys: web::Data::new(TokenKeys::new(SECRET)),
            // Lowest cost bcrypt accepts, to keep the suite fast.
            hasher: web::Data::new(PasswordHasher::new(4)),
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.store.clone())
            .app_data(self.keys.clone())
            .app_data(self.hasher.clone())
            .configure(routes::config);
    }
}

pub struct TestUser {
    pub id: String,
    pub token: String,
}

impl TestUser {
    pub fn cookie(&self) -> Cookie<'static> {
        Cookie::new(TOKEN_COOKIE, self.token.clone())
    }
}

/// Calls the app and returns the status with the parsed JSON body.
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn token_cookie<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

pub async fn signup<S, B>(app: &S, email: &str, role: &str) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({
            "email": email,
            "password": PASSWORD,
            "confirmpassword": PASSWORD,
            "name": "Test User",
            "role": role
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "signup of {} failed", email);

    let token = token_cookie(&resp).expect("signup sets the token cookie");
    let body: Value = test::read_body_json(resp).await;
    TestUser {
        id: body["UserInfo"]["_id"]
            .as_str()
            .expect("signup returns the user id")
            .to_string(),
        token,
    }
}

pub async fn create_project<S, B>(app: &S, owner: &TestUser, name: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/project/add")
        .cookie(owner.cookie())
        .set_json(json!({ "projectName": name, "des": "A project used in tests" }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "project creation failed: {}", body);
    body["projectInfo"]["_id"]
        .as_str()
        .expect("project id")
        .to_string()
}

pub async fn create_task<S, B>(
    app: &S,
    assigner: &TestUser,
    assignee: &TestUser,
    project_id: &str,
    name: &str,
) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/task/add")
        .cookie(assigner.cookie())
        .set_json(json!({
            "projectId": project_id,
            "taskName": name,
            "des": "A task description that is long enough",
            "createdFor": assignee.id
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "task creation failed: {}", body);
    body["taskInfo"]["_id"].as_str().expect("task id").to_string()
}
