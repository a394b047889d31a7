use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;

use crate::{
    auth::{expired_session_cookie, session_cookie, PasswordHasher, TokenKeys},
    error::AppError,
    models::{SigninRequest, SignupRequest},
    registry::Identity,
    store::Store,
};

/// Register a new user
///
/// Creates the account and starts a session by setting the `token` cookie.
///
/// ## Responses:
/// - `200 OK`: `{success, msg, UserInfo}` with the new user's profile.
/// - `400 Bad Request`: The first failed input check, or "Email already exists".
/// - `500 Internal Server Error`: Hashing, token or store failure.
#[post("/signup")]
pub async fn signup(
    store: web::Data<dyn Store>,
    hasher: web::Data<PasswordHasher>,
    keys: web::Data<TokenKeys>,
    body: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    let profile = Identity::new(store.get_ref(), hasher.get_ref())
        .signup(body.into_inner())
        .await?;
    let token = keys.issue(&profile.id)?;

    Ok(HttpResponse::Ok().cookie(session_cookie(token)).json(json!({
        "success": true,
        "msg": "Sign up successfully",
        "UserInfo": profile
    })))
}

/// Sign in
///
/// ## Responses:
/// - `200 OK`: `{success, user}`; the `token` cookie is set.
/// - `400 Bad Request`: Malformed email or short password.
/// - `401 Unauthorized`: "Invalid credentials", whichever part was wrong.
#[post("/signin")]
pub async fn signin(
    store: web::Data<dyn Store>,
    hasher: web::Data<PasswordHasher>,
    keys: web::Data<TokenKeys>,
    body: web::Json<SigninRequest>,
) -> Result<impl Responder, AppError> {
    let profile = Identity::new(store.get_ref(), hasher.get_ref())
        .signin(body.into_inner())
        .await?;
    let token = keys.issue(&profile.id)?;

    Ok(HttpResponse::Ok().cookie(session_cookie(token)).json(json!({
        "success": true,
        "user": profile
    })))
}

/// Ends the session client-side by expiring the cookie.
#[post("/logout")]
pub async fn logout() -> impl Responder {
    HttpResponse::Ok()
        .cookie(expired_session_cookie())
        .json(json!({
            "success": true,
            "msg": "Logout Successful!!"
        }))
}
