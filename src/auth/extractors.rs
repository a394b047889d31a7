use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use std::ops::Deref;

use crate::error::AppError;
use crate::models::UserProfile;

/// The caller, as resolved by `AuthMiddleware`.
///
/// Only usable on routes behind the middleware. Anywhere else extraction fails
/// with `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserProfile);

impl Deref for AuthenticatedUser {
    type Target = UserProfile;

    fn deref(&self) -> &UserProfile {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<UserProfile>().cloned() {
            Some(profile) => ready(Ok(AuthenticatedUser(profile))),
            None => {
                let err = AppError::Unauthorized(
                    "User not found in request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
