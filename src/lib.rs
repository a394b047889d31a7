#![doc = "The `taskmaster` library crate."]
#![doc = ""]
#![doc = "Domain models, the persistence seam, authentication, the project and task"]
#![doc = "registries, routing configuration and error handling for the TaskMaster API."]
#![doc = "The binary (`main.rs`) wires them into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod routes;
pub mod store;

pub use crate::error::AppError;
