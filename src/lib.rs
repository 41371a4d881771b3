#![doc = "The `bizcuit` library crate."]
#![doc = ""]
#![doc = "A multi-user task API: registration and login with bearer tokens, plus"]
#![doc = "create/read/update/delete of tasks scoped to the authenticated owner."]
#![doc = "The binary (`main.rs`) wires these modules to PostgreSQL and Actix Web;"]
#![doc = "`client` is the consumer side that talks to a running server."]

pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod tasks;

pub use crate::error::AppError;
pub use crate::state::AppState;
