//! Authenticated data access for the task service: one HTTP pipeline that
//! owns the bearer token, a forgiving DTO → domain mapper, and repositories
//! and use cases for tasks and users on top.

pub mod api;
pub mod config;
pub mod error;
pub mod mapper;
pub mod model;
pub mod repository;
pub mod session;
pub mod usecase;
pub mod util;

pub use api::ApiClient;
pub use error::{ApiError, ApiResult};
pub use session::{Navigator, Session, SessionStore};
