pub mod auth;
pub mod task;
pub mod user;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::model::{
    CreateTaskParams, FileUpload, PagedResult, Task, TaskQuery, TaskStatus, UpdateTaskParams,
    UserData,
};

pub use auth::HttpAuthRepository;
pub use task::HttpTaskRepository;
pub use user::HttpUserRepository;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list(&self, query: &TaskQuery) -> ApiResult<PagedResult<Task>>;
    async fn get(&self, id: i64) -> ApiResult<Task>;
    /// Sent as multipart when `files` is non-empty, as a form otherwise.
    async fn create(&self, params: &CreateTaskParams, files: &[FileUpload]) -> ApiResult<Task>;
    /// `attachments_update` replaces the attachment set with `files`; when
    /// false the existing attachments are left alone.
    async fn update(
        &self,
        id: i64,
        params: &UpdateTaskParams,
        files: &[FileUpload],
        attachments_update: bool,
    ) -> ApiResult<Task>;
    async fn delete(&self, id: i64) -> ApiResult<()>;
    async fn update_status(&self, id: i64, status: TaskStatus) -> ApiResult<Task>;
}

/// One repository instance shared by several use cases.
#[async_trait]
impl<T: TaskRepository + ?Sized> TaskRepository for Arc<T> {
    async fn list(&self, query: &TaskQuery) -> ApiResult<PagedResult<Task>> {
        (**self).list(query).await
    }

    async fn get(&self, id: i64) -> ApiResult<Task> {
        (**self).get(id).await
    }

    async fn create(&self, params: &CreateTaskParams, files: &[FileUpload]) -> ApiResult<Task> {
        (**self).create(params, files).await
    }

    async fn update(
        &self,
        id: i64,
        params: &UpdateTaskParams,
        files: &[FileUpload],
        attachments_update: bool,
    ) -> ApiResult<Task> {
        (**self)
            .update(id, params, files, attachments_update)
            .await
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        (**self).delete(id).await
    }

    async fn update_status(&self, id: i64, status: TaskStatus) -> ApiResult<Task> {
        (**self).update_status(id, status).await
    }
}

/// Users are read-only from this client.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<UserData>>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn login(&self, email: &str, password: &str, remember_me: bool) -> ApiResult<UserData>;
    async fn refresh(&self) -> ApiResult<()>;
    async fn logout(&self) -> ApiResult<()>;
}

#[cfg(test)]
mod tests;
