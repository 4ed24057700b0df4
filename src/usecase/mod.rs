//! One callable per operation, so call sites never construct repositories.
//!
//! Each use case builds its HTTP repository from a shared [`ApiClient`], or
//! takes any other implementation through `with_repository`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::model::{
    CreateTaskParams, FileUpload, PagedResult, Task, TaskQuery, TaskStatus, UpdateTaskParams,
    UserData,
};
use crate::repository::{
    AuthRepository, HttpAuthRepository, HttpTaskRepository, HttpUserRepository, TaskRepository,
    UserRepository,
};

#[async_trait]
pub trait UseCase: Send + Sync {
    type Params: Send;
    type Output;

    async fn execute(&self, params: Self::Params) -> ApiResult<Self::Output>;
}

#[derive(Debug, Clone, Default)]
pub struct CreateTaskRequest {
    pub params: CreateTaskParams,
    pub files: Vec<FileUpload>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskRequest {
    pub id: i64,
    pub params: UpdateTaskParams,
    pub files: Vec<FileUpload>,
    pub attachments_update: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub id: i64,
    pub status: TaskStatus,
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

pub struct GetTasks<R = HttpTaskRepository> {
    repository: R,
}

impl GetTasks {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_repository(HttpTaskRepository::new(client))
    }
}

impl<R: TaskRepository> GetTasks<R> {
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: TaskRepository> UseCase for GetTasks<R> {
    type Params = TaskQuery;
    type Output = PagedResult<Task>;

    async fn execute(&self, query: TaskQuery) -> ApiResult<PagedResult<Task>> {
        self.repository.list(&query).await
    }
}

pub struct GetTask<R = HttpTaskRepository> {
    repository: R,
}

impl GetTask {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_repository(HttpTaskRepository::new(client))
    }
}

impl<R: TaskRepository> GetTask<R> {
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: TaskRepository> UseCase for GetTask<R> {
    type Params = i64;
    type Output = Task;

    async fn execute(&self, id: i64) -> ApiResult<Task> {
        self.repository.get(id).await
    }
}

pub struct CreateTask<R = HttpTaskRepository> {
    repository: R,
}

impl CreateTask {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_repository(HttpTaskRepository::new(client))
    }
}

impl<R: TaskRepository> CreateTask<R> {
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: TaskRepository> UseCase for CreateTask<R> {
    type Params = CreateTaskRequest;
    type Output = Task;

    async fn execute(&self, request: CreateTaskRequest) -> ApiResult<Task> {
        self.repository.create(&request.params, &request.files).await
    }
}

pub struct UpdateTask<R = HttpTaskRepository> {
    repository: R,
}

impl UpdateTask {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_repository(HttpTaskRepository::new(client))
    }
}

impl<R: TaskRepository> UpdateTask<R> {
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: TaskRepository> UseCase for UpdateTask<R> {
    type Params = UpdateTaskRequest;
    type Output = Task;

    async fn execute(&self, request: UpdateTaskRequest) -> ApiResult<Task> {
        self.repository
            .update(
                request.id,
                &request.params,
                &request.files,
                request.attachments_update,
            )
            .await
    }
}

pub struct DeleteTask<R = HttpTaskRepository> {
    repository: R,
}

impl DeleteTask {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_repository(HttpTaskRepository::new(client))
    }
}

impl<R: TaskRepository> DeleteTask<R> {
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: TaskRepository> UseCase for DeleteTask<R> {
    type Params = i64;
    type Output = ();

    async fn execute(&self, id: i64) -> ApiResult<()> {
        self.repository.delete(id).await
    }
}

pub struct UpdateTaskStatus<R = HttpTaskRepository> {
    repository: R,
}

impl UpdateTaskStatus {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_repository(HttpTaskRepository::new(client))
    }
}

impl<R: TaskRepository> UpdateTaskStatus<R> {
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: TaskRepository> UseCase for UpdateTaskStatus<R> {
    type Params = StatusChange;
    type Output = Task;

    async fn execute(&self, change: StatusChange) -> ApiResult<Task> {
        self.repository.update_status(change.id, change.status).await
    }
}

pub struct GetUsers<R = HttpUserRepository> {
    repository: R,
}

impl GetUsers {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_repository(HttpUserRepository::new(client))
    }
}

impl<R: UserRepository> GetUsers<R> {
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: UserRepository> UseCase for GetUsers<R> {
    type Params = ();
    type Output = Vec<UserData>;

    async fn execute(&self, _params: ()) -> ApiResult<Vec<UserData>> {
        self.repository.list().await
    }
}

pub struct Login<R = HttpAuthRepository> {
    repository: R,
}

impl Login {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_repository(HttpAuthRepository::new(client))
    }
}

impl<R: AuthRepository> Login<R> {
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: AuthRepository> UseCase for Login<R> {
    type Params = Credentials;
    type Output = UserData;

    async fn execute(&self, credentials: Credentials) -> ApiResult<UserData> {
        self.repository
            .login(
                &credentials.email,
                &credentials.password,
                credentials.remember_me,
            )
            .await
    }
}

pub struct Logout<R = HttpAuthRepository> {
    repository: R,
}

impl Logout {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_repository(HttpAuthRepository::new(client))
    }
}

impl<R: AuthRepository> Logout<R> {
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: AuthRepository> UseCase for Logout<R> {
    type Params = ();
    type Output = ();

    async fn execute(&self, _params: ()) -> ApiResult<()> {
        self.repository.logout().await
    }
}

#[cfg(test)]
mod tests;
