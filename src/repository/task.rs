use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde_json::json;

use super::TaskRepository;
use crate::api::dto::{PageDto, TaskDto};
use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::mapper::task::{create_form, update_form, TaskForm};
use crate::mapper::{clean, to_paged, ToDomain};
use crate::model::{
    CreateTaskParams, FileUpload, PagedResult, Task, TaskQuery, TaskStatus, UpdateTaskParams,
};

const ATTACHMENT_FIELD: &str = "attachments[]";

pub struct HttpTaskRepository {
    client: Arc<ApiClient>,
}

impl HttpTaskRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

/// Urlencoded form without files, multipart with them.
fn with_body(builder: RequestBuilder, form: TaskForm, files: &[FileUpload]) -> ApiResult<RequestBuilder> {
    if files.is_empty() {
        return Ok(builder.form(form.fields()));
    }

    let mut multipart = Form::new();
    for (key, value) in form.into_fields() {
        multipart = multipart.text(key, value);
    }
    for file in files {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(mime) = &file.mime_type {
            part = part.mime_str(mime).map_err(|e| ApiError::Request {
                message: format!("Invalid content type {mime} for {}: {e}", file.file_name),
            })?;
        }
        multipart = multipart.part(ATTACHMENT_FIELD, part);
    }
    Ok(builder.multipart(multipart))
}

#[async_trait]
impl TaskRepository for HttpTaskRepository {
    async fn list(&self, query: &TaskQuery) -> ApiResult<PagedResult<Task>> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(from) = clean(query.from_date.clone()) {
            params.push(("from_date", from));
        }
        if let Some(to) = clean(query.to_date.clone()) {
            params.push(("to_date", to));
        }
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }

        let builder = self.client.request(Method::GET, "tasks")?.query(&params);
        let page: PageDto<TaskDto> = self.client.fetch(builder).await?;
        Ok(to_paged(page))
    }

    async fn get(&self, id: i64) -> ApiResult<Task> {
        let builder = self.client.request(Method::GET, &format!("tasks/{id}"))?;
        let dto: TaskDto = self.client.fetch(builder).await?;
        Ok(dto.to_domain())
    }

    async fn create(&self, params: &CreateTaskParams, files: &[FileUpload]) -> ApiResult<Task> {
        let builder = self.client.request(Method::POST, "tasks")?;
        let builder = with_body(builder, create_form(params), files)?;
        let dto: TaskDto = self.client.fetch(builder).await?;
        let task = dto.to_domain();
        tracing::info!(id = ?task.id, attachments = files.len(), "task created");
        Ok(task)
    }

    async fn update(
        &self,
        id: i64,
        params: &UpdateTaskParams,
        files: &[FileUpload],
        attachments_update: bool,
    ) -> ApiResult<Task> {
        // Multipart cannot ride on PUT for this backend, so spoof the method.
        let mut form = update_form(params, attachments_update);
        form.push("_method", "PUT");

        let builder = self.client.request(Method::POST, &format!("tasks/{id}"))?;
        let builder = with_body(builder, form, files)?;
        let dto: TaskDto = self.client.fetch(builder).await?;
        Ok(dto.to_domain())
    }

    async fn delete(&self, id: i64) -> ApiResult<()> {
        let builder = self.client.request(Method::DELETE, &format!("tasks/{id}"))?;
        self.client.execute(builder).await?;
        tracing::info!(id, "task deleted");
        Ok(())
    }

    async fn update_status(&self, id: i64, status: TaskStatus) -> ApiResult<Task> {
        let builder = self
            .client
            .request(Method::PATCH, &format!("tasks/{id}/status"))?
            .json(&json!({ "status": status.as_str() }));
        let dto: TaskDto = self.client.fetch(builder).await?;
        Ok(dto.to_domain())
    }
}
