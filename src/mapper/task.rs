use super::{clean, parse_date, parse_priority, parse_status, to_domain, to_domain_list, ToDomain};
use crate::api::dto::{AttachmentDto, TaskDto};
use crate::model::params::{CreateTaskParams, UpdateTaskParams};
use crate::model::task::{Task, TaskAttachment, TaskPriority};

impl ToDomain for AttachmentDto {
    type Entity = TaskAttachment;

    fn to_domain(self) -> TaskAttachment {
        TaskAttachment {
            id: clean(self.id),
            file_name: clean(self.file_name),
            file_path: clean(self.file_path),
            file_type: clean(self.file_type),
            file_url: clean(self.file_url),
            file_size: self
                .file_size
                .and_then(|size| u64::try_from(size).ok())
                .unwrap_or(0),
        }
    }
}

impl ToDomain for TaskDto {
    type Entity = Task;

    fn to_domain(self) -> Task {
        Task {
            id: self.id,
            title: clean(self.title),
            description: clean(self.description),
            status: parse_status(self.status.as_deref()),
            priority: parse_priority(self.priority.as_deref()),
            work_date: parse_date(self.work_date.as_deref()),
            work_time: clean(self.work_time),
            due_date: parse_date(self.due_date.as_deref()),
            creator: to_domain(self.creator),
            assignees: to_domain_list(self.assignees),
            attachments: to_domain_list(self.attachments),
            created_at: clean(self.created_at),
            updated_at: clean(self.updated_at),
        }
    }
}

/// Body fields for a write request. Blank values are left out.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TaskForm {
    fields: Vec<(String, String)>,
}

impl TaskForm {
    fn text(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = clean(value.map(String::from)) {
            self.fields.push((key.to_string(), value));
        }
    }

    fn date(&mut self, key: &str, value: Option<&str>) {
        let normalized = parse_date(value).or_else(|| clean(value.map(String::from)));
        if let Some(value) = normalized {
            self.fields.push((key.to_string(), value));
        }
    }

    fn priority(&mut self, value: Option<TaskPriority>) {
        if let Some(priority) = value {
            self.fields
                .push(("priority".to_string(), priority.as_str().to_string()));
        }
    }

    fn assignees(&mut self, ids: &[i64]) {
        for id in ids {
            self.fields.push(("assignees[]".to_string(), id.to_string()));
        }
    }

    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.fields.push((key.to_string(), value.into()));
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub fn create_form(params: &CreateTaskParams) -> TaskForm {
    let mut form = TaskForm::default();
    form.text("title", Some(&params.title));
    form.text("description", params.description.as_deref());
    form.date("work_date", params.work_date.as_deref());
    form.text("work_time", params.work_time.as_deref());
    form.priority(params.priority);
    form.date("due_date", params.due_date.as_deref());
    form.assignees(&params.assignee_ids);
    form
}

pub fn update_form(params: &UpdateTaskParams, attachments_update: bool) -> TaskForm {
    let mut form = TaskForm::default();
    form.text("title", params.title.as_deref());
    form.text("description", params.description.as_deref());
    form.date("work_date", params.work_date.as_deref());
    form.text("work_time", params.work_time.as_deref());
    form.priority(params.priority);
    form.date("due_date", params.due_date.as_deref());
    if let Some(ids) = &params.assignee_ids {
        form.assignees(ids);
    }
    form.push("attachments_update", if attachments_update { "1" } else { "0" });
    form
}
