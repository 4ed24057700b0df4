use std::path::Path;

use crate::model::task::TaskPriority;

/// Filters for the task list. The server applies the date range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTaskParams {
    pub title: String,
    pub description: Option<String>,
    pub work_date: Option<String>,
    pub work_time: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
    pub assignee_ids: Vec<i64>,
}

/// Partial update: `None` fields are left untouched on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub work_date: Option<String>,
    pub work_time: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
    pub assignee_ids: Option<Vec<i64>>,
}

/// A binary file sent alongside a create or update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Content type is guessed from the extension; unknown extensions send none.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "attachment".to_string());
        let mut upload = Self::new(file_name, bytes);
        upload.mime_type = mime_guess::from_path(path).first_raw().map(str::to_string);
        Ok(upload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn from_path_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let upload = FileUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.file_name, "report.pdf");
        assert_eq!(upload.bytes, b"%PDF-1.4");
        assert_eq!(upload.mime_type.as_deref(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn from_path_unknown_extension_has_no_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.zzqx");
        std::fs::write(&path, b"x").unwrap();

        let upload = FileUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.mime_type, None);
    }

    #[tokio::test]
    async fn from_path_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileUpload::from_path(dir.path().join("nope.txt")).await.is_err());
    }
}
