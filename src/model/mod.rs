pub mod page;
pub mod params;
pub mod task;
pub mod user;

pub use page::PagedResult;
pub use params::{CreateTaskParams, FileUpload, TaskQuery, UpdateTaskParams};
pub use task::{Task, TaskAttachment, TaskPriority, TaskStatus};
pub use user::UserData;
