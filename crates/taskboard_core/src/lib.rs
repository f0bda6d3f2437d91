//! Core domain logic for taskboard.
//! This crate is the single source of truth for task invariants and for the
//! title-derived metadata exposed alongside every task.

pub mod db;
pub mod logging;
pub mod model;
pub mod presenter;
pub mod repo;
pub mod service;
pub mod text;

pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::task::{
    validate_title, Task, TaskDraft, TaskId, TaskPriority, TaskStatus, TaskValidationError,
    TITLE_MAX_CHARS,
};
pub use presenter::{present_task, present_tasks, TaskView};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::task_service::{TaskService, TaskServiceError};
pub use text::extract::{
    extract_all, extract_emails, extract_hashtags, extract_links, extract_mentions, TextEntities,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
