//! External representation of tasks.
//!
//! # Responsibility
//! - Combine persisted task fields with title-derived metadata.
//!
//! # Invariants
//! - Derived fields are recomputed from the current title on every call;
//!   nothing is cached on `Task` or between calls.
//! - A view always carries exactly the persisted fields plus `mentions`,
//!   `hashtags`, `emails` and `links`.

use crate::model::task::{Task, TaskId, TaskPriority, TaskStatus};
use crate::text::extract::{extract_emails, extract_hashtags, extract_links, extract_mentions};
use serde::Serialize;

/// Client-facing task representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub is_public: bool,
    pub due_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub mentions: Vec<String>,
    pub hashtags: Vec<String>,
    pub emails: Vec<String>,
    pub links: Vec<String>,
}

/// Builds the external representation of `task`.
pub fn present_task(task: &Task) -> TaskView {
    let title = task.title.as_str();
    TaskView {
        id: task.id,
        title: task.title.clone(),
        description: task.description.clone(),
        status: task.status,
        priority: task.priority,
        is_public: task.is_public,
        due_date: task.due_date,
        created_at: task.created_at,
        updated_at: task.updated_at,
        mentions: extract_mentions(title),
        hashtags: extract_hashtags(title),
        emails: extract_emails(title),
        links: extract_links(title),
    }
}

/// Presents a list of tasks, keeping input order.
pub fn present_tasks(tasks: &[Task]) -> Vec<TaskView> {
    tasks.iter().map(present_task).collect()
}
