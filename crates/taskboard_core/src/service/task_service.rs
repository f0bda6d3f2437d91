//! Task use-case service.
//!
//! # Responsibility
//! - Provide create/update/get/list/delete entry points for core callers.
//! - Assign ids and timestamps; callers only supply `TaskDraft` fields.
//!
//! # Invariants
//! - Title validation runs before any repository write.
//! - `update_task` uses full replacement semantics and keeps `id` and
//!   `created_at`.
//! - Write paths return the row as read back from storage.

use crate::model::task::{now_epoch_ms, Task, TaskDraft, TaskId, TaskStatus, TaskValidationError};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Caller input failed validation.
    Validation(TaskValidationError),
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one task from caller input.
    pub fn create_task(&self, draft: &TaskDraft) -> Result<Task, TaskServiceError> {
        let task = match Task::from_draft(draft, now_epoch_ms()) {
            Ok(task) => task,
            Err(err) => {
                warn!(
                    "event=task_create module=service status=rejected field={} reason=validation",
                    err.field()
                );
                return Err(err.into());
            }
        };

        let id = self.repo.create_task(&task)?;
        info!("event=task_create module=service status=ok task_id={id}");
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(
                "created task not found in read-back",
            ))
    }

    /// Replaces every caller-editable field of an existing task.
    pub fn update_task(&self, id: TaskId, draft: &TaskDraft) -> Result<Task, TaskServiceError> {
        if let Err(err) = draft.validate() {
            warn!(
                "event=task_update module=service status=rejected task_id={id} field={} reason=validation",
                err.field()
            );
            return Err(err.into());
        }

        let mut task = self
            .repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        task.apply_draft(draft, now_epoch_ms())?;
        self.repo.update_task(&task)?;
        info!("event=task_update module=service status=ok task_id={id}");

        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(
                "updated task not found in read-back",
            ))
    }

    /// Gets one task by stable ID.
    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(id)
    }

    /// Lists tasks newest first with an optional status filter.
    pub fn list_tasks(&self, status: Option<TaskStatus>) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks(status)
    }

    /// Deletes one task by ID.
    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    /// Deletes every listed task; unknown ids are skipped.
    ///
    /// Returns the number of rows removed.
    pub fn bulk_delete(&self, ids: &[TaskId]) -> Result<usize, TaskServiceError> {
        let deleted = self.repo.delete_tasks(ids)?;
        info!(
            "event=task_bulk_delete module=service status=ok requested={} deleted={deleted}",
            ids.len()
        );
        Ok(deleted)
    }
}
