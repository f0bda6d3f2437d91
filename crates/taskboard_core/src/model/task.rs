//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its caller-editable draft.
//! - Own title validation shared by create/update paths.
//!
//! # Invariants
//! - `id` is stable, non-nil and never reused for another task.
//! - `title` is non-empty after trimming and at most `TITLE_MAX_CHARS` chars.
//! - Derived text metadata is never stored on the record.
//!
//! # See also
//! - crate::presenter

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a task record.
pub type TaskId = Uuid;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 500;

/// Board column a task is shown in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Backlog item.
    #[default]
    Open,
    /// Planned for today.
    Today,
}

impl TaskStatus {
    /// Returns the stable storage/wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Today => "today",
        }
    }

    /// Parses a storage/wire label. Unknown labels yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "today" => Some(Self::Today),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    #[default]
    Normal,
    High,
}

impl TaskPriority {
    /// Returns the stable storage/wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
        }
    }

    /// Parses a storage/wire label. Unknown labels yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Validation failure for task input or persisted task state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Title exceeds the character limit.
    TitleTooLong { max: usize, actual: usize },
    /// Record carries the nil UUID.
    NilId,
}

impl TaskValidationError {
    /// Name of the input field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::NilId => "id",
        }
    }
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::TitleTooLong { max, actual } => write!(
                f,
                "title must have no more than {max} characters (got {actual})"
            ),
            Self::NilId => write!(f, "task id must not be nil"),
        }
    }
}

impl Error for TaskValidationError {}

/// Validates a raw title and returns it unchanged on success.
///
/// The value is not trimmed; only emptiness is judged on the trimmed form.
pub fn validate_title(raw: &str) -> Result<&str, TaskValidationError> {
    if raw.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    let actual = raw.chars().count();
    if actual > TITLE_MAX_CHARS {
        return Err(TaskValidationError::TitleTooLong {
            max: TITLE_MAX_CHARS,
            actual,
        });
    }
    Ok(raw)
}

/// Caller-editable task fields used by create and full update.
///
/// Unknown keys (including `id`, `created_at`, `updated_at`) are ignored on
/// deserialize, so read-only fields can never be set through a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub is_public: bool,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub due_date: Option<i64>,
}

impl TaskDraft {
    /// Creates a draft with the given title and default field values.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title).map(|_| ())
    }
}

/// Canonical persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub is_public: bool,
    /// Unix epoch milliseconds.
    pub due_date: Option<i64>,
    /// Unix epoch milliseconds, set once at creation.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every mutation.
    pub updated_at: i64,
}

impl Task {
    /// Builds a new record from a draft with a generated id.
    ///
    /// # Invariants
    /// - `created_at == updated_at == now_ms`.
    /// - Draft validation is enforced before the record exists.
    pub fn from_draft(draft: &TaskDraft, now_ms: i64) -> Result<Self, TaskValidationError> {
        draft.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status,
            priority: draft.priority,
            is_public: draft.is_public,
            due_date: draft.due_date,
            created_at: now_ms,
            updated_at: now_ms,
        })
    }

    /// Replaces every caller-editable field with the draft values.
    ///
    /// `id` and `created_at` are kept; `updated_at` is refreshed to `now_ms`
    /// and never moves backwards.
    pub fn apply_draft(&mut self, draft: &TaskDraft, now_ms: i64) -> Result<(), TaskValidationError> {
        draft.validate()?;
        self.title = draft.title.clone();
        self.description = draft.description.clone();
        self.status = draft.status;
        self.priority = draft.priority;
        self.is_public = draft.is_public;
        self.due_date = draft.due_date;
        self.updated_at = now_ms.max(self.updated_at);
        Ok(())
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        validate_title(&self.title).map(|_| ())
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
