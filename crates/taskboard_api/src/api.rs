//! JSON request surface over the task service.
//!
//! # Responsibility
//! - Expose use-case-level task operations with JSON input and output.
//! - Translate core errors into a stable response envelope.
//!
//! # Invariants
//! - Exported operations never panic and never return `Err`; failures are
//!   reported through `ApiResponse { ok: false, .. }`.
//! - Successful task bodies are always produced by `present_task`, so
//!   derived fields reflect the stored title at response time.
//! - Caller-supplied `id`, `created_at` and `updated_at` are ignored.

use log::{error, info, warn};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use taskboard_core::db::{open_db, open_db_in_memory};
use taskboard_core::{
    init_logging as init_logging_inner, present_task, present_tasks, SqliteTaskRepository,
    TaskDraft, TaskId, TaskService, TaskServiceError, TaskStatus,
};
use uuid::Uuid;

const DB_FILE_NAME: &str = "taskboard.sqlite3";
const DB_PATH_ENV: &str = "TASKBOARD_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_NO_CONTENT: u16 = 204;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Response envelope returned by every operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// HTTP-like status code.
    pub status: u16,
    /// JSON payload: task view(s) on success, error detail on failure.
    pub body: Value,
    /// Human-readable message for diagnostics.
    pub message: String,
}

impl ApiResponse {
    fn success(status: u16, body: Value, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            status,
            body,
            message: message.into(),
        }
    }

    fn failure(status: u16, body: Value, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status,
            body,
            message: message.into(),
        }
    }

    fn bad_request(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::failure(STATUS_BAD_REQUEST, json!({ "detail": detail.clone() }), detail)
    }

    fn not_found(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::failure(STATUS_NOT_FOUND, json!({ "detail": detail.clone() }), detail)
    }

    fn internal(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::failure(STATUS_INTERNAL_ERROR, json!({ "detail": detail.clone() }), detail)
    }
}

#[derive(Debug, Deserialize)]
struct BulkDeleteRequest {
    #[serde(default)]
    ids: Vec<Value>,
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
pub fn init_logging(level: &str, log_dir: &str) -> String {
    match init_logging_inner(level, log_dir) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Task request handler bound to one open database connection.
pub struct TaskApi {
    conn: Connection,
}

impl TaskApi {
    /// Opens the task database at `path`, applying migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, String> {
        let conn = open_db(path).map_err(|err| format!("task DB open failed: {err}"))?;
        Ok(Self { conn })
    }

    /// Opens the database named by `TASKBOARD_DB_PATH`, or the default file
    /// in the system temp directory.
    pub fn from_env() -> Result<Self, String> {
        Self::open(resolve_db_path())
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, String> {
        let conn = open_db_in_memory().map_err(|err| format!("task DB open failed: {err}"))?;
        Ok(Self { conn })
    }

    /// Lists tasks newest first.
    ///
    /// - `None` or a blank `status` lists everything.
    /// - An unrecognized `status` label matches no rows.
    pub fn list_tasks(&self, status: Option<&str>) -> ApiResponse {
        let status_filter = status.map(str::trim).filter(|value| !value.is_empty());
        let status = match status_filter {
            None => None,
            Some(label) => match TaskStatus::parse(label) {
                Some(status) => Some(status),
                None => {
                    info!("event=api_list module=api status=ok filter=unknown count=0");
                    return ApiResponse::success(STATUS_OK, json!([]), "No tasks.");
                }
            },
        };

        let result = self.with_service(|service| service.list_tasks(status).map_err(Into::into));
        match result {
            Ok(tasks) => {
                info!(
                    "event=api_list module=api status=ok filter={} count={}",
                    status.map_or("none", TaskStatus::as_str),
                    tasks.len()
                );
                let message = format!("Found {} task(s).", tasks.len());
                ApiResponse::success(STATUS_OK, to_json(&present_tasks(&tasks)), message)
            }
            Err(err) => error_response("list_tasks", err),
        }
    }

    /// Gets one task by id.
    pub fn get_task(&self, id: &str) -> ApiResponse {
        let Some(task_id) = parse_task_id(id) else {
            return ApiResponse::not_found(format!("task not found: {}", id.trim()));
        };

        match self.with_service(|service| service.get_task(task_id).map_err(Into::into)) {
            Ok(Some(task)) => ApiResponse::success(
                STATUS_OK,
                to_json(&present_task(&task)),
                "Task loaded.",
            ),
            Ok(None) => ApiResponse::not_found(format!("task not found: {task_id}")),
            Err(err) => error_response("get_task", err),
        }
    }

    /// Creates a task from a JSON draft.
    pub fn create_task(&self, body: &str) -> ApiResponse {
        let draft = match parse_draft(body) {
            Ok(draft) => draft,
            Err(response) => return response,
        };

        match self.with_service(|service| service.create_task(&draft)) {
            Ok(task) => ApiResponse::success(
                STATUS_CREATED,
                to_json(&present_task(&task)),
                "Task created.",
            ),
            Err(err) => error_response("create_task", err),
        }
    }

    /// Replaces every editable field of an existing task from a JSON draft.
    pub fn update_task(&self, id: &str, body: &str) -> ApiResponse {
        let Some(task_id) = parse_task_id(id) else {
            return ApiResponse::not_found(format!("task not found: {}", id.trim()));
        };
        let draft = match parse_draft(body) {
            Ok(draft) => draft,
            Err(response) => return response,
        };

        match self.with_service(|service| service.update_task(task_id, &draft)) {
            Ok(task) => ApiResponse::success(
                STATUS_OK,
                to_json(&present_task(&task)),
                "Task updated.",
            ),
            Err(err) => error_response("update_task", err),
        }
    }

    /// Deletes one task by id.
    pub fn delete_task(&self, id: &str) -> ApiResponse {
        let Some(task_id) = parse_task_id(id) else {
            return ApiResponse::not_found(format!("task not found: {}", id.trim()));
        };

        match self.with_service(|service| service.delete_task(task_id)) {
            Ok(()) => ApiResponse::success(STATUS_NO_CONTENT, Value::Null, "Task deleted."),
            Err(err) => error_response("delete_task", err),
        }
    }

    /// Deletes every task listed in `{"ids": [...]}`.
    ///
    /// Missing `ids` means an empty set. Ids that are not valid task ids or
    /// do not exist are skipped.
    pub fn bulk_delete(&self, body: &str) -> ApiResponse {
        let request: BulkDeleteRequest = match serde_json::from_str(body) {
            Ok(request) => request,
            Err(err) => return ApiResponse::bad_request(format!("invalid request body: {err}")),
        };

        let ids: Vec<TaskId> = request
            .ids
            .iter()
            .filter_map(|value| value.as_str().and_then(parse_task_id))
            .collect();
        let skipped = request.ids.len() - ids.len();
        if skipped > 0 {
            warn!("event=api_bulk_delete module=api status=partial skipped_ids={skipped}");
        }

        match self.with_service(|service| service.bulk_delete(&ids)) {
            Ok(deleted) => ApiResponse::success(
                STATUS_OK,
                json!({ "status": "tasks deleted", "deleted": deleted }),
                format!("Deleted {deleted} task(s)."),
            ),
            Err(err) => error_response("bulk_delete", err),
        }
    }

    fn with_service<T>(
        &self,
        f: impl FnOnce(&TaskService<SqliteTaskRepository<'_>>) -> Result<T, TaskServiceError>,
    ) -> Result<T, TaskServiceError> {
        let repo = SqliteTaskRepository::try_new(&self.conn)?;
        let service = TaskService::new(repo);
        f(&service)
    }
}

fn parse_task_id(raw: &str) -> Option<TaskId> {
    Uuid::parse_str(raw.trim()).ok().filter(|id| !id.is_nil())
}

fn parse_draft(body: &str) -> Result<TaskDraft, ApiResponse> {
    serde_json::from_str::<TaskDraft>(body)
        .map_err(|err| ApiResponse::bad_request(format!("invalid request body: {err}")))
}

fn error_response(operation: &'static str, err: TaskServiceError) -> ApiResponse {
    match err {
        TaskServiceError::Validation(validation) => {
            let message = validation.to_string();
            warn!(
                "event=api_request module=api op={operation} status=rejected field={}",
                validation.field()
            );
            let mut body = Map::new();
            body.insert(validation.field().to_string(), json!([message.clone()]));
            ApiResponse::failure(STATUS_BAD_REQUEST, Value::Object(body), message)
        }
        TaskServiceError::TaskNotFound(id) => {
            ApiResponse::not_found(format!("task not found: {id}"))
        }
        other => {
            error!("event=api_request module=api op={operation} status=error error={other}");
            ApiResponse::internal(format!("{operation} failed: {other}"))
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}
