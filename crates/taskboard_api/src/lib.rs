//! Request-handling surface for taskboard.
//!
//! Wraps `taskboard_core` use-cases behind JSON-in/JSON-out operations that
//! return a stable `ApiResponse` envelope.

pub mod api;

pub use api::{init_logging, ApiResponse, TaskApi};
