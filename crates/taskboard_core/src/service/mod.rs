//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep api/cli layers decoupled from storage details.

pub mod task_service;
