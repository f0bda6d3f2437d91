//! Text-derived metadata for task titles.
//!
//! # Responsibility
//! - Scan free text into mention/hashtag/email/link token lists.
//!
//! # Invariants
//! - Extraction is pure: no state, no I/O, never fails.

pub mod extract;
