//! Study sets and flashcard progress tracking
//!
//! This module provides:
//! - Study set management (titled collections of flashcards)
//! - Flashcard CRUD with per-set card counts
//! - Review progress tallies (times seen / times correct) consumed by the
//!   planner's readiness assessment

pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{StudySetStorage, StudySetStorageError};
