//! Calendar events and date utilities
//!
//! This module provides:
//! - Calendar event models (exams, study sessions)
//! - JSON file storage for events
//! - Pure date helpers and month-grid generation for calendar views

pub mod models;
pub mod storage;
pub mod utils;

pub use models::*;
pub use storage::{CalendarStorage, CalendarStorageError};
