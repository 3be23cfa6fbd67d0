//! Data models for calendar events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// An exam the user is preparing for
    Exam,
    /// A scheduled study session (usually generated by the planner)
    StudySession,
    /// Anything else on the calendar
    Other,
}

impl Default for EventType {
    fn default() -> Self {
        Self::Other
    }
}

/// A single calendar event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub event_type: EventType,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Study set linked to this event (exams and study sessions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_set_id: Option<Uuid>,
    /// For study sessions, the exam the session prepares for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalendarEvent {
    pub fn new(title: String, event_type: EventType, start_time: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            event_type,
            start_time,
            end_time: None,
            study_set_id: None,
            exam_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an exam event, optionally linked to a study set
    pub fn exam(title: String, start_time: DateTime<Utc>, study_set_id: Option<Uuid>) -> Self {
        let mut event = Self::new(title, EventType::Exam, start_time);
        event.study_set_id = study_set_id;
        event
    }
}
