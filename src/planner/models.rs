//! Data models for the study planner conversation

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::models::{CalendarEvent, EventType};
use crate::study_sets::models::StudySet;

/// Step in the linear planning conversation.
///
/// Transitions only ever move forward. `SelectExams` and `AskAvailability`
/// are declared for compatibility with stored conversations but no
/// transition reaches them; both fall through to the agent's fallback
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Welcome,
    ShowExams,
    SelectExams,
    AssessReadiness,
    AskAvailability,
    GeneratePlan,
    ConfirmPlan,
    Complete,
}

/// Who said a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn in the conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The agent's next prompt for a given state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    pub text: String,
    /// Canned replies the caller may offer as buttons/shortcuts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub needs_user_input: bool,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub is_complete: bool,
}

/// How much time the user can commit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub hours_per_day: Option<f64>,
}

/// Exam readiness derived from flashcard review coverage and correctness.
///
/// `avg_correct_rate` is reported as a rounded percentage, while the
/// mastery formula consumes the raw 0-1 fraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Readiness {
    pub mastery_percent: u8,
    pub cards_reviewed: usize,
    pub total_cards: usize,
    pub avg_correct_rate: u8,
}

/// A single scheduled study session emitted by the plan generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub study_set_id: Uuid,
    pub exam_id: Uuid,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub event_type: EventType,
}

impl StudySession {
    /// Convert into a calendar event ready for insertion
    pub fn into_calendar_event(self) -> CalendarEvent {
        let mut event = CalendarEvent::new(self.title, self.event_type, self.start_time);
        event.description = Some(self.description);
        event.end_time = Some(self.end_time);
        event.study_set_id = Some(self.study_set_id);
        event.exam_id = Some(self.exam_id);
        event
    }
}

/// A generated study plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub sessions: Vec<StudySession>,
    pub total_hours: f64,
}

/// State of one planning conversation.
///
/// Owned by a single conversation; created by
/// [`initialize_agent`](super::initialize_agent), advanced only through the
/// transition functions, and discarded when the conversation ends. Nothing
/// here is persisted unless the caller saves the generated plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentState {
    pub stage: Stage,
    /// Upcoming exam events, soonest first
    pub upcoming_exams: Vec<CalendarEvent>,
    pub study_sets: Vec<StudySet>,
    pub selected_exams: Vec<CalendarEvent>,
    /// Readiness per selected exam id, filled by the caller before the
    /// plan-generation stage advances
    pub assessments: HashMap<Uuid, Readiness>,
    pub availability: Availability,
    pub generated_plan: Option<Plan>,
    pub conversation_history: Vec<ChatMessage>,
}

impl AgentState {
    /// Look up the study set linked to an exam event
    pub fn study_set_for(&self, exam: &CalendarEvent) -> Option<&StudySet> {
        exam.study_set_id
            .and_then(|set_id| self.study_sets.iter().find(|s| s.id == set_id))
    }
}
