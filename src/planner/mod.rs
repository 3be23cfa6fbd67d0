//! Conversational study planner
//!
//! This module provides:
//! - The planning agent's conversation state machine
//! - Readiness assessment from flashcard review progress
//! - Study plan generation (sessions spread across the days before an exam)
//!
//! The agent is a reducer over an owned [`AgentState`] value: callers thread
//! the state through [`process_user_input`] and [`advance_conversation`] and
//! render prompts with [`get_agent_message`]. All functions here are pure;
//! loading exams, sets, and progress is the caller's job.

pub mod agent;
pub mod models;
pub mod plan;
pub mod readiness;

pub use agent::{
    advance_conversation, advance_conversation_at, get_agent_message, initialize_agent,
    process_user_input,
};
pub use models::*;
pub use plan::{generate_study_plan, generate_study_plan_at};
pub use readiness::calculate_readiness;
