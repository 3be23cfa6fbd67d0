//! Conversation state machine for the study planner
//!
//! The agent walks a fixed forward-only sequence of stages:
//! welcome -> show exams -> assess readiness -> generate plan ->
//! confirm plan -> complete.
//!
//! [`get_agent_message`] renders the prompt for the current stage and
//! [`process_user_input`] consumes a user reply and returns the next state.
//! Invalid replies append a correction prompt to the history and leave the
//! stage unchanged. Two transitions happen without user input and are
//! driven by the caller through [`advance_conversation`]: leaving the
//! welcome banner, and turning assessments into a plan. The caller is
//! expected to fill [`AgentState::assessments`] before that second
//! advance; see [`calculate_readiness`](super::calculate_readiness).

use std::collections::BTreeMap;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::calendar::models::CalendarEvent;
use crate::calendar::utils::{format_date, format_date_time, time_until_string};
use crate::study_sets::models::StudySet;

use super::models::{AgentMessage, AgentState, Availability, ChatMessage, Stage};
use super::plan::generate_study_plan_at;

/// Create the state for a fresh planning conversation
pub fn initialize_agent(
    upcoming_exams: Vec<CalendarEvent>,
    study_sets: Vec<StudySet>,
) -> AgentState {
    AgentState {
        stage: Stage::Welcome,
        upcoming_exams,
        study_sets,
        selected_exams: Vec::new(),
        assessments: HashMap::new(),
        availability: Availability::default(),
        generated_plan: None,
        conversation_history: Vec::new(),
    }
}

impl AgentMessage {
    fn prompt(text: String) -> Self {
        Self {
            text,
            options: None,
            needs_user_input: true,
            is_error: false,
            is_complete: false,
        }
    }

    fn info(text: String) -> Self {
        Self {
            needs_user_input: false,
            ..Self::prompt(text)
        }
    }

    fn error(text: String) -> Self {
        Self {
            is_error: true,
            ..Self::info(text)
        }
    }
}

/// Render the agent's next message for the current stage.
///
/// Pure and deterministic: the same state always yields the same message.
pub fn get_agent_message(state: &AgentState) -> AgentMessage {
    match state.stage {
        Stage::Welcome => AgentMessage::info(
            "Hi! I'm your study planner. I'll help you create a personalized \
             study schedule for your upcoming exams. Let me check your calendar..."
                .to_string(),
        ),

        Stage::ShowExams => {
            if state.upcoming_exams.is_empty() {
                return AgentMessage::error(
                    "I couldn't find any upcoming exams in your calendar. Please add \
                     some exams to your calendar first, and then we can create a study \
                     plan together!"
                        .to_string(),
                );
            }

            let exam_list = state
                .upcoming_exams
                .iter()
                .enumerate()
                .map(|(idx, exam)| {
                    format!(
                        "{}. **{}** - {} ({})",
                        idx + 1,
                        exam.title,
                        time_until_string(exam.start_time),
                        format_date_time(exam.start_time)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");

            AgentMessage::prompt(format!(
                "I found {} upcoming exam{}:\n\n{}\n\nWhich exams would you like me to \
                 help you prepare for? (Enter the numbers separated by commas, e.g. \
                 \"1, 3\" or type \"all\" for all exams)",
                state.upcoming_exams.len(),
                if state.upcoming_exams.len() > 1 { "s" } else { "" },
                exam_list
            ))
        }

        Stage::AssessReadiness => {
            let assessments = state
                .selected_exams
                .iter()
                .enumerate()
                .map(|(idx, exam)| readiness_line(state, idx, exam))
                .collect::<Vec<_>>()
                .join("\n\n");

            AgentMessage::prompt(format!(
                "Here's your readiness assessment:\n\n{}\n\nHow many hours per day can \
                 you dedicate to studying? (Enter a number between 1-8)",
                assessments
            ))
        }

        Stage::GeneratePlan => AgentMessage::info(
            "Perfect! I'm generating your personalized study plan...".to_string(),
        ),

        Stage::ConfirmPlan => {
            let Some(plan) = &state.generated_plan else {
                return AgentMessage::error(
                    "Sorry, there was an error generating your plan. Please try again."
                        .to_string(),
                );
            };

            // Sessions per day, in date order
            let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
            for session in &plan.sessions {
                *per_day.entry(session.start_time.date_naive()).or_default() += 1;
            }

            let summary = per_day
                .iter()
                .map(|(day, count)| {
                    format!(
                        "- {}: {} session{}",
                        format_date(day_start(*day)),
                        count,
                        if *count > 1 { "s" } else { "" }
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");

            let mut message = AgentMessage::prompt(format!(
                "I've created a study plan with **{} study sessions**:\n\n{}\n\nWould \
                 you like me to add these sessions to your calendar?",
                plan.sessions.len(),
                summary
            ));
            message.options = Some(vec![
                "Yes, add to calendar".to_string(),
                "No, let me review first".to_string(),
            ]);
            message
        }

        Stage::Complete => {
            let mut message = AgentMessage::info(
                "All done! Your study sessions have been added to your calendar. Good \
                 luck with your exams!"
                    .to_string(),
            );
            message.is_complete = true;
            message
        }

        // Unreached legacy stages
        Stage::SelectExams | Stage::AskAvailability => AgentMessage::error(
            "I'm not sure what to do next. Let's start over.".to_string(),
        ),
    }
}

fn readiness_line(state: &AgentState, idx: usize, exam: &CalendarEvent) -> String {
    let Some(study_set) = state.study_set_for(exam) else {
        return format!(
            "{}. **{}**: No study set linked - I recommend creating flashcards first!",
            idx + 1,
            exam.title
        );
    };

    let mastery_percent = state
        .assessments
        .get(&exam.id)
        .map(|a| a.mastery_percent)
        .unwrap_or(0);

    let verdict = if mastery_percent >= 80 {
        "Great progress!"
    } else if mastery_percent >= 50 {
        "Making progress"
    } else {
        "Needs work"
    };

    format!(
        "{}. **{}** ({})\n   - {} flashcards ({}% mastery)\n   - {}",
        idx + 1,
        exam.title,
        time_until_string(exam.start_time),
        study_set.total_cards,
        mastery_percent,
        verdict
    )
}

fn day_start(day: NaiveDate) -> DateTime<Utc> {
    use chrono::TimeZone;
    Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).unwrap())
}

/// Consume a user reply and return the next state.
///
/// The reply is always appended to the conversation history first; invalid
/// replies then append an assistant correction and keep the stage. The
/// terminal stage ignores input entirely.
pub fn process_user_input(mut state: AgentState, input: &str) -> AgentState {
    state.conversation_history.push(ChatMessage::user(input));

    match state.stage {
        Stage::Welcome => {
            // Any reply moves past the banner
            state.stage = Stage::ShowExams;
        }

        Stage::ShowExams => {
            let normalized = input.trim().to_lowercase();
            if normalized == "all" {
                state.selected_exams = state.upcoming_exams.clone();
                state.stage = Stage::AssessReadiness;
            } else {
                let indices: Vec<usize> = normalized
                    .split(',')
                    .filter_map(|part| part.trim().parse::<usize>().ok())
                    .filter(|&n| n >= 1 && n <= state.upcoming_exams.len())
                    .collect();

                if indices.is_empty() {
                    state.conversation_history.push(ChatMessage::assistant(
                        "I didn't understand that. Please enter exam numbers \
                         (e.g. '1, 2') or 'all'.",
                    ));
                } else {
                    state.selected_exams = indices
                        .iter()
                        .map(|&n| state.upcoming_exams[n - 1].clone())
                        .collect();
                    state.stage = Stage::AssessReadiness;
                }
            }
        }

        Stage::AssessReadiness => match input.trim().parse::<f64>() {
            Ok(hours) if (1.0..=8.0).contains(&hours) => {
                state.availability.hours_per_day = Some(hours);
                state.stage = Stage::GeneratePlan;
            }
            _ => {
                state.conversation_history.push(ChatMessage::assistant(
                    "Please enter a valid number of hours between 1 and 8.",
                ));
            }
        },

        // Advanced by the caller via advance_conversation, not by input
        Stage::GeneratePlan => {}

        Stage::ConfirmPlan => {
            if !input.to_lowercase().contains("yes") {
                state.conversation_history.push(ChatMessage::assistant(
                    "No problem! You can review the plan in your calendar and make \
                     adjustments as needed.",
                ));
            }
            state.stage = Stage::Complete;
        }

        Stage::Complete | Stage::SelectExams | Stage::AskAvailability => {}
    }

    state
}

/// Run the stage transitions that need no user input, relative to `now`.
///
/// Leaving the welcome banner just moves to the exam listing. Leaving the
/// plan-generation stage turns the assessments already on the state into a
/// plan and moves to confirmation.
pub fn advance_conversation_at(mut state: AgentState, now: DateTime<Utc>) -> AgentState {
    match state.stage {
        Stage::Welcome => {
            state.stage = Stage::ShowExams;
        }
        Stage::GeneratePlan => {
            let plan = generate_study_plan_at(&state, now);
            state.generated_plan = Some(plan);
            state.stage = Stage::ConfirmPlan;
        }
        _ => {}
    }

    state
}

/// Caller-driven auto-advance relative to the current instant
pub fn advance_conversation(state: AgentState) -> AgentState {
    advance_conversation_at(state, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::models::{ChatRole, Readiness};
    use chrono::{Duration, TimeZone};

    fn utc(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    fn exam(title: &str, start_time: DateTime<Utc>, set: Option<&StudySet>) -> CalendarEvent {
        CalendarEvent::exam(title.to_string(), start_time, set.map(|s| s.id))
    }

    fn set_with_cards(title: &str, total: usize) -> StudySet {
        let mut set = StudySet::new(title.to_string());
        set.total_cards = total;
        set
    }

    fn soon() -> DateTime<Utc> {
        Utc::now() + Duration::days(10)
    }

    #[test]
    fn test_welcome_needs_no_input() {
        let state = initialize_agent(vec![], vec![]);
        let message = get_agent_message(&state);

        assert!(!message.needs_user_input);
        assert!(message.text.contains("study planner"));
    }

    #[test]
    fn test_show_exams_without_exams_is_error() {
        let state = initialize_agent(vec![], vec![]);
        let state = advance_conversation(state);

        assert_eq!(state.stage, Stage::ShowExams);
        let message = get_agent_message(&state);
        assert!(message.is_error);
        assert!(!message.needs_user_input);
    }

    #[test]
    fn test_show_exams_lists_and_prompts() {
        let set = set_with_cards("Bio set", 10);
        let exams = vec![
            exam("Biology final", soon(), Some(&set)),
            exam("Chemistry quiz", soon(), None),
        ];

        let mut state = initialize_agent(exams, vec![set]);
        state.stage = Stage::ShowExams;

        let message = get_agent_message(&state);
        assert!(message.needs_user_input);
        assert!(message.text.contains("2 upcoming exams"));
        assert!(message.text.contains("1. **Biology final**"));
        assert!(message.text.contains("2. **Chemistry quiz**"));
    }

    #[test]
    fn test_select_all_exams() {
        let exams = vec![exam("A", soon(), None), exam("B", soon(), None)];
        let mut state = initialize_agent(exams, vec![]);
        state.stage = Stage::ShowExams;

        let state = process_user_input(state, "ALL");

        assert_eq!(state.stage, Stage::AssessReadiness);
        assert_eq!(state.selected_exams.len(), 2);
    }

    #[test]
    fn test_select_exams_by_index() {
        let exams = vec![
            exam("A", soon(), None),
            exam("B", soon(), None),
            exam("C", soon(), None),
        ];
        let mut state = initialize_agent(exams, vec![]);
        state.stage = Stage::ShowExams;

        let state = process_user_input(state, "1, 3");

        assert_eq!(state.stage, Stage::AssessReadiness);
        let titles: Vec<&str> = state
            .selected_exams
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn test_out_of_range_selection_stays_put() {
        let exams = vec![
            exam("A", soon(), None),
            exam("B", soon(), None),
            exam("C", soon(), None),
        ];
        let mut state = initialize_agent(exams, vec![]);
        state.stage = Stage::ShowExams;

        let state = process_user_input(state, "5");

        assert_eq!(state.stage, Stage::ShowExams);
        assert!(state.selected_exams.is_empty());

        // The user turn plus an assistant correction
        let last = state.conversation_history.last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert!(last.content.contains("didn't understand"));
    }

    #[test]
    fn test_hours_validation() {
        let mut state = initialize_agent(vec![], vec![]);
        state.stage = Stage::AssessReadiness;

        let state = process_user_input(state, "0");
        assert_eq!(state.stage, Stage::AssessReadiness);

        let state = process_user_input(state, "9");
        assert_eq!(state.stage, Stage::AssessReadiness);
        assert!(state.availability.hours_per_day.is_none());

        let state = process_user_input(state, "3");
        assert_eq!(state.stage, Stage::GeneratePlan);
        assert_eq!(state.availability.hours_per_day, Some(3.0));
    }

    #[test]
    fn test_every_input_lands_in_history() {
        let mut state = initialize_agent(vec![], vec![]);
        state.stage = Stage::AssessReadiness;

        let state = process_user_input(state, "not a number");

        assert_eq!(state.conversation_history.len(), 2);
        assert_eq!(state.conversation_history[0].role, ChatRole::User);
        assert_eq!(state.conversation_history[0].content, "not a number");
        assert_eq!(state.conversation_history[1].role, ChatRole::Assistant);
    }

    #[test]
    fn test_generate_plan_advance_builds_plan() {
        let now = utc(2026, 3, 1, 9);
        let set = set_with_cards("Bio set", 10);
        let bio = exam("Biology", utc(2026, 3, 11, 9), Some(&set));

        let mut state = initialize_agent(vec![bio.clone()], vec![set]);
        state.stage = Stage::GeneratePlan;
        state.selected_exams = vec![bio.clone()];
        state.availability.hours_per_day = Some(2.0);
        state.assessments.insert(
            bio.id,
            Readiness {
                mastery_percent: 50,
                ..Readiness::default()
            },
        );

        let state = advance_conversation_at(state, now);

        assert_eq!(state.stage, Stage::ConfirmPlan);
        let plan = state.generated_plan.as_ref().unwrap();
        assert_eq!(plan.sessions.len(), 3);

        let message = get_agent_message(&state);
        assert!(message.text.contains("**3 study sessions**"));
        assert!(message.options.is_some());
    }

    #[test]
    fn test_confirm_plan_without_plan_is_error() {
        let mut state = initialize_agent(vec![], vec![]);
        state.stage = Stage::ConfirmPlan;

        let message = get_agent_message(&state);
        assert!(message.is_error);
    }

    #[test]
    fn test_confirm_yes_completes_silently() {
        let mut state = initialize_agent(vec![], vec![]);
        state.stage = Stage::ConfirmPlan;

        let state = process_user_input(state, "Yes, add to calendar");

        assert_eq!(state.stage, Stage::Complete);
        // Only the user turn was recorded
        assert_eq!(state.conversation_history.len(), 1);
        assert!(get_agent_message(&state).is_complete);
    }

    #[test]
    fn test_confirm_no_completes_with_notice() {
        let mut state = initialize_agent(vec![], vec![]);
        state.stage = Stage::ConfirmPlan;

        let state = process_user_input(state, "No, let me review first");

        assert_eq!(state.stage, Stage::Complete);
        let last = state.conversation_history.last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert!(last.content.contains("No problem"));
    }

    #[test]
    fn test_complete_ignores_input() {
        let mut state = initialize_agent(vec![], vec![]);
        state.stage = Stage::Complete;

        let state = process_user_input(state, "hello?");
        assert_eq!(state.stage, Stage::Complete);
        assert_eq!(state.conversation_history.len(), 1);
    }

    #[test]
    fn test_unreached_stages_fall_back() {
        let mut state = initialize_agent(vec![], vec![]);
        state.stage = Stage::SelectExams;
        assert!(get_agent_message(&state).is_error);

        state.stage = Stage::AskAvailability;
        assert!(get_agent_message(&state).is_error);
    }

    #[test]
    fn test_full_conversation_walkthrough() {
        let now = utc(2026, 3, 1, 9);
        let set = set_with_cards("Bio set", 10);
        let bio = exam("Biology final", utc(2026, 3, 11, 9), Some(&set));

        // Welcome banner, then auto-advance to the exam listing
        let state = initialize_agent(vec![bio], vec![set]);
        assert!(!get_agent_message(&state).needs_user_input);
        let state = advance_conversation_at(state, now);
        assert!(get_agent_message(&state).needs_user_input);

        // Pick the only exam
        let state = process_user_input(state, "1");
        assert_eq!(state.stage, Stage::AssessReadiness);
        assert_eq!(state.selected_exams.len(), 1);

        // Commit three hours a day
        let state = process_user_input(state, "3");
        assert_eq!(state.stage, Stage::GeneratePlan);

        // Caller computes assessments (none here: zero readiness), advances
        let state = advance_conversation_at(state, now);
        assert_eq!(state.stage, Stage::ConfirmPlan);
        assert!(state.generated_plan.is_some());

        // Confirm
        let state = process_user_input(state, "yes");
        assert_eq!(state.stage, Stage::Complete);
    }
}
