use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use anyhow::Result;
use uuid::Uuid;

use subjectfocus::calendar::models::CalendarEvent;
use subjectfocus::planner::{
    advance_conversation, calculate_readiness, get_agent_message, initialize_agent,
    process_user_input, AgentMessage, AgentState, Plan, Readiness, Stage, StudySession,
};

use crate::app::App;

/// Interactive planning chat: pick exams, state availability, confirm the
/// generated sessions onto the calendar.
pub fn run(app: &App) -> Result<()> {
    let exams = app.calendar.upcoming_exams()?;
    let sets = app.study_sets.list_sets()?;

    let mut state = initialize_agent(exams, sets);
    print_agent(&get_agent_message(&state));

    state = advance_conversation(state);
    let message = get_agent_message(&state);
    print_agent(&message);
    if message.is_error {
        // No upcoming exams; nothing to plan
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut confirmed = false;

    while state.stage != Stage::Complete {
        print!("> ");
        io::stdout().flush()?;
        let Some(input) = lines.next().transpose()? else {
            // Conversation abandoned; the plan (if any) is discarded
            println!();
            return Ok(());
        };

        let turns_before = state.conversation_history.len();
        state = process_user_input(state, input.trim());

        // A validation failure or the review-manually decline answers
        // inline through the history; print it and take no further step
        if state.conversation_history.len() > turns_before + 1 {
            if let Some(last) = state.conversation_history.last() {
                print_text(&last.content);
            }
            continue;
        }

        if state.stage == Stage::GeneratePlan {
            print_agent(&get_agent_message(&state));
            state.assessments = compute_assessments(app, &state);
            state = advance_conversation(state);
            print_agent(&get_agent_message(&state));
            continue;
        }

        print_agent(&get_agent_message(&state));

        // Reaching the terminal stage without an inline notice means the
        // user confirmed; only then does the plan get persisted
        if state.stage == Stage::Complete {
            confirmed = true;
        }
    }

    if confirmed {
        if let Some(plan) = &state.generated_plan {
            save_plan(app, plan);
        }
    }

    Ok(())
}

/// Readiness per selected exam, fetched one exam at a time.
///
/// A failed progress read downgrades that exam to zero readiness instead
/// of aborting the loop; an exam without a linked set scores zero as well.
fn compute_assessments(app: &App, state: &AgentState) -> HashMap<Uuid, Readiness> {
    let mut assessments = HashMap::new();

    for exam in &state.selected_exams {
        let readiness = match state.study_set_for(exam) {
            None => Readiness::default(),
            Some(set) => match app.study_sets.set_progress(set.id) {
                Ok(progress) => calculate_readiness(Some(set), &progress),
                Err(e) => {
                    log::warn!("Failed to load progress for '{}': {}", set.title, e);
                    Readiness::default()
                }
            },
        };
        assessments.insert(exam.id, readiness);
    }

    assessments
}

fn save_plan(app: &App, plan: &Plan) {
    let events: Vec<CalendarEvent> = plan
        .sessions
        .iter()
        .cloned()
        .map(StudySession::into_calendar_event)
        .collect();

    match app.calendar.add_events(events) {
        Ok(count) => {
            log::info!("Saved {} study sessions to the calendar", count);
            println!(
                "Saved {} study session{} to your calendar.",
                count,
                if count == 1 { "" } else { "s" }
            );
        }
        Err(e) => {
            log::warn!("Failed to save study plan: {}", e);
            println!("There was an error saving your study sessions. Please try again.");
        }
    }
}

fn print_agent(message: &AgentMessage) {
    print_text(&message.text);
    if let Some(options) = &message.options {
        for option in options {
            println!("  - {}", option);
        }
        println!();
    }
}

fn print_text(text: &str) {
    // The agent phrases emphasis in markdown; the terminal gets plain text
    println!("{}\n", text.replace("**", ""));
}
