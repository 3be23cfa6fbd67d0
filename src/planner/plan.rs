//! Study plan generation

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::calendar::models::EventType;
use crate::calendar::utils::days_until_at;

use super::models::{AgentState, Plan, StudySession};

/// Start hours sessions cycle through across a day: 9am, 2pm, 7pm
const SESSION_START_HOURS: [u32; 3] = [9, 14, 19];

/// Minimum hours of study scheduled per exam, however high the mastery
const MIN_HOURS_NEEDED: i64 = 2;

/// Generate a study plan for the selected exams, relative to `now`.
///
/// For each selected exam the required hours scale inversely with mastery,
/// split into sessions of `hours_per_day` spaced evenly across the days
/// remaining before the exam. Exams without a linked study set, and exams
/// already due, are skipped without error and simply contribute no
/// sessions.
pub fn generate_study_plan_at(state: &AgentState, now: DateTime<Utc>) -> Plan {
    let mut sessions = Vec::new();

    for exam in &state.selected_exams {
        let Some(study_set) = state.study_set_for(exam) else {
            continue;
        };

        let days_until = days_until_at(now, exam.start_time);
        if days_until <= 0 {
            continue;
        }

        let mastery_percent = state
            .assessments
            .get(&exam.id)
            .map(|a| a.mastery_percent)
            .unwrap_or(0);

        // Lower mastery means more hours, floor of MIN_HOURS_NEEDED
        let hours_needed =
            (((100 - mastery_percent as i64) as f64 / 10.0).round() as i64).max(MIN_HOURS_NEEDED);

        let hours_per_day = state.availability.hours_per_day.unwrap_or(2.0);
        let total_sessions = (hours_needed as f64 / hours_per_day).ceil() as i64;

        // Space sessions evenly across the remaining days
        let session_interval = (days_until / total_sessions).max(1);

        let mut i = 0;
        while i < total_sessions && i * session_interval < days_until {
            let day = now.date_naive() + Duration::days(i * session_interval);
            let hour = SESSION_START_HOURS[(i % 3) as usize];
            let start_time = Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap());
            let end_time = start_time + Duration::seconds((hours_per_day * 3600.0).round() as i64);

            sessions.push(StudySession {
                study_set_id: study_set.id,
                exam_id: exam.id,
                title: format!("Study: {}", exam.title),
                description: format!("Study session for {}", study_set.title),
                start_time,
                end_time,
                event_type: EventType::StudySession,
            });

            i += 1;
        }
    }

    let total_hours = sessions
        .iter()
        .map(|s| (s.end_time - s.start_time).num_seconds() as f64 / 3600.0)
        .sum();

    Plan {
        sessions,
        total_hours,
    }
}

/// Generate a study plan relative to the current instant
pub fn generate_study_plan(state: &AgentState) -> Plan {
    generate_study_plan_at(state, Utc::now())
}
