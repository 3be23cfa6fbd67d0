use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};

use subjectfocus::calendar::models::CalendarEvent;
use subjectfocus::calendar::utils::{format_date_time, time_until_string};

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let exams = app.calendar.upcoming_exams()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&exams)?);
        }
        OutputFormat::Plain => {
            if exams.is_empty() {
                println!("No upcoming exams. Add one with `exams add <title> <when>`.");
                return Ok(());
            }

            for exam in &exams {
                let linked = if exam.study_set_id.is_some() {
                    ""
                } else {
                    "  (no study set linked)"
                };
                println!(
                    "{} - {} ({}){}",
                    exam.title,
                    time_until_string(exam.start_time),
                    format_date_time(exam.start_time),
                    linked
                );
            }
        }
    }

    Ok(())
}

pub fn run_add(app: &App, title: &str, when: &str, set_name: Option<&str>) -> Result<()> {
    let start_time = parse_when(when)?;

    let study_set_id = match set_name {
        Some(name) => Some(app.find_set(name)?.id),
        None => None,
    };

    let exam = app
        .calendar
        .add_event(CalendarEvent::exam(title.to_string(), start_time, study_set_id))
        .context("Failed to save exam")?;

    println!(
        "Added exam '{}' on {}",
        exam.title,
        format_date_time(exam.start_time)
    );
    Ok(())
}

/// Parse "YYYY-MM-DD HH:MM" or "YYYY-MM-DD" (defaulting to 9am)
fn parse_when(when: &str) -> Result<chrono::DateTime<Utc>> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(when, "%Y-%m-%d %H:%M") {
        return Ok(Utc.from_utc_datetime(&datetime));
    }

    if let Ok(date) = NaiveDate::parse_from_str(when, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_hms_opt(9, 0, 0).unwrap()));
    }

    bail!("Couldn't parse '{}'. Use \"YYYY-MM-DD\" or \"YYYY-MM-DD HH:MM\".", when)
}
