use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate, Utc};

use subjectfocus::calendar::models::EventType;
use subjectfocus::calendar::utils::{group_events_by_date, month_grid};

use crate::app::App;
use crate::OutputFormat;

/// Render a month of the calendar with exam and study-session markers
pub fn run(app: &App, month: Option<&str>, format: &OutputFormat) -> Result<()> {
    let month = match month {
        Some(raw) => parse_month(raw)?,
        None => Utc::now().date_naive().with_day(1).unwrap(),
    };

    let grid = month_grid(month);
    let events = app.calendar.list_events()?;
    let by_date = group_events_by_date(&events);

    match format {
        OutputFormat::Json => {
            let days: Vec<serde_json::Value> = grid
                .iter()
                .map(|day| {
                    let events: Vec<_> = by_date.get(day).cloned().unwrap_or_default();
                    serde_json::json!({
                        "date": day.to_string(),
                        "inMonth": day.month() == month.month(),
                        "events": events,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&days)?);
        }
        OutputFormat::Plain => {
            println!("{}", month.format("%B %Y"));
            println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");

            for week in grid.chunks(7) {
                let row = week
                    .iter()
                    .map(|day| {
                        let marker = day_marker(&by_date, day);
                        if day.month() == month.month() {
                            format!("{:>3}{}", day.day(), marker)
                        } else {
                            // Filler days from adjacent months
                            format!("  .{}", marker)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{}", row);
            }

            println!("\n  E = exam, s = study session");
        }
    }

    Ok(())
}

fn day_marker(
    by_date: &std::collections::BTreeMap<NaiveDate, Vec<subjectfocus::calendar::CalendarEvent>>,
    day: &NaiveDate,
) -> char {
    let Some(events) = by_date.get(day) else {
        return ' ';
    };

    if events.iter().any(|e| e.event_type == EventType::Exam) {
        'E'
    } else if events.iter().any(|e| e.event_type == EventType::StudySession) {
        's'
    } else {
        ' '
    }
}

/// Parse a month given as "YYYY-MM"
fn parse_month(raw: &str) -> Result<NaiveDate> {
    let Some((year, month)) = raw.split_once('-') else {
        bail!("Couldn't parse '{}'. Use \"YYYY-MM\".", raw);
    };

    let parsed = year
        .parse::<i32>()
        .ok()
        .zip(month.parse::<u32>().ok())
        .and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1));

    match parsed {
        Some(date) => Ok(date),
        None => bail!("Couldn't parse '{}'. Use \"YYYY-MM\".", raw),
    }
}
