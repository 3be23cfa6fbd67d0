//! Storage operations for calendar events
//!
//! All events live in a single JSON file under the data directory:
//! ```
//! {data-dir}/calendar/events.json
//! ```

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{CalendarEvent, EventType};

#[derive(Error, Debug)]
pub enum CalendarStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Event not found: {0}")]
    EventNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, CalendarStorageError>;

/// Storage manager for calendar events
pub struct CalendarStorage {
    calendar_dir: PathBuf,
}

impl CalendarStorage {
    /// Create calendar storage rooted at the given data directory
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let calendar_dir = data_dir.join("calendar");
        fs::create_dir_all(&calendar_dir)?;

        Ok(Self { calendar_dir })
    }

    fn events_path(&self) -> PathBuf {
        self.calendar_dir.join("events.json")
    }

    /// List all events
    pub fn list_events(&self) -> Result<Vec<CalendarEvent>> {
        let path = self.events_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let events: Vec<CalendarEvent> = serde_json::from_str(&content)?;
        Ok(events)
    }

    fn save_events(&self, events: &[CalendarEvent]) -> Result<()> {
        fs::write(self.events_path(), serde_json::to_string_pretty(events)?)?;
        Ok(())
    }

    /// Get a single event
    pub fn get_event(&self, event_id: Uuid) -> Result<CalendarEvent> {
        self.list_events()?
            .into_iter()
            .find(|e| e.id == event_id)
            .ok_or(CalendarStorageError::EventNotFound(event_id))
    }

    /// Add a single event
    pub fn add_event(&self, event: CalendarEvent) -> Result<CalendarEvent> {
        let mut events = self.list_events()?;
        events.push(event.clone());
        self.save_events(&events)?;
        Ok(event)
    }

    /// Add a batch of events, e.g. the sessions of a generated study plan
    pub fn add_events(&self, new_events: Vec<CalendarEvent>) -> Result<usize> {
        let count = new_events.len();
        let mut events = self.list_events()?;
        events.extend(new_events);
        self.save_events(&events)?;
        Ok(count)
    }

    /// Update an existing event
    pub fn update_event(&self, event: &CalendarEvent) -> Result<()> {
        let mut events = self.list_events()?;
        let slot = events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or(CalendarStorageError::EventNotFound(event.id))?;

        *slot = event.clone();
        slot.updated_at = Utc::now();
        self.save_events(&events)?;
        Ok(())
    }

    /// Delete an event
    pub fn delete_event(&self, event_id: Uuid) -> Result<()> {
        let mut events = self.list_events()?;
        let before = events.len();
        events.retain(|e| e.id != event_id);
        if events.len() == before {
            return Err(CalendarStorageError::EventNotFound(event_id));
        }

        self.save_events(&events)?;
        Ok(())
    }

    /// Events starting within the given range, sorted by start time
    pub fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        let mut events: Vec<CalendarEvent> = self
            .list_events()?
            .into_iter()
            .filter(|e| e.start_time >= start && e.start_time <= end)
            .collect();
        events.sort_by_key(|e| e.start_time);
        Ok(events)
    }

    /// Exams at or after `now`, soonest first
    pub fn upcoming_exams_at(&self, now: DateTime<Utc>) -> Result<Vec<CalendarEvent>> {
        let mut exams: Vec<CalendarEvent> = self
            .list_events()?
            .into_iter()
            .filter(|e| e.event_type == EventType::Exam && e.start_time >= now)
            .collect();
        exams.sort_by_key(|e| e.start_time);
        Ok(exams)
    }

    /// Exams from the current instant onward
    pub fn upcoming_exams(&self) -> Result<Vec<CalendarEvent>> {
        self.upcoming_exams_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn create_test_storage() -> (CalendarStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = CalendarStorage::new(temp_dir.path().to_path_buf()).unwrap();
        (storage, temp_dir)
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_add_and_get_event() {
        let (storage, _temp) = create_test_storage();

        let event = CalendarEvent::exam("Biology final".to_string(), utc(2026, 5, 10, 9), None);
        let added = storage.add_event(event.clone()).unwrap();
        assert_eq!(added.id, event.id);

        let retrieved = storage.get_event(event.id).unwrap();
        assert_eq!(retrieved.title, "Biology final");
        assert_eq!(retrieved.event_type, EventType::Exam);
    }

    #[test]
    fn test_upcoming_exams_filters_and_sorts() {
        let (storage, _temp) = create_test_storage();
        let now = utc(2026, 3, 1, 12);

        let past_exam = CalendarEvent::exam("Old exam".to_string(), utc(2026, 2, 1, 9), None);
        let later_exam = CalendarEvent::exam("Later exam".to_string(), utc(2026, 4, 1, 9), None);
        let sooner_exam = CalendarEvent::exam("Sooner exam".to_string(), utc(2026, 3, 10, 9), None);
        let session = CalendarEvent::new(
            "Study time".to_string(),
            EventType::StudySession,
            utc(2026, 3, 20, 9),
        );

        storage.add_event(past_exam).unwrap();
        storage.add_event(later_exam).unwrap();
        storage.add_event(sooner_exam).unwrap();
        storage.add_event(session).unwrap();

        let upcoming = storage.upcoming_exams_at(now).unwrap();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].title, "Sooner exam");
        assert_eq!(upcoming[1].title, "Later exam");
    }

    #[test]
    fn test_add_events_bulk() {
        let (storage, _temp) = create_test_storage();

        let sessions: Vec<CalendarEvent> = (0..3)
            .map(|i| {
                CalendarEvent::new(
                    format!("Session {}", i),
                    EventType::StudySession,
                    utc(2026, 3, 10 + i, 9),
                )
            })
            .collect();

        let count = storage.add_events(sessions).unwrap();
        assert_eq!(count, 3);
        assert_eq!(storage.list_events().unwrap().len(), 3);
    }

    #[test]
    fn test_delete_event() {
        let (storage, _temp) = create_test_storage();

        let event = CalendarEvent::exam("To delete".to_string(), utc(2026, 5, 1, 9), None);
        storage.add_event(event.clone()).unwrap();
        storage.delete_event(event.id).unwrap();

        assert!(storage.get_event(event.id).is_err());
        assert!(storage.delete_event(event.id).is_err());
    }

    #[test]
    fn test_events_between() {
        let (storage, _temp) = create_test_storage();

        storage
            .add_event(CalendarEvent::exam("In range".to_string(), utc(2026, 3, 15, 9), None))
            .unwrap();
        storage
            .add_event(CalendarEvent::exam("Out of range".to_string(), utc(2026, 6, 1, 9), None))
            .unwrap();

        let events = storage
            .events_between(utc(2026, 3, 1, 0), utc(2026, 3, 31, 23))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "In range");
    }
}
