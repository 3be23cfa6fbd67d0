//! Data models for study sets and flashcards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A study set is a titled collection of flashcards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySet {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub total_cards: usize,
    #[serde(default)]
    pub flashcard_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudySet {
    pub fn new(title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            total_cards: 0,
            flashcard_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A flashcard with question (front) and answer (back)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub study_set_id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flashcard {
    pub fn new(study_set_id: Uuid, front: String, back: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            study_set_id,
            front,
            back,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Review tally for a single card.
///
/// A row exists only once the card has been drilled at least once; cards
/// without a row count as unreviewed in readiness calculations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardProgress {
    pub flashcard_id: Uuid,
    #[serde(default)]
    pub times_seen: u32,
    #[serde(default)]
    pub times_correct: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl FlashcardProgress {
    pub fn new(flashcard_id: Uuid) -> Self {
        Self {
            flashcard_id,
            times_seen: 0,
            times_correct: 0,
            last_reviewed_at: None,
        }
    }

    /// Fraction of reviews answered correctly, 0 when never seen
    pub fn correct_rate(&self) -> f64 {
        if self.times_seen > 0 {
            self.times_correct as f64 / self.times_seen as f64
        } else {
            0.0
        }
    }
}
