//! Storage operations for study sets
//!
//! Directory structure under the data directory:
//! ```
//! study_sets/
//! ├── sets.json            # Array of all study sets
//! ├── cards/
//! │   └── {card-id}.json   # Individual card files
//! └── progress/
//!     └── {card-id}.json   # Review tally for a card
//! ```

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::models::*;

#[derive(Error, Debug)]
pub enum StudySetStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Study set not found: {0}")]
    SetNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, StudySetStorageError>;

/// Storage manager for study sets, cards, and review progress
pub struct StudySetStorage {
    sets_dir: PathBuf,
}

impl StudySetStorage {
    /// Create study set storage rooted at the given data directory
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let sets_dir = data_dir.join("study_sets");
        fs::create_dir_all(sets_dir.join("cards"))?;
        fs::create_dir_all(sets_dir.join("progress"))?;

        let storage = Self { sets_dir };
        let sets_path = storage.sets_path();
        if !sets_path.exists() {
            let empty: Vec<StudySet> = Vec::new();
            fs::write(&sets_path, serde_json::to_string_pretty(&empty)?)?;
        }

        Ok(storage)
    }

    fn sets_path(&self) -> PathBuf {
        self.sets_dir.join("sets.json")
    }

    fn card_path(&self, card_id: Uuid) -> PathBuf {
        self.sets_dir.join("cards").join(format!("{}.json", card_id))
    }

    fn progress_path(&self, card_id: Uuid) -> PathBuf {
        self.sets_dir
            .join("progress")
            .join(format!("{}.json", card_id))
    }

    // ==================== Set Operations ====================

    /// List all study sets
    pub fn list_sets(&self) -> Result<Vec<StudySet>> {
        let path = self.sets_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let sets: Vec<StudySet> = serde_json::from_str(&content)?;
        Ok(sets)
    }

    fn save_sets(&self, sets: &[StudySet]) -> Result<()> {
        fs::write(self.sets_path(), serde_json::to_string_pretty(sets)?)?;
        Ok(())
    }

    /// Get a specific study set
    pub fn get_set(&self, set_id: Uuid) -> Result<StudySet> {
        self.list_sets()?
            .into_iter()
            .find(|s| s.id == set_id)
            .ok_or(StudySetStorageError::SetNotFound(set_id))
    }

    /// Create a new study set
    pub fn create_set(&self, title: String, description: Option<String>) -> Result<StudySet> {
        let mut set = StudySet::new(title);
        set.description = description;

        let mut sets = self.list_sets()?;
        sets.push(set.clone());
        self.save_sets(&sets)?;

        Ok(set)
    }

    /// Update a study set
    pub fn update_set(&self, set: &StudySet) -> Result<()> {
        let mut sets = self.list_sets()?;
        let slot = sets
            .iter_mut()
            .find(|s| s.id == set.id)
            .ok_or(StudySetStorageError::SetNotFound(set.id))?;

        *slot = set.clone();
        slot.updated_at = Utc::now();
        self.save_sets(&sets)
    }

    /// Delete a study set along with its cards and progress
    pub fn delete_set(&self, set_id: Uuid) -> Result<()> {
        let set = self.get_set(set_id)?;

        for card_id in &set.flashcard_ids {
            let card_path = self.card_path(*card_id);
            if card_path.exists() {
                fs::remove_file(&card_path)?;
            }
            let progress_path = self.progress_path(*card_id);
            if progress_path.exists() {
                fs::remove_file(&progress_path)?;
            }
        }

        let mut sets = self.list_sets()?;
        sets.retain(|s| s.id != set_id);
        self.save_sets(&sets)
    }

    // ==================== Card Operations ====================

    /// Add a card to a set, keeping the set's card count in sync
    pub fn add_card(&self, set_id: Uuid, front: String, back: String) -> Result<Flashcard> {
        let mut set = self.get_set(set_id)?;

        let mut card = Flashcard::new(set_id, front, back);
        card.position = set.flashcard_ids.len() as i32;
        fs::write(
            self.card_path(card.id),
            serde_json::to_string_pretty(&card)?,
        )?;

        set.flashcard_ids.push(card.id);
        set.total_cards = set.flashcard_ids.len();
        self.update_set(&set)?;

        Ok(card)
    }

    /// List the cards of a set, ordered by position
    pub fn list_cards(&self, set_id: Uuid) -> Result<Vec<Flashcard>> {
        let set = self.get_set(set_id)?;

        let mut cards = Vec::new();
        for card_id in &set.flashcard_ids {
            let path = self.card_path(*card_id);
            if !path.exists() {
                log::warn!("Card file missing for {}", card_id);
                continue;
            }
            let content = fs::read_to_string(&path)?;
            cards.push(serde_json::from_str::<Flashcard>(&content)?);
        }

        cards.sort_by_key(|c| c.position);
        Ok(cards)
    }

    /// Get a single card
    pub fn get_card(&self, card_id: Uuid) -> Result<Flashcard> {
        let path = self.card_path(card_id);
        if !path.exists() {
            return Err(StudySetStorageError::CardNotFound(card_id));
        }

        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Delete a card and its progress, updating the owning set
    pub fn delete_card(&self, card_id: Uuid) -> Result<()> {
        let card = self.get_card(card_id)?;

        fs::remove_file(self.card_path(card_id))?;
        let progress_path = self.progress_path(card_id);
        if progress_path.exists() {
            fs::remove_file(&progress_path)?;
        }

        let mut set = self.get_set(card.study_set_id)?;
        set.flashcard_ids.retain(|id| *id != card_id);
        set.total_cards = set.flashcard_ids.len();
        self.update_set(&set)
    }

    // ==================== Progress Operations ====================

    /// Get the review tally for a card, zeroed if it has never been drilled
    pub fn get_progress(&self, card_id: Uuid) -> Result<FlashcardProgress> {
        let path = self.progress_path(card_id);
        if !path.exists() {
            return Ok(FlashcardProgress::new(card_id));
        }

        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Record one review of a card
    pub fn record_review(&self, card_id: Uuid, correct: bool) -> Result<FlashcardProgress> {
        // Refuse tallies for cards that don't exist
        self.get_card(card_id)?;

        let mut progress = self.get_progress(card_id)?;
        progress.times_seen += 1;
        if correct {
            progress.times_correct += 1;
        }
        progress.last_reviewed_at = Some(Utc::now());

        fs::write(
            self.progress_path(card_id),
            serde_json::to_string_pretty(&progress)?,
        )?;

        Ok(progress)
    }

    /// Review tallies for every drilled card of a set.
    ///
    /// Cards that were never reviewed have no tally on disk and are absent
    /// from the result, so `len()` is the number of cards reviewed.
    pub fn set_progress(&self, set_id: Uuid) -> Result<Vec<FlashcardProgress>> {
        let set = self.get_set(set_id)?;

        let mut rows = Vec::new();
        for card_id in &set.flashcard_ids {
            let path = self.progress_path(*card_id);
            if !path.exists() {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            rows.push(serde_json::from_str::<FlashcardProgress>(&content)?);
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (StudySetStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = StudySetStorage::new(temp_dir.path().to_path_buf()).unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_create_and_get_set() {
        let (storage, _temp) = create_test_storage();

        let set = storage
            .create_set("Biology 101".to_string(), Some("Cell structure".to_string()))
            .unwrap();

        let retrieved = storage.get_set(set.id).unwrap();
        assert_eq!(retrieved.title, "Biology 101");
        assert_eq!(retrieved.description.as_deref(), Some("Cell structure"));
        assert_eq!(retrieved.total_cards, 0);
    }

    #[test]
    fn test_add_card_updates_set() {
        let (storage, _temp) = create_test_storage();

        let set = storage.create_set("Chemistry".to_string(), None).unwrap();
        let card1 = storage
            .add_card(set.id, "H2O".to_string(), "Water".to_string())
            .unwrap();
        let card2 = storage
            .add_card(set.id, "NaCl".to_string(), "Salt".to_string())
            .unwrap();

        let updated = storage.get_set(set.id).unwrap();
        assert_eq!(updated.total_cards, 2);
        assert_eq!(updated.flashcard_ids, vec![card1.id, card2.id]);

        let cards = storage.list_cards(set.id).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front, "H2O");
        assert_eq!(cards[1].position, 1);
    }

    #[test]
    fn test_delete_card_updates_set() {
        let (storage, _temp) = create_test_storage();

        let set = storage.create_set("History".to_string(), None).unwrap();
        let card = storage
            .add_card(set.id, "1066".to_string(), "Battle of Hastings".to_string())
            .unwrap();

        storage.delete_card(card.id).unwrap();

        let updated = storage.get_set(set.id).unwrap();
        assert_eq!(updated.total_cards, 0);
        assert!(storage.get_card(card.id).is_err());
    }

    #[test]
    fn test_record_review_tallies() {
        let (storage, _temp) = create_test_storage();

        let set = storage.create_set("Physics".to_string(), None).unwrap();
        let card = storage
            .add_card(set.id, "F = ?".to_string(), "ma".to_string())
            .unwrap();

        storage.record_review(card.id, true).unwrap();
        storage.record_review(card.id, false).unwrap();
        let progress = storage.record_review(card.id, true).unwrap();

        assert_eq!(progress.times_seen, 3);
        assert_eq!(progress.times_correct, 2);
        assert!(progress.last_reviewed_at.is_some());
    }

    #[test]
    fn test_record_review_unknown_card() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.record_review(Uuid::new_v4(), true).is_err());
    }

    #[test]
    fn test_set_progress_only_reviewed_cards() {
        let (storage, _temp) = create_test_storage();

        let set = storage.create_set("Latin".to_string(), None).unwrap();
        let drilled = storage
            .add_card(set.id, "aqua".to_string(), "water".to_string())
            .unwrap();
        storage
            .add_card(set.id, "ignis".to_string(), "fire".to_string())
            .unwrap();

        storage.record_review(drilled.id, true).unwrap();

        let rows = storage.set_progress(set.id).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].flashcard_id, drilled.id);
    }

    #[test]
    fn test_delete_set_removes_cards() {
        let (storage, _temp) = create_test_storage();

        let set = storage.create_set("To delete".to_string(), None).unwrap();
        let card = storage
            .add_card(set.id, "front".to_string(), "back".to_string())
            .unwrap();
        storage.record_review(card.id, true).unwrap();

        storage.delete_set(set.id).unwrap();

        assert!(storage.get_set(set.id).is_err());
        assert!(storage.get_card(card.id).is_err());
    }
}
