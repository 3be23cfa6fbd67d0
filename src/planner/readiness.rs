//! Readiness assessment from flashcard review progress

use crate::study_sets::models::{FlashcardProgress, StudySet};

use super::models::Readiness;

/// Estimate exam readiness from review coverage and correctness.
///
/// Mastery is the review coverage (cards reviewed over total cards) scaled
/// by the average correct rate of the reviewed cards, as a percentage. The
/// raw value can exceed 100 when more progress rows exist than the set
/// currently counts, so it is capped there.
///
/// A missing set or one with no cards scores zero across the board.
pub fn calculate_readiness(study_set: Option<&StudySet>, progress: &[FlashcardProgress]) -> Readiness {
    let total_cards = match study_set {
        Some(set) if set.total_cards > 0 => set.total_cards,
        _ => return Readiness::default(),
    };

    let cards_reviewed = progress.len();

    let rate_sum: f64 = progress.iter().map(|p| p.correct_rate()).sum();
    let avg_correct_rate = if cards_reviewed > 0 {
        rate_sum / cards_reviewed as f64
    } else {
        0.0
    };

    let coverage = cards_reviewed as f64 / total_cards as f64;
    let mastery_percent = (coverage * avg_correct_rate * 100.0).round().min(100.0) as u8;

    Readiness {
        mastery_percent,
        cards_reviewed,
        total_cards,
        avg_correct_rate: (avg_correct_rate * 100.0).round() as u8,
    }
}
