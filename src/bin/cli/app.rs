use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use subjectfocus::calendar::CalendarStorage;
use subjectfocus::study_sets::{StudySet, StudySetStorage};

/// Shared application state for CLI commands
pub struct App {
    pub study_sets: StudySetStorage,
    pub calendar: CalendarStorage,
}

impl App {
    /// Initialize from the given or default data directory
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_data_dir().context("Failed to get data directory")?,
        };

        let study_sets = StudySetStorage::new(data_dir.clone())
            .context("Failed to initialize study set storage")?;
        let calendar = CalendarStorage::new(data_dir)
            .context("Failed to initialize calendar storage")?;

        Ok(Self {
            study_sets,
            calendar,
        })
    }

    /// Find a study set by title (case-insensitive prefix match)
    pub fn find_set(&self, title: &str) -> Result<StudySet> {
        let sets = self.study_sets.list_sets()
            .context("Failed to list study sets")?;

        let title_lower = title.to_lowercase();

        // Exact match first
        if let Some(set) = sets.iter().find(|s| s.title.to_lowercase() == title_lower) {
            return Ok(set.clone());
        }

        // Prefix match
        let matches: Vec<&StudySet> = sets.iter()
            .filter(|s| s.title.to_lowercase().starts_with(&title_lower))
            .collect();

        match matches.len() {
            0 => bail!("No study set matching '{}'. Available sets:\n{}", title,
                sets.iter().map(|s| format!("  - {}", s.title)).collect::<Vec<_>>().join("\n")),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous set title '{}'. Matches:\n{}", title,
                matches.iter().map(|s| format!("  - {}", s.title)).collect::<Vec<_>>().join("\n")),
        }
    }
}

/// Platform data directory for subjectfocus
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("subjectfocus"))
}
