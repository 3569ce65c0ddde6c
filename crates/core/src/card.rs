//! Status cards.
//!
//! A card is the flat record the waiting-room display renders for one patient: identifier,
//! score, urgency tier with its colours, the retained readings and the screening answers.
//! Cards are stored as one JSON file per patient under the configured card directory:
//!
//! `<card_dir>/<identifier>.json`
//!
//! Rendering the card (HTML or otherwise) and serving the directory happen elsewhere.

use crate::checklist::CovidSymptom;
use crate::constants::CARD_FILE_EXTENSION;
use crate::patient::{Assessment, PatientSnapshot};
use crate::{TriageError, TriageResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    pub symptom: CovidSymptom,
    pub question: String,
    pub answer: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusCard {
    pub identifier: u64,
    pub total_score: u32,
    pub urgency: String,
    pub color_hex: String,
    pub color_name: String,
    pub temperature: f64,
    pub blood_pressure: f64,
    pub oxygen_saturation: f64,
    pub covid: Vec<ChecklistEntry>,
    pub published_at: DateTime<Utc>,
}

impl StatusCard {
    /// Builds a card from a record snapshot and its assessment.
    pub fn new(snapshot: &PatientSnapshot, assessment: &Assessment) -> Self {
        let covid = snapshot
            .covid_checklist
            .iter()
            .map(|(symptom, answer)| ChecklistEntry {
                symptom,
                question: symptom.description().to_string(),
                answer,
            })
            .collect();

        Self {
            identifier: snapshot.identifier,
            total_score: assessment.total_score,
            urgency: assessment.tier.label().to_string(),
            color_hex: assessment.tier.color_hex().to_string(),
            color_name: assessment.tier.color_name().to_string(),
            temperature: snapshot.temperature,
            blood_pressure: snapshot.blood_pressure,
            oxygen_saturation: snapshot.oxygen_saturation,
            covid,
            published_at: Utc::now(),
        }
    }
}

/// Reads and writes status cards in a single directory.
#[derive(Clone, Debug)]
pub struct CardStore {
    dir: PathBuf,
}

impl CardStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn card_path(&self, identifier: u64) -> PathBuf {
        self.dir.join(format!("{identifier}.{CARD_FILE_EXTENSION}"))
    }

    /// Writes `card`, replacing any earlier card for the same identifier.
    ///
    /// The card directory is created if it does not exist yet.
    ///
    /// # Returns
    ///
    /// The path of the written card.
    ///
    /// # Errors
    ///
    /// Returns a `TriageError` if:
    /// - the card directory cannot be created,
    /// - the card cannot be serialised,
    /// - the file cannot be written.
    pub fn publish(&self, card: &StatusCard) -> TriageResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(TriageError::CardDirCreation)?;

        let json = serde_json::to_string_pretty(card).map_err(TriageError::CardSerialization)?;
        let path = self.card_path(card.identifier);
        fs::write(&path, json).map_err(TriageError::CardWrite)?;

        tracing::info!(
            identifier = card.identifier,
            urgency = %card.urgency,
            path = %path.display(),
            "status card published"
        );
        Ok(path)
    }

    pub fn read(&self, identifier: u64) -> TriageResult<StatusCard> {
        let contents =
            fs::read_to_string(self.card_path(identifier)).map_err(TriageError::CardRead)?;
        serde_json::from_str(&contents).map_err(TriageError::CardSerialization)
    }

    /// Removes the card for `identifier` once the patient has been seen.
    ///
    /// Returns `false` if there was no card to remove.
    pub fn remove(&self, identifier: u64) -> TriageResult<bool> {
        match fs::remove_file(self.card_path(identifier)) {
            Ok(()) => {
                tracing::info!(identifier, "status card removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(TriageError::CardRemove(e)),
        }
    }

    /// Lists identifiers of all published cards, lowest first.
    ///
    /// A missing card directory means nothing has been published yet. Files that do not look
    /// like cards are skipped.
    pub fn list(&self) -> TriageResult<Vec<u64>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(TriageError::CardRead(e)),
        };

        let mut identifiers = Vec::new();
        for entry in entries {
            let path = entry.map_err(TriageError::CardRead)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(CARD_FILE_EXTENSION) {
                continue;
            }

            match path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u64>().ok())
            {
                Some(id) => identifiers.push(id),
                None => tracing::warn!(
                    "skipping unexpected file in card directory: {}",
                    path.display()
                ),
            }
        }

        identifiers.sort_unstable();
        Ok(identifiers)
    }
}
