//! Guarded access to the live patient record.
//!
//! The kiosk has exactly one record. `TriageSession` owns it behind a mutex so any number of
//! front-end handles can share it; every operation, reads included, runs under the same lock.

use crate::card::{CardStore, StatusCard};
use crate::checklist::CovidSymptom;
use crate::config::CoreConfig;
use crate::patient::{Assessment, PatientRecord, PatientSnapshot};
use crate::vitals::{VitalSample, VitalsSource};
use crate::{TriageError, TriageResult};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct TriageSession {
    cfg: Arc<CoreConfig>,
    record: Arc<Mutex<PatientRecord>>,
    cards: CardStore,
}

impl TriageSession {
    /// Creates a session with a fresh record (identifier 0).
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let cards = CardStore::new(cfg.card_dir());
        Self {
            cfg,
            record: Arc::new(Mutex::new(PatientRecord::new())),
            cards,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn cards(&self) -> &CardStore {
        &self.cards
    }

    fn lock(&self) -> TriageResult<MutexGuard<'_, PatientRecord>> {
        self.record.lock().map_err(|_| TriageError::LockPoisoned)
    }

    /// Starts triage for the next patient and returns their identifier.
    pub fn start_patient(&self) -> TriageResult<u64> {
        self.lock()?.reset()
    }

    pub fn update_vitals(&self, sample: VitalSample) -> TriageResult<()> {
        let mut record = self.lock()?;
        record.update_vitals_with(sample, self.cfg.pressure_policy(), self.cfg.thresholds());
        Ok(())
    }

    /// Feeds every sample `source` has into the record.
    ///
    /// # Returns
    ///
    /// The number of samples applied.
    pub fn sample_from(&self, source: &mut dyn VitalsSource) -> TriageResult<usize> {
        let mut applied = 0;
        while let Some(sample) = source.next_sample()? {
            self.update_vitals(sample)?;
            applied += 1;
        }
        Ok(applied)
    }

    pub fn add_questionnaire_points(&self, points: u32) -> TriageResult<()> {
        self.lock()?.add_questionnaire_points(points);
        Ok(())
    }

    pub fn set_covid_flag(&self, index: usize) -> TriageResult<()> {
        self.lock()?.set_covid_flag(index)
    }

    pub fn set_symptom(&self, symptom: CovidSymptom) -> TriageResult<()> {
        self.lock()?.set_symptom(symptom);
        Ok(())
    }

    pub fn identifier(&self) -> TriageResult<u64> {
        Ok(self.lock()?.identifier())
    }

    pub fn total_score(&self) -> TriageResult<u32> {
        Ok(self.lock()?.total_score(self.cfg.thresholds()))
    }

    pub fn assessment(&self) -> TriageResult<Assessment> {
        Ok(self.lock()?.assess(self.cfg.thresholds()))
    }

    pub fn snapshot(&self) -> TriageResult<PatientSnapshot> {
        Ok(self.lock()?.snapshot())
    }

    /// Builds the status card for the current patient from one consistent view of the record.
    pub fn status_card(&self) -> TriageResult<StatusCard> {
        let record = self.lock()?;
        let assessment = record.assess(self.cfg.thresholds());
        Ok(StatusCard::new(&record.snapshot(), &assessment))
    }

    /// Publishes the current patient's status card and returns where it was written.
    pub fn publish(&self) -> TriageResult<PathBuf> {
        let card = self.status_card()?;
        self.cards.publish(&card)
    }

    /// Identifiers of every card currently published, in ascending order.
    pub fn published_cards(&self) -> TriageResult<Vec<u64>> {
        self.cards.list()
    }

    /// Removes a published card once the patient has been seen.
    pub fn finish(&self, identifier: u64) -> TriageResult<bool> {
        self.cards.remove(identifier)
    }
}
