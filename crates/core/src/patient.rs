//! The live patient record.
//!
//! One record is reused for every patient who walks up to the kiosk: `reset` wipes the working
//! state and advances the identifier, readings and answers accumulate, and the record is scored
//! against the configured thresholds.

use crate::checklist::{CovidChecklist, CovidSymptom};
use crate::classification::UrgencyTier;
use crate::config::{PressurePolicy, Thresholds};
use crate::constants::VITAL_PENALTY_POINTS;
use crate::vitals::VitalSample;
use crate::{TriageError, TriageResult};
use serde::Serialize;

/// Working state for the patient currently at the kiosk.
///
/// Readings are `None` until the first sample after a reset arrives; accessors report an unset
/// reading as `0.0`.
#[derive(Clone, Debug, Default)]
pub struct PatientRecord {
    identifier: u64,
    temperature: Option<f64>,
    blood_pressure: Option<f64>,
    oxygen_saturation: Option<f64>,
    questionnaire_points: u32,
    covid_checklist: CovidChecklist,
}

/// Point-in-time copy of a record, as handed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientSnapshot {
    pub identifier: u64,
    pub temperature: f64,
    pub blood_pressure: f64,
    pub oxygen_saturation: f64,
    pub questionnaire_points: u32,
    pub covid_checklist: CovidChecklist,
}

/// Score and tier computed for a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub identifier: u64,
    pub total_score: u32,
    pub tier: UrgencyTier,
}

impl PatientRecord {
    /// Creates the record with identifier 0 and empty working state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all working state and advances the identifier.
    ///
    /// # Returns
    ///
    /// The identifier assigned to the next patient.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::IdentifierExhausted` if advancing would overflow; the record is left
    /// untouched in that case.
    pub fn reset(&mut self) -> TriageResult<u64> {
        let next = self
            .identifier
            .checked_add(1)
            .ok_or(TriageError::IdentifierExhausted)?;

        *self = Self {
            identifier: next,
            ..Self::default()
        };

        tracing::info!(identifier = next, "patient record reset");
        Ok(next)
    }

    /// Merges raw readings using the default blood pressure policy.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidReading` if any reading is negative or not finite, or if
    /// saturation is above 100%.
    pub fn update_vitals(
        &mut self,
        temperature: f64,
        blood_pressure: f64,
        oxygen_saturation: f64,
    ) -> TriageResult<()> {
        let sample = VitalSample::new(temperature, blood_pressure, oxygen_saturation)?;
        self.merge_sample(sample, PressurePolicy::HighestWins, None);
        Ok(())
    }

    /// Merges a sample, keeping the most severe value seen since the last reset.
    ///
    /// Temperature keeps the higher value, saturation the lower. Blood pressure follows
    /// `policy`; `MostDeviant` compares readings against `thresholds`.
    pub fn update_vitals_with(
        &mut self,
        sample: VitalSample,
        policy: PressurePolicy,
        thresholds: &Thresholds,
    ) {
        self.merge_sample(sample, policy, Some(thresholds));
    }

    fn merge_sample(
        &mut self,
        sample: VitalSample,
        policy: PressurePolicy,
        thresholds: Option<&Thresholds>,
    ) {
        self.temperature = Some(match self.temperature {
            Some(current) => current.max(sample.temperature()),
            None => sample.temperature(),
        });

        self.oxygen_saturation = Some(match self.oxygen_saturation {
            Some(current) => current.min(sample.oxygen_saturation()),
            None => sample.oxygen_saturation(),
        });

        let candidate = sample.blood_pressure();
        self.blood_pressure = Some(match (self.blood_pressure, policy, thresholds) {
            (None, _, _) => candidate,
            (Some(current), PressurePolicy::MostDeviant, Some(t)) => {
                let current_dev = t.pressure_deviation(current);
                let candidate_dev = t.pressure_deviation(candidate);
                if candidate_dev > current_dev || (candidate_dev == current_dev && candidate > current)
                {
                    candidate
                } else {
                    current
                }
            }
            (Some(current), _, _) => current.max(candidate),
        });

        tracing::debug!(
            identifier = self.identifier,
            temperature = self.temperature(),
            blood_pressure = self.blood_pressure(),
            oxygen_saturation = self.oxygen_saturation(),
            "vitals updated"
        );
    }

    /// Adds questionnaire points, saturating at `u32::MAX`.
    pub fn add_questionnaire_points(&mut self, points: u32) {
        self.questionnaire_points = self.questionnaire_points.saturating_add(points);
        tracing::debug!(
            identifier = self.identifier,
            added = points,
            total = self.questionnaire_points,
            "questionnaire points added"
        );
    }

    /// Marks the checklist answer at `index` as positive.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::OutOfRangeIndex` if `index` is not in `0..5`.
    pub fn set_covid_flag(&mut self, index: usize) -> TriageResult<()> {
        self.covid_checklist.set_index(index)
    }

    pub fn set_symptom(&mut self, symptom: CovidSymptom) {
        self.covid_checklist.set(symptom);
    }

    /// Questionnaire points plus a fixed penalty for each vital outside its bounds.
    ///
    /// Vitals with no reading since the last reset carry no penalty.
    pub fn total_score(&self, thresholds: &Thresholds) -> u32 {
        let penalty = |out_of_range: bool| if out_of_range { VITAL_PENALTY_POINTS } else { 0 };

        let temperature = self
            .temperature
            .map_or(0, |t| penalty(thresholds.temperature_out_of_range(t)));
        let pressure = self
            .blood_pressure
            .map_or(0, |p| penalty(thresholds.pressure_out_of_range(p)));
        let saturation = self
            .oxygen_saturation
            .map_or(0, |s| penalty(thresholds.saturation_out_of_range(s)));

        self.questionnaire_points
            .saturating_add(temperature)
            .saturating_add(pressure)
            .saturating_add(saturation)
    }

    pub fn assess(&self, thresholds: &Thresholds) -> Assessment {
        let total_score = self.total_score(thresholds);
        Assessment {
            identifier: self.identifier,
            total_score,
            tier: UrgencyTier::from_score(total_score),
        }
    }

    pub fn identifier(&self) -> u64 {
        self.identifier
    }

    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(0.0)
    }

    pub fn blood_pressure(&self) -> f64 {
        self.blood_pressure.unwrap_or(0.0)
    }

    pub fn oxygen_saturation(&self) -> f64 {
        self.oxygen_saturation.unwrap_or(0.0)
    }

    pub fn questionnaire_points(&self) -> u32 {
        self.questionnaire_points
    }

    pub fn covid_checklist(&self) -> &CovidChecklist {
        &self.covid_checklist
    }

    pub fn snapshot(&self) -> PatientSnapshot {
        PatientSnapshot {
            identifier: self.identifier,
            temperature: self.temperature(),
            blood_pressure: self.blood_pressure(),
            oxygen_saturation: self.oxygen_saturation(),
            questionnaire_points: self.questionnaire_points,
            covid_checklist: self.covid_checklist,
        }
    }
}
