//! COVID symptom checklist.
//!
//! The questionnaire asks five yes/no screening questions. Each answer has a fixed position in
//! the checklist so the front-end can address it by index.

use crate::constants::COVID_CHECKLIST_LEN;
use crate::{TriageError, TriageResult};
use serde::{Deserialize, Serialize};

/// One screening question, in checklist order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CovidSymptom {
    DryCough = 0,
    ProlongedHighFever = 1,
    BreathingDifficulty = 2,
    Diarrhoea = 3,
    KnownExposure = 4,
}

impl CovidSymptom {
    pub const ALL: [CovidSymptom; COVID_CHECKLIST_LEN] = [
        CovidSymptom::DryCough,
        CovidSymptom::ProlongedHighFever,
        CovidSymptom::BreathingDifficulty,
        CovidSymptom::Diarrhoea,
        CovidSymptom::KnownExposure,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn description(self) -> &'static str {
        match self {
            CovidSymptom::DryCough => "Dry cough",
            CovidSymptom::ProlongedHighFever => "High fever for 5 days or more",
            CovidSymptom::BreathingDifficulty => "Difficulty breathing",
            CovidSymptom::Diarrhoea => "Diarrhoea",
            CovidSymptom::KnownExposure => "Contact with someone who had COVID",
        }
    }
}

impl TryFrom<usize> for CovidSymptom {
    type Error = TriageError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        CovidSymptom::ALL
            .get(index)
            .copied()
            .ok_or(TriageError::OutOfRangeIndex {
                index,
                len: COVID_CHECKLIST_LEN,
            })
    }
}

impl std::fmt::Display for CovidSymptom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Fixed-size set of screening answers; every entry starts out `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CovidChecklist([bool; COVID_CHECKLIST_LEN]);

impl CovidChecklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, symptom: CovidSymptom) {
        self.0[symptom.index()] = true;
    }

    /// Mark the answer at `index` as positive.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::OutOfRangeIndex` if `index` is not a checklist position; the
    /// checklist is left unchanged.
    pub fn set_index(&mut self, index: usize) -> TriageResult<()> {
        let symptom = CovidSymptom::try_from(index)?;
        self.set(symptom);
        Ok(())
    }

    pub fn get(&self, symptom: CovidSymptom) -> bool {
        self.0[symptom.index()]
    }

    pub fn as_array(&self) -> [bool; COVID_CHECKLIST_LEN] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (CovidSymptom, bool)> + '_ {
        CovidSymptom::ALL.into_iter().map(|s| (s, self.get(s)))
    }

    pub fn count_positive(&self) -> usize {
        self.0.iter().filter(|answered| **answered).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_index_sets_only_that_position() {
        for index in 0..COVID_CHECKLIST_LEN {
            let mut checklist = CovidChecklist::new();
            checklist.set_index(index).unwrap();

            let flags = checklist.as_array();
            for (i, flag) in flags.iter().enumerate() {
                assert_eq!(*flag, i == index, "position {i} after setting {index}");
            }
        }
    }

    #[test]
    fn test_set_index_is_idempotent() {
        let mut checklist = CovidChecklist::new();
        checklist.set_index(2).unwrap();
        let once = checklist;
        checklist.set_index(2).unwrap();

        assert_eq!(checklist, once);
        assert_eq!(checklist.count_positive(), 1);
    }

    #[test]
    fn test_set_index_rejects_out_of_range() {
        let mut checklist = CovidChecklist::new();
        let err = checklist.set_index(5).expect_err("should reject index 5");

        assert!(matches!(err, TriageError::OutOfRangeIndex { index: 5, len: 5 }));
        assert_eq!(checklist, CovidChecklist::new());
    }

    #[test]
    fn test_symptom_order_matches_indices() {
        for (i, symptom) in CovidSymptom::ALL.iter().enumerate() {
            assert_eq!(symptom.index(), i);
            assert_eq!(CovidSymptom::try_from(i).unwrap(), *symptom);
        }
    }
}
