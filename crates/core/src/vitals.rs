//! Vital-sign samples and the acquisition seam.
//!
//! Sensors are read by an external collaborator; the core only sees finished samples through
//! [`VitalsSource`]. [`ScriptedVitals`] replays a fixed series and is what the CLI and tests use.

use crate::{TriageError, TriageResult};
use serde::Serialize;
use std::collections::VecDeque;

/// One reading of all three vital signs taken together.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VitalSample {
    temperature: f64,
    blood_pressure: f64,
    oxygen_saturation: f64,
}

impl VitalSample {
    /// Create a sample from raw readings.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidReading` if any reading is NaN, infinite or negative, or if
    /// oxygen saturation is above 100%.
    pub fn new(temperature: f64, blood_pressure: f64, oxygen_saturation: f64) -> TriageResult<Self> {
        for (name, value) in [
            ("temperature", temperature),
            ("blood pressure", blood_pressure),
            ("oxygen saturation", oxygen_saturation),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TriageError::InvalidReading(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }
        if oxygen_saturation > 100.0 {
            return Err(TriageError::InvalidReading(format!(
                "oxygen saturation must be at most 100, got {oxygen_saturation}"
            )));
        }

        Ok(Self {
            temperature,
            blood_pressure,
            oxygen_saturation,
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn blood_pressure(&self) -> f64 {
        self.blood_pressure
    }

    pub fn oxygen_saturation(&self) -> f64 {
        self.oxygen_saturation
    }
}

impl<'de> serde::Deserialize<'de> for VitalSample {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            temperature: f64,
            blood_pressure: f64,
            oxygen_saturation: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        VitalSample::new(raw.temperature, raw.blood_pressure, raw.oxygen_saturation)
            .map_err(serde::de::Error::custom)
    }
}

/// Anything that can hand the kiosk fresh vital-sign samples.
pub trait VitalsSource {
    /// Returns the next available sample, or `None` when the source has nothing more to give.
    fn next_sample(&mut self) -> TriageResult<Option<VitalSample>>;
}

#[derive(Clone, Debug, Default)]
pub struct ScriptedVitals {
    samples: VecDeque<VitalSample>,
}

impl ScriptedVitals {
    pub fn new(samples: impl IntoIterator<Item = VitalSample>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }
}

impl VitalsSource for ScriptedVitals {
    fn next_sample(&mut self) -> TriageResult<Option<VitalSample>> {
        Ok(self.samples.pop_front())
    }
}
