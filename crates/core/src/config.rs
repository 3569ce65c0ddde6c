//! Core runtime configuration.
//!
//! Medical thresholds and output locations are resolved once at process startup and then passed
//! into the session. Nothing in this module reads process-wide environment variables; the
//! binaries read them (after loading `.env`) and hand the raw values in here for parsing and
//! validation.

use crate::constants::{
    DEFAULT_CARD_DIR, ENV_PRESSURE_MAX, ENV_PRESSURE_MIN, ENV_PRESSURE_POLICY,
    ENV_SATURATION_MIN, ENV_TEMPERATURE_MAX,
};
use crate::{TriageError, TriageResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Safe bounds each vital sign is scored against.
///
/// Values are validated on construction and cannot be changed afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Thresholds {
    temperature_max: f64,
    saturation_min: f64,
    pressure_min: f64,
    pressure_max: f64,
}

impl Thresholds {
    /// Create a validated set of thresholds.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidConfiguration` if:
    /// - any bound is NaN or infinite,
    /// - `pressure_min` is not strictly below `pressure_max`,
    /// - `saturation_min` is outside `0..=100`.
    pub fn new(
        temperature_max: f64,
        saturation_min: f64,
        pressure_min: f64,
        pressure_max: f64,
    ) -> TriageResult<Self> {
        for (name, value) in [
            ("temperature_max", temperature_max),
            ("saturation_min", saturation_min),
            ("pressure_min", pressure_min),
            ("pressure_max", pressure_max),
        ] {
            if !value.is_finite() {
                return Err(TriageError::InvalidConfiguration(format!(
                    "{name} must be a finite number"
                )));
            }
        }

        if pressure_min >= pressure_max {
            return Err(TriageError::InvalidConfiguration(format!(
                "pressure_min ({pressure_min}) must be below pressure_max ({pressure_max})"
            )));
        }

        if !(0.0..=100.0).contains(&saturation_min) {
            return Err(TriageError::InvalidConfiguration(format!(
                "saturation_min ({saturation_min}) must be a percentage between 0 and 100"
            )));
        }

        Ok(Self {
            temperature_max,
            saturation_min,
            pressure_min,
            pressure_max,
        })
    }

    pub fn temperature_max(&self) -> f64 {
        self.temperature_max
    }

    pub fn saturation_min(&self) -> f64 {
        self.saturation_min
    }

    pub fn pressure_min(&self) -> f64 {
        self.pressure_min
    }

    pub fn pressure_max(&self) -> f64 {
        self.pressure_max
    }

    pub fn temperature_out_of_range(&self, temperature: f64) -> bool {
        temperature > self.temperature_max
    }

    pub fn pressure_out_of_range(&self, pressure: f64) -> bool {
        pressure > self.pressure_max || pressure < self.pressure_min
    }

    pub fn saturation_out_of_range(&self, saturation: f64) -> bool {
        saturation < self.saturation_min
    }

    /// How far a pressure reading sits outside the safe band; zero when inside it.
    pub(crate) fn pressure_deviation(&self, pressure: f64) -> f64 {
        if pressure > self.pressure_max {
            pressure - self.pressure_max
        } else if pressure < self.pressure_min {
            self.pressure_min - pressure
        } else {
            0.0
        }
    }
}

/// How a fresh blood pressure sample is merged with the retained one.
///
/// `HighestWins` mirrors the kiosk's long-standing behaviour: the larger value is kept, so a
/// dangerously low reading that follows a normal one is lost. `MostDeviant` keeps whichever
/// reading lies furthest outside the configured band and is opt-in until clinical sign-off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PressurePolicy {
    #[default]
    HighestWins,
    MostDeviant,
}

impl FromStr for PressurePolicy {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "highest-wins" | "highest_wins" => Ok(Self::HighestWins),
            "most-deviant" | "most_deviant" => Ok(Self::MostDeviant),
            other => Err(TriageError::InvalidConfiguration(format!(
                "unknown {ENV_PRESSURE_POLICY} value: {other}"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    thresholds: Thresholds,
    pressure_policy: PressurePolicy,
    card_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        thresholds: Thresholds,
        pressure_policy: PressurePolicy,
        card_dir: PathBuf,
    ) -> TriageResult<Self> {
        if card_dir.as_os_str().is_empty() {
            return Err(TriageError::InvalidConfiguration(
                "card directory cannot be empty".into(),
            ));
        }

        Ok(Self {
            thresholds,
            pressure_policy,
            card_dir,
        })
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn pressure_policy(&self) -> PressurePolicy {
        self.pressure_policy
    }

    pub fn card_dir(&self) -> &Path {
        &self.card_dir
    }
}

/// Raw threshold values as read from the environment, one per variable.
#[derive(Clone, Debug, Default)]
pub struct ThresholdValues {
    pub temperature_max: Option<String>,
    pub saturation_min: Option<String>,
    pub pressure_min: Option<String>,
    pub pressure_max: Option<String>,
}

/// Parse and validate thresholds from optional string values.
///
/// Every threshold is required: an unset or blank value is a startup error rather than a silent
/// zero, since a zero bound would quietly change which readings are penalised.
pub fn thresholds_from_env_values(values: ThresholdValues) -> TriageResult<Thresholds> {
    Thresholds::new(
        parse_threshold(ENV_TEMPERATURE_MAX, values.temperature_max)?,
        parse_threshold(ENV_SATURATION_MIN, values.saturation_min)?,
        parse_threshold(ENV_PRESSURE_MIN, values.pressure_min)?,
        parse_threshold(ENV_PRESSURE_MAX, values.pressure_max)?,
    )
}

/// Parse the blood pressure policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default policy.
pub fn pressure_policy_from_env_value(value: Option<String>) -> TriageResult<PressurePolicy> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<PressurePolicy>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

/// Resolve the card output directory, falling back to [`DEFAULT_CARD_DIR`].
pub fn card_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CARD_DIR))
}

/// Build the full core configuration from raw environment values.
///
/// # Errors
///
/// Returns a `TriageError` if any threshold is missing or invalid, or the pressure policy is
/// not recognised.
pub fn core_config_from_env_values(
    thresholds: ThresholdValues,
    pressure_policy: Option<String>,
    card_dir: Option<String>,
) -> TriageResult<CoreConfig> {
    CoreConfig::new(
        thresholds_from_env_values(thresholds)?,
        pressure_policy_from_env_value(pressure_policy)?,
        card_dir_from_env_value(card_dir),
    )
}

fn parse_threshold(name: &'static str, value: Option<String>) -> TriageResult<f64> {
    let raw = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(TriageError::MissingConfiguration(name))?;

    raw.parse::<f64>()
        .map_err(|_| TriageError::InvalidConfiguration(format!("{name} is not a number: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(t: &str, s: &str, pmin: &str, pmax: &str) -> ThresholdValues {
        ThresholdValues {
            temperature_max: Some(t.into()),
            saturation_min: Some(s.into()),
            pressure_min: Some(pmin.into()),
            pressure_max: Some(pmax.into()),
        }
    }

    #[test]
    fn test_thresholds_from_env_values_parses_all_bounds() {
        let thresholds = thresholds_from_env_values(values("38", "90", "60", " 140 ")).unwrap();

        assert_eq!(thresholds.temperature_max(), 38.0);
        assert_eq!(thresholds.saturation_min(), 90.0);
        assert_eq!(thresholds.pressure_min(), 60.0);
        assert_eq!(thresholds.pressure_max(), 140.0);
    }

    #[test]
    fn test_thresholds_from_env_values_rejects_missing_value() {
        let mut raw = values("38", "90", "60", "140");
        raw.saturation_min = None;

        let err = thresholds_from_env_values(raw).expect_err("should reject missing bound");
        assert!(matches!(err, TriageError::MissingConfiguration(name) if name == ENV_SATURATION_MIN));
    }

    #[test]
    fn test_thresholds_from_env_values_rejects_blank_value() {
        let err = thresholds_from_env_values(values("  ", "90", "60", "140"))
            .expect_err("should reject blank bound");
        assert!(matches!(err, TriageError::MissingConfiguration(name) if name == ENV_TEMPERATURE_MAX));
    }

    #[test]
    fn test_thresholds_from_env_values_rejects_non_numeric() {
        let err = thresholds_from_env_values(values("hot", "90", "60", "140"))
            .expect_err("should reject non-numeric bound");
        assert!(matches!(err, TriageError::InvalidConfiguration(msg) if msg.contains("not a number")));
    }

    #[test]
    fn test_thresholds_new_rejects_inverted_pressure_band() {
        let err = Thresholds::new(38.0, 90.0, 140.0, 60.0).expect_err("should reject inverted band");
        assert!(matches!(err, TriageError::InvalidConfiguration(msg) if msg.contains("pressure_min")));
    }

    #[test]
    fn test_thresholds_new_rejects_non_finite() {
        let err = Thresholds::new(f64::NAN, 90.0, 60.0, 140.0).expect_err("should reject NaN");
        assert!(matches!(err, TriageError::InvalidConfiguration(msg) if msg.contains("finite")));
    }

    #[test]
    fn test_thresholds_new_rejects_saturation_above_100() {
        let err = Thresholds::new(38.0, 101.0, 60.0, 140.0).expect_err("should reject 101%");
        assert!(matches!(err, TriageError::InvalidConfiguration(msg) if msg.contains("percentage")));
    }

    #[test]
    fn test_out_of_range_checks() {
        let thresholds = Thresholds::new(38.0, 90.0, 60.0, 140.0).unwrap();

        assert!(thresholds.temperature_out_of_range(38.1));
        assert!(!thresholds.temperature_out_of_range(38.0));
        assert!(thresholds.pressure_out_of_range(141.0));
        assert!(thresholds.pressure_out_of_range(59.0));
        assert!(!thresholds.pressure_out_of_range(60.0));
        assert!(!thresholds.pressure_out_of_range(140.0));
        assert!(thresholds.saturation_out_of_range(89.9));
        assert!(!thresholds.saturation_out_of_range(90.0));
    }

    #[test]
    fn test_pressure_deviation() {
        let thresholds = Thresholds::new(38.0, 90.0, 60.0, 140.0).unwrap();

        assert_eq!(thresholds.pressure_deviation(100.0), 0.0);
        assert_eq!(thresholds.pressure_deviation(150.0), 10.0);
        assert_eq!(thresholds.pressure_deviation(40.0), 20.0);
    }

    #[test]
    fn test_pressure_policy_from_env_value() {
        assert_eq!(
            pressure_policy_from_env_value(None).unwrap(),
            PressurePolicy::HighestWins
        );
        assert_eq!(
            pressure_policy_from_env_value(Some("  ".into())).unwrap(),
            PressurePolicy::HighestWins
        );
        assert_eq!(
            pressure_policy_from_env_value(Some("Most-Deviant".into())).unwrap(),
            PressurePolicy::MostDeviant
        );
        assert!(pressure_policy_from_env_value(Some("lowest".into())).is_err());
    }

    #[test]
    fn test_card_dir_from_env_value_defaults() {
        assert_eq!(card_dir_from_env_value(None), PathBuf::from(DEFAULT_CARD_DIR));
        assert_eq!(
            card_dir_from_env_value(Some("/srv/kiosk".into())),
            PathBuf::from("/srv/kiosk")
        );
    }

    #[test]
    fn test_core_config_from_env_values() {
        let cfg = core_config_from_env_values(
            values("38", "90", "60", "140"),
            Some("most-deviant".into()),
            None,
        )
        .unwrap();

        assert_eq!(cfg.pressure_policy(), PressurePolicy::MostDeviant);
        assert_eq!(cfg.card_dir(), Path::new(DEFAULT_CARD_DIR));
        assert_eq!(cfg.thresholds().pressure_max(), 140.0);
    }

    #[test]
    fn test_core_config_rejects_empty_card_dir() {
        let thresholds = Thresholds::new(38.0, 90.0, 60.0, 140.0).unwrap();
        let err = CoreConfig::new(thresholds, PressurePolicy::default(), PathBuf::new())
            .expect_err("should reject empty card dir");
        assert!(matches!(err, TriageError::InvalidConfiguration(_)));
    }
}
