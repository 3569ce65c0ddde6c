//! Constants used throughout the triage core crate.
//!
//! Scoring weights, checklist sizing and the environment variable names read by the binaries
//! live here so the scoring rules and the startup configuration stay in one place.

/// Points added to the total score for each vital sign outside its safe bounds.
pub const VITAL_PENALTY_POINTS: u32 = 10;

/// Number of entries in the COVID symptom checklist.
pub const COVID_CHECKLIST_LEN: usize = 5;

/// Default directory that published status cards are written to.
pub const DEFAULT_CARD_DIR: &str = "site/cards";

/// File extension used for published status cards.
pub const CARD_FILE_EXTENSION: &str = "json";

/// Environment variable holding the maximum safe body temperature.
pub const ENV_TEMPERATURE_MAX: &str = "TRIAGE_TEMPERATURE_MAX";

/// Environment variable holding the minimum safe oxygen saturation.
pub const ENV_SATURATION_MIN: &str = "TRIAGE_SATURATION_MIN";

/// Environment variable holding the minimum safe blood pressure.
pub const ENV_PRESSURE_MIN: &str = "TRIAGE_PRESSURE_MIN";

/// Environment variable holding the maximum safe blood pressure.
pub const ENV_PRESSURE_MAX: &str = "TRIAGE_PRESSURE_MAX";

/// Environment variable selecting the blood pressure update policy.
pub const ENV_PRESSURE_POLICY: &str = "TRIAGE_PRESSURE_POLICY";

/// Environment variable overriding the card output directory.
pub const ENV_CARD_DIR: &str = "TRIAGE_CARD_DIR";

/// Environment variable naming an external program used to speak announcements.
pub const ENV_SPEAK_COMMAND: &str = "TRIAGE_SPEAK_COMMAND";

/// Announcements that may wait for the speech worker before new ones are dropped.
pub const ANNOUNCEMENT_QUEUE_CAPACITY: usize = 16;
