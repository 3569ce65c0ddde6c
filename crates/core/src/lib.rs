//! # Triage Core
//!
//! Core logic for the triage kiosk.
//!
//! This crate holds the patient record and everything needed to score it:
//! - The live record, its severity-preserving vital-sign updates and reset cycle
//! - Medical thresholds and startup configuration
//! - Urgency tiers and their display colours
//! - Status cards written to the card directory for the waiting-room display
//! - A fire-and-forget announcement queue
//!
//! **No presentation concerns**: GUI wiring, card rendering and audio output belong to the
//! binaries or external collaborators.

pub mod announce;
pub mod card;
pub mod checklist;
pub mod classification;
pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod session;
pub mod vitals;

pub use announce::{AnnouncementQueue, CommandSpeaker, LogSpeaker, Speaker};
pub use card::{CardStore, StatusCard};
pub use checklist::{CovidChecklist, CovidSymptom};
pub use classification::{classify, Classification, UrgencyTier};
pub use config::{CoreConfig, PressurePolicy, ThresholdValues, Thresholds};
pub use constants::DEFAULT_CARD_DIR;
pub use error::{TriageError, TriageResult};
pub use patient::{Assessment, PatientRecord, PatientSnapshot};
pub use session::TriageSession;
pub use vitals::{ScriptedVitals, VitalSample, VitalsSource};
