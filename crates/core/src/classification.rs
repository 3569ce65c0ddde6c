//! Urgency tiers.
//!
//! A total score maps onto one of five ordered tiers by fixed, non-overlapping bands. Each tier
//! carries the label, display colour and colour name the presentation layer renders.

use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UrgencyTier {
    NotUrgent,
    SlightlyUrgent,
    Urgent,
    VeryUrgent,
    Emergency,
}

/// Label, colour and colour name for a tier, in the order the front-end expects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub label: &'static str,
    pub color_hex: &'static str,
    pub color_name: &'static str,
}

impl UrgencyTier {
    /// All tiers, least urgent first.
    pub const ALL: [UrgencyTier; 5] = [
        UrgencyTier::NotUrgent,
        UrgencyTier::SlightlyUrgent,
        UrgencyTier::Urgent,
        UrgencyTier::VeryUrgent,
        UrgencyTier::Emergency,
    ];

    /// Classify a total score.
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        match score {
            0..=10 => UrgencyTier::NotUrgent,
            11..=20 => UrgencyTier::SlightlyUrgent,
            21..=30 => UrgencyTier::Urgent,
            31..=40 => UrgencyTier::VeryUrgent,
            _ => UrgencyTier::Emergency,
        }
    }

    /// Inclusive score range covered by this tier; `None` as the upper bound means unbounded.
    pub const fn score_range(self) -> (u32, Option<u32>) {
        match self {
            UrgencyTier::NotUrgent => (0, Some(10)),
            UrgencyTier::SlightlyUrgent => (11, Some(20)),
            UrgencyTier::Urgent => (21, Some(30)),
            UrgencyTier::VeryUrgent => (31, Some(40)),
            UrgencyTier::Emergency => (41, None),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            UrgencyTier::NotUrgent => "Not Urgent",
            UrgencyTier::SlightlyUrgent => "Slightly Urgent",
            UrgencyTier::Urgent => "Urgent",
            UrgencyTier::VeryUrgent => "Very Urgent",
            UrgencyTier::Emergency => "Emergency",
        }
    }

    pub const fn color_hex(self) -> &'static str {
        match self {
            UrgencyTier::NotUrgent => "#1c5cff",
            UrgencyTier::SlightlyUrgent => "#1fd158",
            UrgencyTier::Urgent => "#f5d800",
            UrgencyTier::VeryUrgent => "#ff6f00",
            UrgencyTier::Emergency => "#ff1500",
        }
    }

    pub const fn color_name(self) -> &'static str {
        match self {
            UrgencyTier::NotUrgent => "blue",
            UrgencyTier::SlightlyUrgent => "green",
            UrgencyTier::Urgent => "yellow",
            UrgencyTier::VeryUrgent => "orange",
            UrgencyTier::Emergency => "red",
        }
    }

    pub const fn classification(self) -> Classification {
        Classification {
            label: self.label(),
            color_hex: self.color_hex(),
            color_name: self.color_name(),
        }
    }

    /// Sentence read aloud once a patient has been scored.
    pub fn announcement(self, identifier: u64) -> String {
        format!(
            "Patient number {identifier}. Urgency level: {}. Please wait for the {} call.",
            self.label(),
            self.color_name()
        )
    }
}

/// Classify a score into its tier's (label, colour, colour name).
pub fn classify(score: u32) -> Classification {
    UrgencyTier::from_score(score).classification()
}

impl std::fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for UrgencyTier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.classification().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_band_boundaries() {
        let cases = [
            (0, "Not Urgent"),
            (10, "Not Urgent"),
            (11, "Slightly Urgent"),
            (20, "Slightly Urgent"),
            (21, "Urgent"),
            (30, "Urgent"),
            (31, "Very Urgent"),
            (40, "Very Urgent"),
            (41, "Emergency"),
            (u32::MAX, "Emergency"),
        ];

        for (score, label) in cases {
            assert_eq!(classify(score).label, label, "score {score}");
        }
    }

    #[test]
    fn test_classify_returns_colour_triples() {
        assert_eq!(
            classify(5),
            Classification {
                label: "Not Urgent",
                color_hex: "#1c5cff",
                color_name: "blue"
            }
        );
        assert_eq!(classify(15).color_hex, "#1fd158");
        assert_eq!(classify(25).color_name, "yellow");
        assert_eq!(classify(35).color_hex, "#ff6f00");
        assert_eq!(classify(99).color_name, "red");
    }

    #[test]
    fn test_score_ranges_are_contiguous_and_match_from_score() {
        let mut expected_start = 0;
        for tier in UrgencyTier::ALL {
            let (start, end) = tier.score_range();
            assert_eq!(start, expected_start);
            assert_eq!(UrgencyTier::from_score(start), tier);
            match end {
                Some(end) => {
                    assert_eq!(UrgencyTier::from_score(end), tier);
                    expected_start = end + 1;
                }
                None => assert_eq!(tier, UrgencyTier::Emergency),
            }
        }
    }

    #[test]
    fn test_tiers_are_ordered_by_urgency() {
        assert!(UrgencyTier::NotUrgent < UrgencyTier::SlightlyUrgent);
        assert!(UrgencyTier::VeryUrgent < UrgencyTier::Emergency);
        assert_eq!(UrgencyTier::ALL.iter().max(), Some(&UrgencyTier::Emergency));
    }

    #[test]
    fn test_tier_serializes_as_triple() {
        let json = serde_json::to_value(UrgencyTier::Urgent).unwrap();
        assert_eq!(json["label"], "Urgent");
        assert_eq!(json["color_hex"], "#f5d800");
        assert_eq!(json["color_name"], "yellow");
    }

    #[test]
    fn test_announcement_mentions_identifier_and_label() {
        let text = UrgencyTier::Emergency.announcement(7);
        assert!(text.contains("7"));
        assert!(text.contains("Emergency"));
    }
}
