use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Severity ordering attached to signals, incidents and recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Parses free-text urgency into an [`Urgency`], matching substrings in a
/// fixed priority order (`critical`, `high`, `medium`, `low`) and
/// defaulting to `High` when nothing matches. The order matters: text that
/// mentions both "high" and "low" resolves to `High` because it's checked
/// first. Mirrors the upstream analyzer's free-text urgency classification.
#[must_use]
pub fn parse_urgency(raw: &str) -> Urgency {
    let lowered = raw.to_lowercase();
    if lowered.contains("critical") {
        Urgency::Critical
    } else if lowered.contains("high") {
        Urgency::High
    } else if lowered.contains("medium") {
        Urgency::Medium
    } else if lowered.contains("low") {
        Urgency::Low
    } else {
        Urgency::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_level() {
        assert_eq!(parse_urgency("CRITICAL damage"), Urgency::Critical);
        assert_eq!(parse_urgency("high priority"), Urgency::High);
        assert_eq!(parse_urgency("medium concern"), Urgency::Medium);
        assert_eq!(parse_urgency("low risk"), Urgency::Low);
    }

    #[test]
    fn defaults_to_high_when_unrecognized() {
        assert_eq!(parse_urgency("unclear situation"), Urgency::High);
        assert_eq!(parse_urgency(""), Urgency::High);
    }

    #[test]
    fn first_match_wins_over_later_substrings() {
        // "critical" appears before "low" in priority order even though
        // "low" appears earlier in the string.
        assert_eq!(parse_urgency("low but trending critical"), Urgency::Critical);
        assert_eq!(parse_urgency("medium rising toward high"), Urgency::High);
    }

    #[test]
    fn ordering_is_ascending_severity() {
        assert!(Urgency::Low < Urgency::Medium);
        assert!(Urgency::Medium < Urgency::High);
        assert!(Urgency::High < Urgency::Critical);
    }
}
