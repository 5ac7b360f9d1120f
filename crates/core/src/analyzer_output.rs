use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// The uniform envelope every analyzer returns, whether its result came
/// from a live model call or a deterministic fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AnalyzerOutput {
    pub analyzer_name: String,
    pub output_type: String,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub data: Value,
    pub confidence: f64,
    pub sources: Vec<String>,
    pub reasoning: String,
    pub timestamp: DateTime<Utc>,
    pub used_fallback: bool,
}

impl AnalyzerOutput {
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn field_lookup_reads_through_data() {
        let out = AnalyzerOutput {
            analyzer_name: "vision".into(),
            output_type: "damage_assessment".into(),
            data: json!({"damage_level": "severe"}),
            confidence: 0.72,
            sources: vec!["sig_1".into()],
            reasoning: "fallback scenario".into(),
            timestamp: Utc.timestamp_opt(0, 0).unwrap(),
            used_fallback: true,
        };
        assert_eq!(out.field("damage_level").unwrap(), "severe");
        assert!(out.field("missing").is_none());
    }
}
