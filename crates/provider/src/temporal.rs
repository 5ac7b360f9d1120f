//! Confidence-decay projection over time. Grounded on `original_source`'s
//! `temporal_agent.py`.

use std::sync::Arc;

use aegis_core::AnalyzerOutput;
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::extract::extract_json;
use crate::oracle::Oracle;

#[derive(Debug, Clone)]
pub struct TemporalInput {
    pub entity_id: String,
    pub current_confidence: f64,
    pub elapsed_minutes: f64,
}

pub struct TemporalAnalyzer {
    oracle: Arc<dyn Oracle>,
}

impl TemporalAnalyzer {
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn analyze(&self, input: &TemporalInput) -> AnalyzerOutput {
        let system_prompt = "You are a disaster-response temporal analyst. Project how this \
             entity's confidence will decay over the next several minutes without fresh \
             reports. Respond with a JSON object containing projected_confidence, \
             projection_minutes, and narrative.";
        let user_prompt = format!(
            "Entity {} currently at confidence {:.2}, {:.1} minutes since last report.",
            input.entity_id, input.current_confidence, input.elapsed_minutes
        );

        match self.oracle.complete(system_prompt, &user_prompt).await {
            Ok(response) => match extract_json(&response) {
                Some(data) => AnalyzerOutput {
                    analyzer_name: "temporal".to_string(),
                    output_type: "decay_projection".to_string(),
                    confidence: data
                        .get("projected_confidence")
                        .and_then(serde_json::Value::as_f64)
                        .unwrap_or(input.current_confidence),
                    data,
                    sources: vec![input.entity_id.clone()],
                    reasoning: "parsed from oracle response".to_string(),
                    timestamp: Utc::now(),
                    used_fallback: false,
                },
                None => {
                    warn!(entity_id = %input.entity_id, "temporal oracle response unparseable, using fallback");
                    self.fallback(input)
                }
            },
            Err(err) => {
                warn!(entity_id = %input.entity_id, error = %err, "temporal oracle call failed, using fallback");
                self.fallback(input)
            }
        }
    }

    fn fallback(&self, input: &TemporalInput) -> AnalyzerOutput {
        AnalyzerOutput {
            analyzer_name: "temporal".to_string(),
            output_type: "decay_projection".to_string(),
            data: json!({
                "projected_confidence": 0.62,
                "projection_minutes": 12,
                "narrative": "Without a fresh report, confidence is projected to decay from \
                     0.85 to 0.62 over the next 12 minutes.",
            }),
            confidence: 0.62,
            sources: vec![input.entity_id.clone()],
            reasoning: "deterministic fallback: no temporal oracle available".to_string(),
            timestamp: Utc::now(),
            used_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::NullOracle;

    #[tokio::test]
    async fn falls_back_to_canned_projection() {
        let analyzer = TemporalAnalyzer::new(Arc::new(NullOracle));
        let input = TemporalInput {
            entity_id: "inc_1".to_string(),
            current_confidence: 0.85,
            elapsed_minutes: 9.0,
        };
        let out = analyzer.analyze(&input).await;
        assert!(out.used_fallback);
        assert_eq!(out.field("projection_minutes").unwrap(), 12);
    }
}
