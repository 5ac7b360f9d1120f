//! Damage assessment from image signals. Grounded on
//! `original_source`'s `vision_agent.py`.

use std::sync::Arc;

use aegis_core::AnalyzerOutput;
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::extract::extract_json;
use crate::oracle::Oracle;

/// One image signal awaiting a damage assessment.
#[derive(Debug, Clone)]
pub struct VisionInput {
    pub signal_id: String,
    pub source_id: String,
    /// A textual description of the image content, standing in for the
    /// image bytes themselves: the multimodal upload path is a transport
    /// concern, not an analyzer concern.
    pub image_description: String,
}

/// Three canned damage assessments, selected deterministically by the
/// signal id so repeated calls for the same signal agree. The trapped
/// range mirrors `estimated_casualties.min/max` from the original's own
/// fallback scenarios; image signals carry no injured count.
const FALLBACK_SCENARIOS: [(&str, &str, u32, u32); 3] = [
    (
        "severe",
        "Partial structural collapse with visible rubble and exposed rebar; at least one floor pancaked.",
        3,
        8,
    ),
    (
        "moderate",
        "Active fire visible on upper floors with heavy smoke; structure otherwise intact.",
        0,
        3,
    ),
    (
        "catastrophic",
        "Multi-structure collapse across the block; debris field spans the full street width.",
        5,
        20,
    ),
];

pub struct VisionAnalyzer {
    oracle: Arc<dyn Oracle>,
}

impl VisionAnalyzer {
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn analyze(&self, input: &VisionInput) -> AnalyzerOutput {
        let system_prompt = "You are a disaster-response vision analyst. Assess structural \
             damage from the image description and respond with a JSON object containing \
             damage_level, description, trapped_min, trapped_max, and confidence.";
        let user_prompt = format!("Image description: {}", input.image_description);

        match self.oracle.complete(system_prompt, &user_prompt).await {
            Ok(response) => match extract_json(&response) {
                Some(data) => AnalyzerOutput {
                    analyzer_name: "vision".to_string(),
                    output_type: "damage_assessment".to_string(),
                    confidence: data.get("confidence").and_then(serde_json::Value::as_f64).unwrap_or(0.6),
                    data,
                    sources: vec![input.source_id.clone()],
                    reasoning: "parsed from oracle response".to_string(),
                    timestamp: Utc::now(),
                    used_fallback: false,
                },
                None => {
                    warn!(signal_id = %input.signal_id, "vision oracle response unparseable, using fallback");
                    self.fallback(input)
                }
            },
            Err(err) => {
                warn!(signal_id = %input.signal_id, error = %err, "vision oracle call failed, using fallback");
                self.fallback(input)
            }
        }
    }

    fn fallback(&self, input: &VisionInput) -> AnalyzerOutput {
        let index = fallback_index(&input.signal_id, FALLBACK_SCENARIOS.len());
        let (damage_level, description, trapped_min, trapped_max) = FALLBACK_SCENARIOS[index];

        AnalyzerOutput {
            analyzer_name: "vision".to_string(),
            output_type: "damage_assessment".to_string(),
            data: json!({
                "damage_level": damage_level,
                "description": description,
                "trapped_min": trapped_min,
                "trapped_max": trapped_max,
            }),
            confidence: 0.5,
            sources: vec![input.source_id.clone()],
            reasoning: "deterministic fallback: no vision oracle available".to_string(),
            timestamp: Utc::now(),
            used_fallback: true,
        }
    }
}

/// Picks a stable index into a fixed-size fallback list from a signal id,
/// so the same signal always gets the same canned scenario.
pub(crate) fn fallback_index(signal_id: &str, len: usize) -> usize {
    let mut hash: u32 = 2166136261;
    for byte in signal_id.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16777619);
    }
    (hash as usize) % len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::NullOracle;

    #[tokio::test]
    async fn falls_back_when_oracle_unavailable() {
        let analyzer = VisionAnalyzer::new(Arc::new(NullOracle));
        let input = VisionInput {
            signal_id: "sig_1".to_string(),
            source_id: "sig_1".to_string(),
            image_description: "smoke over a row of buildings".to_string(),
        };
        let out = analyzer.analyze(&input).await;
        assert!(out.used_fallback);
        assert_eq!(out.analyzer_name, "vision");
        assert!(out.field("damage_level").is_some());
    }

    #[test]
    fn fallback_index_is_deterministic() {
        assert_eq!(fallback_index("sig_abc", 3), fallback_index("sig_abc", 3));
    }
}
