//! Claim extraction and credibility scoring from text signals. Grounded
//! on `original_source`'s `text_agent.py`.

use std::sync::Arc;

use aegis_core::AnalyzerOutput;
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::extract::extract_json;
use crate::oracle::Oracle;
use crate::vision::fallback_index;

#[derive(Debug, Clone)]
pub struct TextInput {
    pub signal_id: String,
    pub source_id: String,
    pub content: String,
    pub source_type: String,
}

const FALLBACK_CLAIM_SETS: [&str; 3] = [
    "Building partially collapsed, emergency crews requested on site.",
    "Fire reported spreading along the block, residents evacuating.",
    "Road access blocked by debris, search teams unable to reach the area yet.",
];

/// Credibility bucket for a signal's fallback confidence, matched by
/// substring on `source_type` in the same priority order the upstream
/// classifier uses.
fn credibility_bucket(source_type: &str) -> (f64, f64) {
    let lowered = source_type.to_lowercase();
    if lowered.contains("official") || lowered.contains("911") || lowered.contains("utility") {
        (0.75, 0.92)
    } else if lowered.contains("social") {
        (0.25, 0.55)
    } else {
        (0.45, 0.72)
    }
}

pub struct TextAnalyzer {
    oracle: Arc<dyn Oracle>,
}

impl TextAnalyzer {
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn analyze(&self, input: &TextInput) -> AnalyzerOutput {
        let system_prompt = "You are a disaster-response text analyst. Extract factual claims \
             from the report and estimate their credibility given the source type. Respond \
             with a JSON object containing claim and credibility.";
        let user_prompt = format!(
            "Source type: {}\nContent: {}",
            input.source_type, input.content
        );

        match self.oracle.complete(system_prompt, &user_prompt).await {
            Ok(response) => match extract_json(&response) {
                Some(data) => AnalyzerOutput {
                    analyzer_name: "text".to_string(),
                    output_type: "claim_extraction".to_string(),
                    confidence: data
                        .get("credibility")
                        .and_then(serde_json::Value::as_f64)
                        .unwrap_or(0.6),
                    data,
                    sources: vec![input.source_id.clone()],
                    reasoning: "parsed from oracle response".to_string(),
                    timestamp: Utc::now(),
                    used_fallback: false,
                },
                None => {
                    warn!(signal_id = %input.signal_id, "text oracle response unparseable, using fallback");
                    self.fallback(input)
                }
            },
            Err(err) => {
                warn!(signal_id = %input.signal_id, error = %err, "text oracle call failed, using fallback");
                self.fallback(input)
            }
        }
    }

    fn fallback(&self, input: &TextInput) -> AnalyzerOutput {
        let (low, high) = credibility_bucket(&input.source_type);
        let index = fallback_index(&input.signal_id, FALLBACK_CLAIM_SETS.len());
        let claim = FALLBACK_CLAIM_SETS[index];
        let credibility = low + (high - low) * 0.5;

        AnalyzerOutput {
            analyzer_name: "text".to_string(),
            output_type: "claim_extraction".to_string(),
            data: json!({
                "claim": claim,
                "credibility": credibility,
            }),
            confidence: credibility,
            sources: vec![input.source_id.clone()],
            reasoning: "deterministic fallback: no text oracle available".to_string(),
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
    async fn official_sources_get_high_credibility_bucket() {
        let analyzer = TextAnalyzer::new(Arc::new(NullOracle));
        let input = TextInput {
            signal_id: "sig_3".to_string(),
            source_id: "sig_3".to_string(),
            content: "Dispatch confirms structural collapse.".to_string(),
            source_type: "official_911".to_string(),
        };
        let out = analyzer.analyze(&input).await;
        assert!(out.used_fallback);
        assert!(out.confidence >= 0.75 && out.confidence <= 0.92);
    }

    #[tokio::test]
    async fn social_sources_get_low_credibility_bucket() {
        let analyzer = TextAnalyzer::new(Arc::new(NullOracle));
        let input = TextInput {
            signal_id: "sig_4".to_string(),
            source_id: "sig_4".to_string(),
            content: "Saw something on Twitter about a fire.".to_string(),
            source_type: "social_media".to_string(),
        };
        let out = analyzer.analyze(&input).await;
        assert!(out.confidence >= 0.25 && out.confidence <= 0.55);
    }
}
