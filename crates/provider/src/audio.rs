//! Transcription and urgency extraction from audio signals. Grounded on
//! `original_source`'s `audio_agent.py`.

use std::sync::Arc;

use aegis_core::AnalyzerOutput;
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::extract::extract_json;
use crate::oracle::Oracle;
use crate::vision::fallback_index;

#[derive(Debug, Clone)]
pub struct AudioInput {
    pub signal_id: String,
    pub source_id: String,
    /// Stands in for the audio bytes; transcription itself is the
    /// oracle's job, this is only the hint given alongside the upload.
    pub context_hint: String,
}

/// Transcript, urgency, and `persons_involved.trapped.{min,max}` (when the
/// scenario reports a trapped range; `None` mirrors the original's
/// `"trapped": null` for signals with no trapped persons at all).
const FALLBACK_TRANSCRIPTS: [(&str, &str, Option<(u32, u32)>); 3] = [
    (
        "Caller reporting a pancake collapse at a mid-rise, first responder on scene \
         requesting urban search and rescue support immediately.",
        "critical",
        Some((4, 7)),
    ),
    (
        "Civilian calling about a trapped family in a basement after the building next \
         door came down, unclear how many people are inside.",
        "high",
        Some((4, 4)),
    ),
    (
        "Fire department radio traffic describing fire spreading between two structures, \
         requesting additional engines.",
        "high",
        None,
    ),
];

pub struct AudioAnalyzer {
    oracle: Arc<dyn Oracle>,
}

impl AudioAnalyzer {
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn analyze(&self, input: &AudioInput) -> AnalyzerOutput {
        let system_prompt = "You are a disaster-response call analyst. Transcribe the audio \
             and extract urgency. Respond with a JSON object containing transcript, urgency, \
             and persons_involved (with an optional trapped range of {min, max}).";
        let user_prompt = format!("Audio context: {}", input.context_hint);

        match self.oracle.complete(system_prompt, &user_prompt).await {
            Ok(response) => match extract_json(&response) {
                Some(data) => AnalyzerOutput {
                    analyzer_name: "audio".to_string(),
                    output_type: "transcription".to_string(),
                    confidence: data.get("confidence").and_then(serde_json::Value::as_f64).unwrap_or(0.6),
                    data,
                    sources: vec![input.source_id.clone()],
                    reasoning: "parsed from oracle response".to_string(),
                    timestamp: Utc::now(),
                    used_fallback: false,
                },
                None => {
                    warn!(signal_id = %input.signal_id, "audio oracle response unparseable, using fallback");
                    self.fallback(input)
                }
            },
            Err(err) => {
                warn!(signal_id = %input.signal_id, error = %err, "audio oracle call failed, using fallback");
                self.fallback(input)
            }
        }
    }

    fn fallback(&self, input: &AudioInput) -> AnalyzerOutput {
        let index = fallback_index(&input.signal_id, FALLBACK_TRANSCRIPTS.len());
        let (transcript, urgency, trapped) = FALLBACK_TRANSCRIPTS[index];
        let trapped = match trapped {
            Some((min, max)) => json!({ "min": min, "max": max }),
            None => serde_json::Value::Null,
        };

        AnalyzerOutput {
            analyzer_name: "audio".to_string(),
            output_type: "transcription".to_string(),
            data: json!({
                "transcript": transcript,
                "urgency": urgency,
                "persons_involved": { "trapped": trapped },
            }),
            confidence: 0.5,
            sources: vec![input.source_id.clone()],
            reasoning: "deterministic fallback: no audio oracle available".to_string(),
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
    async fn falls_back_when_oracle_unavailable() {
        let analyzer = AudioAnalyzer::new(Arc::new(NullOracle));
        let input = AudioInput {
            signal_id: "sig_2".to_string(),
            source_id: "sig_2".to_string(),
            context_hint: "911 call about a collapsed structure".to_string(),
        };
        let out = analyzer.analyze(&input).await;
        assert!(out.used_fallback);
        assert!(out.field("transcript").is_some());
        assert!(out.data.get("persons_involved").and_then(|p| p.get("trapped")).is_some());
    }
}
