//! Structured four-turn debate over a contradiction alert: a defender
//! argues the claims are consistent, a challenger argues they conflict, a
//! rebuttal responds, and a synthesis turn renders a final read. Grounded
//! on `original_source`'s `debate_agent.py`.

use std::sync::Arc;

use aegis_core::{ContradictionAlert, DebateRole, DebateTurn};
use chrono::Utc;

use crate::extract::extract_json;
use crate::oracle::Oracle;

#[derive(Debug, Clone)]
pub struct DebateInput<'a> {
    pub alert: &'a ContradictionAlert,
}

/// Canned turn content used when the oracle is unavailable for a given
/// turn, in (role, argument, confidence) order. Used verbatim: the same
/// four turns every time an alert debate falls back fully.
const FALLBACK_TURNS: [(DebateRole, &str, f64); 4] = [
    (
        DebateRole::Defender,
        "The claims can be reconciled: the reporting sources observed the site at \
         different times, and conditions on the ground were still evolving.",
        0.89,
    ),
    (
        DebateRole::Challenger,
        "The claims describe mutually exclusive states of the same structure within a \
         narrow window; this is a genuine contradiction, not a timing artifact.",
        0.78,
    ),
    (
        DebateRole::Rebuttal,
        "Even granting evolving conditions, the rate of change implied is inconsistent \
         with the physical event being described.",
        0.61,
    ),
    (
        DebateRole::Synthesis,
        "The contradiction stands; recommend requesting verification before acting on \
         either claim.",
        0.74,
    ),
];

pub struct DebateAnalyzer {
    oracle: Arc<dyn Oracle>,
}

impl DebateAnalyzer {
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// Runs all four turns of the debate over `input.alert`, consulting
    /// the oracle once per turn and falling back to canned content turn
    /// by turn when the oracle fails or its response can't be parsed.
    pub async fn run(&self, input: &DebateInput<'_>) -> Vec<DebateTurn> {
        let mut turns = Vec::with_capacity(DebateTurn::TURN_COUNT as usize);
        let mut transcript = String::new();

        for (turn_number, (role, fallback_argument, fallback_confidence)) in
            FALLBACK_TURNS.into_iter().enumerate()
        {
            let turn = self
                .run_turn(input.alert, role, turn_number as u8 + 1, &transcript, fallback_argument, fallback_confidence)
                .await;
            transcript.push_str(&format!("{:?}: {}\n", turn.role, turn.argument));
            turns.push(turn);
        }

        turns
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_turn(
        &self,
        alert: &ContradictionAlert,
        role: DebateRole,
        turn_number: u8,
        transcript_so_far: &str,
        fallback_argument: &str,
        fallback_confidence: f64,
    ) -> DebateTurn {
        let system_prompt = format!(
            "You are the {role:?} in a structured debate over a contradiction alert. \
             Respond with a JSON object containing argument and confidence."
        );
        let user_prompt = format!(
            "Entity: {}\nClaims: {}\nDebate so far:\n{}",
            alert.entity_name,
            alert.claims.len(),
            transcript_so_far
        );

        match self.oracle.complete(&system_prompt, &user_prompt).await {
            Ok(response) => match extract_json(&response) {
                Some(data) => {
                    let argument = data
                        .get("argument")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| fallback_argument.to_string());
                    let confidence = data.get("confidence").and_then(serde_json::Value::as_f64);
                    DebateTurn {
                        alert_id: alert.id.clone(),
                        turn_number,
                        role,
                        argument,
                        confidence,
                        timestamp: Utc::now(),
                    }
                }
                None => self.fallback_turn(alert, role, turn_number, fallback_argument, fallback_confidence),
            },
            Err(_) => self.fallback_turn(alert, role, turn_number, fallback_argument, fallback_confidence),
        }
    }

    fn fallback_turn(
        &self,
        alert: &ContradictionAlert,
        role: DebateRole,
        turn_number: u8,
        argument: &str,
        confidence: f64,
    ) -> DebateTurn {
        DebateTurn {
            alert_id: alert.id.clone(),
            turn_number,
            role,
            argument: argument.to_string(),
            confidence: Some(confidence),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::NullOracle;
    use aegis_core::{Severity, Urgency, Verdict};

    fn sample_alert() -> ContradictionAlert {
        ContradictionAlert {
            id: "alert_1".to_string(),
            entity_id: "inc_1".to_string(),
            entity_type: "incident".to_string(),
            entity_name: "Main Street Bridge".to_string(),
            claims: vec![],
            verdict: Verdict::Contradiction,
            severity: Severity::High,
            temporal_analysis: None,
            recommended_action: aegis_core::RecommendedActionType::RequestVerification,
            recommended_action_details: String::new(),
            urgency: Urgency::High,
            created_at: Utc::now(),
            resolved: false,
            resolution: None,
            resolved_by: None,
            resolved_at: None,
        }
    }

    #[tokio::test]
    async fn runs_four_turns_with_fixed_confidences_when_oracle_unavailable() {
        let analyzer = DebateAnalyzer::new(Arc::new(NullOracle));
        let alert = sample_alert();
        let turns = analyzer.run(&DebateInput { alert: &alert }).await;

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, DebateRole::Defender);
        assert_eq!(turns[0].confidence, Some(0.89));
        assert_eq!(turns[3].role, DebateRole::Synthesis);
        assert_eq!(turns[3].confidence, Some(0.74));
        assert!(turns.iter().all(|t| t.alert_id == "alert_1"));
    }
}
