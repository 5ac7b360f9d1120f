//! Single-action recommendations over the current situation. Grounded on
//! `original_source`'s `planning_agent.py`.

use std::sync::Arc;

use aegis_core::AnalyzerOutput;
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::extract::extract_json;
use crate::oracle::Oracle;

#[derive(Debug, Clone)]
pub struct PlanningInput {
    /// Id of the incident this recommendation targets, already chosen by
    /// the caller (e.g. the highest-urgency active incident).
    pub target_incident_id: String,
    pub situation_summary: String,
    pub available_resource_ids: Vec<String>,
}

pub struct PlanningAnalyzer {
    oracle: Arc<dyn Oracle>,
}

impl PlanningAnalyzer {
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn analyze(&self, input: &PlanningInput) -> AnalyzerOutput {
        let system_prompt = "You are a disaster-response planning analyst. Recommend one \
             concrete action given the situation summary and available resources. Respond \
             with a JSON object containing action_type, resources_to_allocate, rationale, \
             supporting_factors, confidence, tradeoffs, uncertainty_factors, and \
             time_sensitivity.";
        let user_prompt = format!(
            "Target incident: {}\nSituation: {}\nAvailable resources: {}",
            input.target_incident_id,
            input.situation_summary,
            input.available_resource_ids.join(", ")
        );

        match self.oracle.complete(system_prompt, &user_prompt).await {
            Ok(response) => match extract_json(&response) {
                Some(data) => AnalyzerOutput {
                    analyzer_name: "planning".to_string(),
                    output_type: "action_recommendation".to_string(),
                    confidence: data.get("confidence").and_then(serde_json::Value::as_f64).unwrap_or(0.6),
                    data,
                    sources: vec![input.target_incident_id.clone()],
                    reasoning: "parsed from oracle response".to_string(),
                    timestamp: Utc::now(),
                    used_fallback: false,
                },
                None => {
                    warn!(incident_id = %input.target_incident_id, "planning oracle response unparseable, using fallback");
                    self.fallback(input)
                }
            },
            Err(err) => {
                warn!(incident_id = %input.target_incident_id, error = %err, "planning oracle call failed, using fallback");
                self.fallback(input)
            }
        }
    }

    fn fallback(&self, input: &PlanningInput) -> AnalyzerOutput {
        let resource = input
            .available_resource_ids
            .first()
            .cloned()
            .unwrap_or_else(|| "AMB-1".to_string());

        AnalyzerOutput {
            analyzer_name: "planning".to_string(),
            output_type: "action_recommendation".to_string(),
            data: json!({
                "action_type": "dispatch_ambulance",
                "target_incident_id": input.target_incident_id,
                "resources_to_allocate": [resource],
                "rationale": "Highest-urgency active incident with no responding units yet.",
                "supporting_factors": [
                    "No units currently assigned",
                    "Reported trapped occupants",
                ],
                "tradeoffs": [
                    "Diverts coverage from adjacent sector",
                    "Response time estimate is a placeholder, not live routing",
                ],
                "uncertainty_factors": ["No live oracle available to confirm severity"],
                "time_sensitivity": "high",
            }),
            confidence: 0.55,
            sources: vec![input.target_incident_id.clone()],
            reasoning: "deterministic fallback: no planning oracle available".to_string(),
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
    async fn falls_back_to_canned_dispatch() {
        let analyzer = PlanningAnalyzer::new(Arc::new(NullOracle));
        let input = PlanningInput {
            target_incident_id: "inc_1".to_string(),
            situation_summary: "Collapse with trapped occupants, no units assigned".to_string(),
            available_resource_ids: vec!["AMB-3".to_string()],
        };
        let out = analyzer.analyze(&input).await;
        assert!(out.used_fallback);
        assert_eq!(out.field("action_type").unwrap(), "dispatch_ambulance");
        assert_eq!(out.field("tradeoffs").unwrap().as_array().unwrap().len(), 2);
    }
}
