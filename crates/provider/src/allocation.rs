//! Batch resource assignment and camp siting across the whole situation.
//! Grounded on `original_source`'s `allocation_agent.py`.

use std::sync::Arc;

use aegis_core::AnalyzerOutput;
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::extract::extract_json;
use crate::oracle::Oracle;

#[derive(Debug, Clone)]
pub struct AllocationInput {
    pub situation_summary: String,
    pub incident_ids: Vec<String>,
    pub available_resource_ids: Vec<String>,
    pub location_ids: Vec<String>,
}

pub struct AllocationAnalyzer {
    oracle: Arc<dyn Oracle>,
}

impl AllocationAnalyzer {
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn analyze(&self, input: &AllocationInput) -> AnalyzerOutput {
        let system_prompt = "You are a disaster-response allocation analyst. Given active \
             incidents and available resources, propose a batch set of resource assignments \
             and any camp recommendations needed for shelter overflow. Respond with a JSON \
             object containing assignments (array of resource_id, incident_id, rationale), \
             camps (array of name, location_id, suggested_capacity, rationale), rationale, \
             and confidence.";
        let user_prompt = format!(
            "Situation: {}\nIncidents: {}\nAvailable resources: {}\nLocations: {}",
            input.situation_summary,
            input.incident_ids.join(", "),
            input.available_resource_ids.join(", "),
            input.location_ids.join(", ")
        );

        match self.oracle.complete(system_prompt, &user_prompt).await {
            Ok(response) => match extract_json(&response) {
                Some(data) => AnalyzerOutput {
                    analyzer_name: "allocation".to_string(),
                    output_type: "allocation_plan".to_string(),
                    confidence: data.get("confidence").and_then(serde_json::Value::as_f64).unwrap_or(0.6),
                    data,
                    sources: input.incident_ids.clone(),
                    reasoning: "parsed from oracle response".to_string(),
                    timestamp: Utc::now(),
                    used_fallback: false,
                },
                None => {
                    warn!("allocation oracle response unparseable, using fallback");
                    self.fallback(input)
                }
            },
            Err(err) => {
                warn!(error = %err, "allocation oracle call failed, using fallback");
                self.fallback(input)
            }
        }
    }

    fn fallback(&self, input: &AllocationInput) -> AnalyzerOutput {
        let incident = input.incident_ids.first().cloned().unwrap_or_else(|| "inc_1".to_string());
        let resource = input
            .available_resource_ids
            .first()
            .cloned()
            .unwrap_or_else(|| "AMB-1".to_string());
        let location = input.location_ids.first().cloned().unwrap_or_else(|| "loc_1".to_string());

        AnalyzerOutput {
            analyzer_name: "allocation".to_string(),
            output_type: "allocation_plan".to_string(),
            data: json!({
                "assignments": [
                    {
                        "resource_id": resource,
                        "incident_id": incident,
                        "rationale": "Nearest available unit to the highest-urgency incident",
                    }
                ],
                "camps": [
                    {
                        "name": "Relief Camp Alpha",
                        "location_id": location,
                        "suggested_capacity": 150,
                        "rationale": "Central sector with road access for displaced residents",
                    },
                    {
                        "name": "Rescue Staging Area Bravo",
                        "location_id": location,
                        "suggested_capacity": 60,
                        "rationale": "Forward staging point for search and rescue teams",
                    },
                ],
                "rationale": "Balance immediate dispatch needs against shelter overflow risk.",
            }),
            confidence: 0.55,
            sources: input.incident_ids.clone(),
            reasoning: "deterministic fallback: no allocation oracle available".to_string(),
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
    async fn falls_back_to_canned_plan_and_camps() {
        let analyzer = AllocationAnalyzer::new(Arc::new(NullOracle));
        let input = AllocationInput {
            situation_summary: "Multiple active incidents, shelter space tight".to_string(),
            incident_ids: vec!["inc_1".to_string()],
            available_resource_ids: vec!["AMB-2".to_string()],
            location_ids: vec!["loc_1".to_string()],
        };
        let out = analyzer.analyze(&input).await;
        assert!(out.used_fallback);
        assert_eq!(out.field("camps").unwrap().as_array().unwrap().len(), 2);
        assert_eq!(out.field("assignments").unwrap().as_array().unwrap().len(), 1);
    }
}
