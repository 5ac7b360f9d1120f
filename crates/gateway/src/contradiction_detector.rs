//! Accumulates claims per entity and surfaces entities ready for
//! verification once two or more disagree. Grounded on
//! `original_source`'s `coordinator.py::_check_contradictions`.

use std::collections::{HashMap, HashSet};

use aegis_core::Claim;

/// The claims gathered so far about one named entity (an incident or a
/// location, keyed by the name the text analyzer extracted).
#[derive(Debug, Clone)]
pub struct EntityClaims {
    pub entity_id: String,
    pub entity_type: String,
    pub entity_name: String,
    pub claims: Vec<Claim>,
}

/// Per-entity claim accumulator. An entity that has already produced a
/// contradiction alert is "handled" and ignores further claims until an
/// operator resolves the alert and the entity is explicitly cleared.
#[derive(Debug, Default)]
pub struct ContradictionDetector {
    entities: HashMap<String, EntityClaims>,
    handled: HashSet<String>,
}

impl ContradictionDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one claim about `entity_name`, unless that entity already
    /// has an unresolved contradiction alert outstanding.
    pub fn record_claim(
        &mut self,
        entity_id: &str,
        entity_type: &str,
        entity_name: &str,
        claim: Claim,
    ) {
        if self.handled.contains(entity_name) {
            return;
        }
        self.entities
            .entry(entity_name.to_string())
            .or_insert_with(|| EntityClaims {
                entity_id: entity_id.to_string(),
                entity_type: entity_type.to_string(),
                entity_name: entity_name.to_string(),
                claims: Vec::new(),
            })
            .claims
            .push(claim);
    }

    /// Entities with two or more accumulated claims, ready to be checked
    /// by the verification analyzer. The caller should stop at the first
    /// confirmed contradiction: at most one alert is raised per call.
    #[must_use]
    pub fn candidates(&self) -> Vec<EntityClaims> {
        self.entities
            .values()
            .filter(|entity| entity.claims.len() >= 2)
            .cloned()
            .collect()
    }

    /// Drops an entity's accumulated claims without marking it handled,
    /// so a verification failure doesn't wedge future accumulation.
    pub fn clear_claims(&mut self, entity_name: &str) {
        self.entities.remove(entity_name);
    }

    /// Marks an entity handled after a confirmed contradiction alert and
    /// clears its claims, so it stops accumulating until the alert is
    /// resolved.
    pub fn mark_handled(&mut self, entity_name: &str) {
        self.handled.insert(entity_name.to_string());
        self.entities.remove(entity_name);
    }

    /// Clears all accumulated state, for simulation reset.
    pub fn reset(&mut self) {
        self.entities.clear();
        self.handled.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claim(text: &str) -> Claim {
        Claim {
            source_id: "sig_1".to_string(),
            claim_text: text.to_string(),
            timestamp: Utc::now(),
            credibility_score: 0.6,
        }
    }

    #[test]
    fn candidate_appears_only_after_two_claims() {
        let mut detector = ContradictionDetector::new();
        detector.record_claim("inc_1", "incident", "Main Street Bridge", claim("intact"));
        assert!(detector.candidates().is_empty());

        detector.record_claim("inc_1", "incident", "Main Street Bridge", claim("collapsed"));
        let candidates = detector.candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].claims.len(), 2);
    }

    #[test]
    fn handled_entity_ignores_further_claims() {
        let mut detector = ContradictionDetector::new();
        detector.record_claim("inc_1", "incident", "Main Street Bridge", claim("a"));
        detector.record_claim("inc_1", "incident", "Main Street Bridge", claim("b"));
        detector.mark_handled("Main Street Bridge");

        detector.record_claim("inc_1", "incident", "Main Street Bridge", claim("c"));
        assert!(detector.candidates().is_empty());
    }

    #[test]
    fn clearing_claims_allows_fresh_accumulation() {
        let mut detector = ContradictionDetector::new();
        detector.record_claim("inc_1", "incident", "Main Street Bridge", claim("a"));
        detector.record_claim("inc_1", "incident", "Main Street Bridge", claim("b"));
        detector.clear_claims("Main Street Bridge");
        assert!(detector.candidates().is_empty());

        detector.record_claim("inc_1", "incident", "Main Street Bridge", claim("c"));
        assert_eq!(detector.candidates().len(), 0);
    }
}
