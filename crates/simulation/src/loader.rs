//! Pluggable scenario resolution. Disk I/O for scenario files is
//! explicitly out of scope as an external collaborator; a
//! [`ScenarioLoader`] is the seam a caller hangs a file-backed or
//! network-backed implementation off of.

use crate::scenario::{default_scenario, Scenario};

/// Resolves a scenario id to a [`Scenario`]. Implementations may read from
/// disk, a database, or anywhere else; returning `None` falls back to the
/// embedded default, mirroring `original_source`'s `_load_scenario` /
/// `_get_default_scenario` pairing.
pub trait ScenarioLoader: Send + Sync {
    fn load(&self, scenario_id: &str) -> Option<Scenario>;
}

/// Always defers to the embedded default scenario.
#[derive(Debug, Default)]
pub struct NullScenarioLoader;

impl ScenarioLoader for NullScenarioLoader {
    fn load(&self, _scenario_id: &str) -> Option<Scenario> {
        None
    }
}

/// Resolves `scenario_id` through `loader`, falling back to
/// [`default_scenario`] when the loader has nothing for it.
pub fn resolve(loader: &dyn ScenarioLoader, scenario_id: &str) -> Scenario {
    loader.load(scenario_id).unwrap_or_else(default_scenario)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_loader_falls_back_to_default() {
        let scenario = resolve(&NullScenarioLoader, "anything");
        assert_eq!(scenario.scenario_id, "earthquake_001");
    }
}
