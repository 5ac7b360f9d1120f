//! Plays a [`Scenario`] back against wall-clock time. Grounded on
//! `original_source`'s `simulation.py::run_simulation` and its event
//! handlers: the pacing formula, the detached-vs-awaited dispatch split,
//! and the pause/reset semantics are preserved exactly.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use aegis_core::{Accessibility, Claim, Location, LocationNode, LocationNodeStatus, ResourceNode, ResourceStatus, Verdict};
use aegis_coordinator::{Coordinator, SignalContent, SignalMetadata};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::loader::{resolve, NullScenarioLoader, ScenarioLoader};
use crate::scenario::{EventKind, Scenario, ScenarioEvent, ScenarioLocation, ScenarioResource, SignalEventData, SignalLocation};

/// Pause-poll interval while `simulation_paused` is set.
const PAUSE_POLL_INTERVAL: StdDuration = StdDuration::from_millis(200);

/// Minimum per-event pacing gap, regardless of speed multiplier.
const MIN_EVENT_DELAY_SECONDS: f64 = 0.3;

/// Delay between consecutive signals inside a `signal_batch`.
const BATCH_SIGNAL_GAP: StdDuration = StdDuration::from_millis(300);

/// Owns the currently-running scenario task (if any) and drives scenario
/// playback against a [`Coordinator`]. One driver is shared across the
/// lifetime of a server process; `start` replaces whatever was running.
pub struct SimulationDriver {
    coordinator: Arc<Coordinator>,
    loader: Arc<dyn ScenarioLoader>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulationDriver {
    #[must_use]
    pub fn new(coordinator: Arc<Coordinator>) -> Self {
        Self::with_loader(coordinator, Arc::new(NullScenarioLoader))
    }

    #[must_use]
    pub fn with_loader(coordinator: Arc<Coordinator>, loader: Arc<dyn ScenarioLoader>) -> Self {
        Self { coordinator, loader, task: Mutex::new(None) }
    }

    /// Resolves `scenario_id`, aborts any previously running scenario, and
    /// spawns a fresh playback task at the given speed multiplier.
    pub async fn start(&self, scenario_id: &str, speed: f64) {
        let scenario = resolve(self.loader.as_ref(), scenario_id);

        let mut task = self.task.lock().await;
        if let Some(handle) = task.take() {
            handle.abort();
        }

        let coordinator = self.coordinator.clone();
        *task = Some(tokio::spawn(async move {
            run(coordinator, scenario, speed).await;
        }));
    }

    pub async fn pause(&self) {
        self.coordinator.pause_simulation().await;
    }

    pub async fn resume(&self) {
        self.coordinator.resume_simulation().await;
    }

    /// Cancels the running scenario task and resets the coordinator's
    /// graph and bookkeeping. The driver task owns cancellation; the
    /// coordinator only owns state.
    pub async fn reset(&self) {
        let mut task = self.task.lock().await;
        if let Some(handle) = task.take() {
            handle.abort();
        }
        drop(task);
        self.coordinator.reset_simulation().await;
    }
}

async fn run(coordinator: Arc<Coordinator>, scenario: Scenario, speed: f64) {
    let now = Utc::now();
    info!(scenario = %scenario.scenario_name, "starting simulation");

    coordinator.begin_simulation(&scenario.scenario_id, &scenario.scenario_name, now).await;
    load_initial_resources(&coordinator, &scenario.initial_resources, now).await;
    load_initial_locations(&coordinator, &scenario.initial_locations, now).await;

    for event in &scenario.events {
        if !coordinator.is_simulation_running().await {
            return;
        }
        loop {
            if !coordinator.is_simulation_paused().await {
                break;
            }
            sleep(PAUSE_POLL_INTERVAL).await;
            if !coordinator.is_simulation_running().await {
                return;
            }
        }

        let wait_seconds = (event.demo_delay_seconds / speed).max(MIN_EVENT_DELAY_SECONDS);
        sleep(StdDuration::from_secs_f64(wait_seconds)).await;

        let sim_time = now + Duration::seconds(event.time_offset_seconds);
        coordinator.advance_sim_time(sim_time).await;

        dispatch_event(&coordinator, event, sim_time).await;
    }

    coordinator.finish_simulation().await;
    info!("simulation complete");
}

async fn dispatch_event(coordinator: &Arc<Coordinator>, event: &ScenarioEvent, sim_time: DateTime<Utc>) {
    match &event.kind {
        EventKind::Signal(data) => {
            // Signal events fire as a detached task so analyzer latency
            // never throws off the driver's pacing.
            let coordinator = coordinator.clone();
            let data = data.clone();
            tokio::spawn(async move {
                process_signal_event(&coordinator, &data).await;
            });
        }
        EventKind::SignalBatch(batch) => {
            let coordinator = coordinator.clone();
            let signals = batch.signals.clone();
            tokio::spawn(async move {
                for signal in signals {
                    process_signal_event(&coordinator, &signal).await;
                    sleep(BATCH_SIGNAL_GAP).await;
                }
            });
        }
        // Non-signal events are lightweight state mutations, awaited inline.
        EventKind::Aftershock(data) => {
            coordinator.trigger_aftershock(data.magnitude, sim_time).await;
        }
        EventKind::ResourceChange(data) => {
            if let Some(status) = data.updates.status.as_deref().and_then(parse_resource_status) {
                if let Err(err) = coordinator.update_resource_status(&data.resource_id, status).await {
                    warn!(error = %err, resource_id = %data.resource_id, "resource_change event targeted an unknown resource");
                }
            }
        }
        EventKind::ContradictionInject(data) => {
            let claims = data
                .claims
                .iter()
                .map(|claim| Claim {
                    source_id: claim.source.clone(),
                    claim_text: claim.claim.clone(),
                    timestamp: sim_time,
                    credibility_score: claim.confidence,
                })
                .collect();
            let forced_verdict = data.force_verdict.as_deref().and_then(parse_verdict);
            coordinator
                .inject_contradiction(&data.entity, claims, forced_verdict, data.temporal_analysis.clone())
                .await;
        }
        EventKind::TimeMarker(data) => {
            coordinator.note_time_marker(&data.label).await;
        }
    }
}

async fn process_signal_event(coordinator: &Coordinator, data: &SignalEventData) {
    let metadata = SignalMetadata { location: resolve_location(&data.location, requires_coords(&data.signal_type)) };

    let content = match data.signal_type.as_str() {
        "audio" => SignalContent::Audio {
            context_hint: data.transcript.clone().or_else(|| data.content.clone()).unwrap_or_default(),
        },
        "image" => SignalContent::Image { description: data.content.clone().unwrap_or_default() },
        _ => SignalContent::Text {
            content: data.content.clone().unwrap_or_default(),
            source_type: data.source_type.clone().unwrap_or_else(|| "unverified".to_string()),
        },
    };

    coordinator.process_signal(content, metadata).await;
}

fn requires_coords(signal_type: &str) -> bool {
    signal_type != "text"
}

/// Text signals only need a `name` to accumulate a claim; image/audio
/// signals need real coordinates or the coordinator falls back to a
/// jittered location itself.
fn resolve_location(location: &SignalLocation, requires_coords: bool) -> Option<Location> {
    if requires_coords {
        let (lat, lng) = (location.lat?, location.lng?);
        return Some(Location { lat, lng, sector: location.sector.clone(), name: location.name.clone(), address: None });
    }
    if location.lat.is_none() && location.lng.is_none() && location.name.is_none() && location.sector.is_none() {
        return None;
    }
    Some(Location {
        lat: location.lat.unwrap_or(0.0),
        lng: location.lng.unwrap_or(0.0),
        sector: location.sector.clone(),
        name: location.name.clone(),
        address: None,
    })
}

fn parse_verdict(raw: &str) -> Option<Verdict> {
    match raw.to_lowercase().as_str() {
        "contradiction" => Some(Verdict::Contradiction),
        "temporal_gap" => Some(Verdict::TemporalGap),
        "consistent" => Some(Verdict::Consistent),
        "uncertain" => Some(Verdict::Uncertain),
        _ => None,
    }
}

fn parse_resource_status(raw: &str) -> Option<ResourceStatus> {
    match raw.to_lowercase().as_str() {
        "available" => Some(ResourceStatus::Available),
        "dispatched" => Some(ResourceStatus::Dispatched),
        "on_scene" => Some(ResourceStatus::OnScene),
        "returning" => Some(ResourceStatus::Returning),
        "offline" => Some(ResourceStatus::Offline),
        _ => None,
    }
}

/// Base coordinates per sector, matching `original_source`'s
/// `resource_locations` table.
fn sector_base(sector: &str) -> (f64, f64) {
    match sector {
        "1" => (37.790, -122.402),
        "2" => (37.780, -122.410),
        "3" => (37.772, -122.418),
        "4" => (37.760, -122.405),
        "5" => (37.755, -122.415),
        _ => (37.78, -122.41),
    }
}

/// Deterministic per-resource jitter so units in the same sector don't
/// all stack on one point. FNV-1a, matching `aegis_core::geo`'s private
/// jitter hash in shape (demo placement only, not security-sensitive).
fn jitter_offset(id: &str) -> f64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in id.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
    }
    (hash % 50) as f64 * 0.0005 - 0.0125
}

async fn load_initial_resources(coordinator: &Coordinator, resources: &HashMap<String, Vec<ScenarioResource>>, now: DateTime<Utc>) {
    for (category, items) in resources {
        let resource_type = category.strip_suffix('s').unwrap_or(category).to_string();
        for item in items {
            let (base_lat, base_lng) = sector_base(&item.sector);
            let location = Location {
                lat: base_lat + jitter_offset(&item.id),
                lng: base_lng + jitter_offset(&format!("{}_rev", &item.id)),
                sector: Some(item.sector.clone()),
                name: None,
                address: None,
            };
            let status = parse_resource_status(&item.status).unwrap_or(ResourceStatus::Available);
            coordinator
                .seed_resource(ResourceNode {
                    id: item.id.clone(),
                    resource_type: resource_type.clone(),
                    unit_id: item.id.clone(),
                    current_location: location,
                    destination: None,
                    status,
                    assigned_incident: None,
                    personnel: item.personnel,
                    capacity_remaining: 2,
                    eta_minutes: None,
                    updated_at: now,
                })
                .await;
        }
    }
}

async fn load_initial_locations(coordinator: &Coordinator, locations: &[ScenarioLocation], now: DateTime<Utc>) {
    for loc in locations {
        let status = match loc.status.as_str() {
            "damaged" => LocationNodeStatus::Damaged,
            "destroyed" => LocationNodeStatus::Destroyed,
            "unknown" => LocationNodeStatus::Unknown,
            _ => LocationNodeStatus::Operational,
        };
        let accessibility = match loc.accessibility.as_str() {
            "partially_blocked" => Accessibility::PartiallyBlocked,
            "blocked" => Accessibility::Blocked,
            "hazardous" => Accessibility::Hazardous,
            "unknown" => Accessibility::Unknown,
            _ => Accessibility::Accessible,
        };
        coordinator
            .seed_location(LocationNode {
                id: loc.id.clone(),
                location: Location { lat: loc.lat, lng: loc.lng, sector: None, name: Some(loc.name.clone()), address: None },
                location_type: loc.location_type.clone(),
                capacity_total: loc.capacity_total,
                capacity_used: loc.capacity_used,
                status,
                accessibility,
                confidence: 0.9,
                sources: Vec::new(),
                updated_at: now,
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_analyzer::NullOracle;
    use aegis_audit_memory::InMemoryAuditStore;
    use aegis_coordinator::CoordinatorBuilder;
    use std::sync::Arc;
    use tokio::time::timeout;

    fn build_coordinator() -> Arc<Coordinator> {
        Arc::new(
            CoordinatorBuilder::new()
                .oracle(Arc::new(NullOracle))
                .audit_store(Arc::new(InMemoryAuditStore::new()))
                .build(),
        )
    }

    #[tokio::test]
    async fn start_seeds_resources_and_locations() {
        let coordinator = build_coordinator();
        let driver = SimulationDriver::new(coordinator.clone());

        driver.start("earthquake_001", 1000.0).await;

        // Give the spawned driver task a moment to perform initial seeding
        // (happens before the first event's pacing sleep).
        tokio::time::sleep(StdDuration::from_millis(50)).await;

        let snapshot = coordinator.snapshot().await;
        assert_eq!(snapshot.resources.len(), 24);
        assert_eq!(snapshot.locations.len(), 3);
        assert!(coordinator.is_simulation_running().await);

        driver.reset().await;
        let snapshot = coordinator.snapshot().await;
        assert!(snapshot.resources.is_empty());
        assert!(!coordinator.is_simulation_running().await);
    }

    #[tokio::test]
    async fn pause_blocks_event_progression() {
        let coordinator = build_coordinator();
        let driver = SimulationDriver::new(coordinator.clone());

        driver.start("earthquake_001", 10_000.0).await;
        driver.pause().await;

        // While paused, no further events should land even after a
        // generous wait relative to the sped-up pacing.
        let _ = timeout(StdDuration::from_millis(100), async {
            loop {
                if coordinator.snapshot().await.incidents.len() > 0 {
                    break;
                }
                tokio::time::sleep(StdDuration::from_millis(5)).await;
            }
        })
        .await;

        assert!(coordinator.is_simulation_paused().await);
        driver.reset().await;
    }

    #[test]
    fn resolve_location_requires_coords_for_image_and_audio() {
        let bare_name = SignalLocation { lat: None, lng: None, sector: None, name: Some("Oak St".to_string()) };
        assert!(resolve_location(&bare_name, true).is_none());
        assert!(resolve_location(&bare_name, false).is_some());

        let with_coords = SignalLocation { lat: Some(1.0), lng: Some(2.0), sector: None, name: None };
        assert!(resolve_location(&with_coords, true).is_some());
    }
}
