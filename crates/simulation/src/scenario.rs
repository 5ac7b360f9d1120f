//! The scenario file shape: initial resources/locations plus an ordered
//! event timeline. Grounded on `original_source`'s
//! `simulation.py::_get_default_scenario` and its JSON sibling
//! `demo_data/scenario_earthquake.json`.

use serde::{Deserialize, Serialize};

/// A demo-playback scenario: starting resources and locations, plus the
/// timed event timeline the driver replays against wall-clock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub scenario_id: String,
    pub scenario_name: String,
    #[serde(default)]
    pub description: String,
    /// Keyed by category (`"ambulances"`, `"fire_trucks"`, ...); the
    /// trailing `s` is stripped to derive each resource's `resource_type`.
    #[serde(default)]
    pub initial_resources: std::collections::BTreeMap<String, Vec<ScenarioResource>>,
    #[serde(default)]
    pub initial_locations: Vec<ScenarioLocation>,
    pub events: Vec<ScenarioEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResource {
    pub id: String,
    #[serde(default = "default_sector")]
    pub sector: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_personnel")]
    pub personnel: u32,
}

fn default_sector() -> String {
    "1".to_string()
}
fn default_status() -> String {
    "available".to_string()
}
fn default_personnel() -> u32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioLocation {
    pub id: String,
    pub location_type: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_used: Option<u32>,
    #[serde(default = "default_operational")]
    pub status: String,
    #[serde(default = "default_accessible")]
    pub accessibility: String,
}

fn default_operational() -> String {
    "operational".to_string()
}
fn default_accessible() -> String {
    "accessible".to_string()
}

/// One entry on the event timeline. `demo_delay_seconds` is a pacing hint
/// (human-observable gap before the event fires); `time_offset_seconds` is
/// where the event lands on the simulated clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioEvent {
    pub time_offset_seconds: i64,
    #[serde(default = "default_demo_delay")]
    pub demo_delay_seconds: f64,
    #[serde(flatten)]
    pub kind: EventKind,
}

fn default_demo_delay() -> f64 {
    3.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "data", rename_all = "snake_case")]
pub enum EventKind {
    Signal(SignalEventData),
    SignalBatch(SignalBatchData),
    Aftershock(AftershockData),
    ResourceChange(ResourceChangeData),
    ContradictionInject(ContradictionInjectData),
    TimeMarker(TimeMarkerData),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One inbound signal, shaped exactly like the scenario JSON's signal
/// event data, whether standalone or nested in a `signal_batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalEventData {
    #[serde(rename = "type", default = "default_signal_type")]
    pub signal_type: String,
    #[serde(default)]
    pub location: SignalLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
}

fn default_signal_type() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalBatchData {
    pub signals: Vec<SignalEventData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AftershockData {
    #[serde(default = "default_magnitude")]
    pub magnitude: f64,
}

fn default_magnitude() -> f64 {
    4.2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceChangeData {
    pub resource_id: String,
    pub updates: ResourceUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContradictionInjectData {
    pub entity: String,
    #[serde(default = "default_entity_type")]
    pub entity_type: String,
    #[serde(default)]
    pub claims: Vec<ScenarioClaim>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_verdict: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal_analysis: Option<String>,
}

fn default_entity_type() -> String {
    "infrastructure".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioClaim {
    pub source: String,
    #[serde(default)]
    pub source_type: String,
    pub claim: String,
    #[serde(default = "default_claim_confidence")]
    pub confidence: f64,
}

fn default_claim_confidence() -> f64 {
    0.7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeMarkerData {
    #[serde(default)]
    pub label: String,
}

/// The embedded "Metro City 6.8 Earthquake" scenario, ported as literal
/// Rust data from `original_source`'s `_get_default_scenario`: 12
/// ambulances, 6 fire units, 4 search teams, 2 helicopters across 5
/// sectors, and an 11-event timeline (image/audio/text signals, one
/// contradiction injection, one aftershock, one time marker).
#[must_use]
pub fn default_scenario() -> Scenario {
    let mut initial_resources = std::collections::BTreeMap::new();
    initial_resources.insert(
        "ambulances".to_string(),
        (1..=12)
            .map(|n| ScenarioResource {
                id: format!("AMB-{n}"),
                sector: ambulance_sector(n).to_string(),
                status: "available".to_string(),
                personnel: 2,
            })
            .collect(),
    );
    initial_resources.insert(
        "fire_trucks".to_string(),
        vec![
            fire_unit("ENGINE-1", "1"),
            fire_unit("ENGINE-2", "2"),
            fire_unit("ENGINE-3", "3"),
            fire_unit("ENGINE-4", "4"),
            fire_unit("LADDER-1", "1"),
            fire_unit("LADDER-2", "3"),
        ],
    );
    initial_resources.insert(
        "search_teams".to_string(),
        vec![
            search_team("SAR-1", "1"),
            search_team("SAR-2", "2"),
            search_team("SAR-3", "3"),
            search_team("SAR-4", "4"),
        ],
    );
    initial_resources.insert(
        "helicopters".to_string(),
        vec![
            ScenarioResource { id: "HELI-1".to_string(), sector: "central".to_string(), status: "available".to_string(), personnel: 2 },
            ScenarioResource { id: "HELI-2".to_string(), sector: "central".to_string(), status: "available".to_string(), personnel: 2 },
        ],
    );

    Scenario {
        scenario_id: "earthquake_001".to_string(),
        scenario_name: "Metro City 6.8 Earthquake".to_string(),
        description: "Major earthquake strikes Metro City.".to_string(),
        initial_resources,
        initial_locations: vec![
            ScenarioLocation {
                id: "loc_metro_general".to_string(),
                location_type: "hospital".to_string(),
                name: "Metro General Hospital".to_string(),
                lat: 37.7850,
                lng: -122.4050,
                capacity_total: Some(200),
                capacity_used: Some(90),
                status: "operational".to_string(),
                accessibility: "accessible".to_string(),
            },
            ScenarioLocation {
                id: "loc_st_marys".to_string(),
                location_type: "hospital".to_string(),
                name: "St. Mary's Medical".to_string(),
                lat: 37.7620,
                lng: -122.4180,
                capacity_total: Some(150),
                capacity_used: Some(45),
                status: "operational".to_string(),
                accessibility: "accessible".to_string(),
            },
            ScenarioLocation {
                id: "loc_main_bridge".to_string(),
                location_type: "bridge".to_string(),
                name: "Main Street Bridge".to_string(),
                lat: 37.7800,
                lng: -122.4100,
                capacity_total: None,
                capacity_used: None,
                status: "operational".to_string(),
                accessibility: "accessible".to_string(),
            },
        ],
        events: vec![
            ScenarioEvent {
                time_offset_seconds: 5,
                demo_delay_seconds: 2.0,
                kind: EventKind::Signal(SignalEventData {
                    signal_type: "image".to_string(),
                    location: SignalLocation { lat: Some(37.790), lng: Some(-122.402), sector: Some("4".to_string()), name: None },
                    content: Some(
                        "Building collapse at 500 Market Street. Multi-story pancake collapse visible. \
                         Heavy debris field. Smoke rising from eastern section."
                            .to_string(),
                    ),
                    transcript: None,
                    source_type: None,
                }),
            },
            ScenarioEvent {
                time_offset_seconds: 8,
                demo_delay_seconds: 1.5,
                kind: EventKind::Signal(SignalEventData {
                    signal_type: "text".to_string(),
                    location: SignalLocation { lat: None, lng: None, sector: None, name: Some("500 Market Street".to_string()) },
                    content: Some("OMG major collapse on Market Street!! Everyone stay away!! Building completely down!! #MetroCityQuake".to_string()),
                    transcript: None,
                    source_type: Some("social_media".to_string()),
                }),
            },
            ScenarioEvent {
                time_offset_seconds: 12,
                demo_delay_seconds: 2.0,
                kind: EventKind::Signal(SignalEventData {
                    signal_type: "audio".to_string(),
                    location: SignalLocation { lat: Some(37.790), lng: Some(-122.402), sector: Some("4".to_string()), name: None },
                    content: None,
                    transcript: Some(
                        "Unit 7 to dispatch - we have multiple people trapped on the 4th floor at 500 Market \
                         Street. Stairwells are compromised. Pancake collapse on floors 2 through 4. Requesting \
                         search and rescue and minimum 3 ambulances. We can hear voices in the debris."
                            .to_string(),
                    ),
                    source_type: Some("first_responder".to_string()),
                }),
            },
            ScenarioEvent {
                time_offset_seconds: 15,
                demo_delay_seconds: 2.0,
                kind: EventKind::Signal(SignalEventData {
                    signal_type: "image".to_string(),
                    location: SignalLocation { lat: Some(37.772), lng: Some(-122.418), sector: Some("3".to_string()), name: None },
                    content: Some("Active fire visible from residential building in Sector 3. Smoke column rising. Adjacent structures at risk.".to_string()),
                    transcript: None,
                    source_type: None,
                }),
            },
            ScenarioEvent {
                time_offset_seconds: 18,
                demo_delay_seconds: 1.5,
                kind: EventKind::Signal(SignalEventData {
                    signal_type: "text".to_string(),
                    location: SignalLocation { lat: None, lng: None, sector: None, name: Some("Metro General Hospital".to_string()) },
                    content: Some(
                        "Metro General Hospital Status Update: Current ER capacity at 45%. Accepting trauma \
                         cases. Recommend diverting non-critical to St. Mary's Medical. All surgical teams on standby."
                            .to_string(),
                    ),
                    transcript: None,
                    source_type: Some("official_report".to_string()),
                }),
            },
            ScenarioEvent {
                time_offset_seconds: 22,
                demo_delay_seconds: 2.0,
                kind: EventKind::Signal(SignalEventData {
                    signal_type: "audio".to_string(),
                    location: SignalLocation { lat: Some(37.775), lng: Some(-122.420), sector: Some("3".to_string()), name: None },
                    content: None,
                    transcript: Some(
                        "This is civilian calling 911 - we are trapped in our apartment on Oak Street, third \
                         floor. The staircase has collapsed. There are 4 of us including 2 children. Please help us."
                            .to_string(),
                    ),
                    source_type: Some("civilian".to_string()),
                }),
            },
            ScenarioEvent {
                time_offset_seconds: 32,
                demo_delay_seconds: 3.0,
                kind: EventKind::ContradictionInject(ContradictionInjectData {
                    entity: "Main Street Bridge".to_string(),
                    entity_type: "infrastructure".to_string(),
                    claims: vec![
                        ScenarioClaim {
                            source: "audio_report".to_string(),
                            source_type: "first_responder".to_string(),
                            claim: "Bridge collapsed, completely impassable - confirmed collapse of main span".to_string(),
                            confidence: 0.72,
                        },
                        ScenarioClaim {
                            source: "satellite_img_14:40".to_string(),
                            source_type: "satellite".to_string(),
                            claim: "Bridge appears structurally intact, no visible collapse".to_string(),
                            confidence: 0.89,
                        },
                    ],
                    force_verdict: Some("CONTRADICTION".to_string()),
                    temporal_analysis: Some("Satellite image predates audio report by 21 minutes. Bridge collapse may have occurred after image capture.".to_string()),
                }),
            },
            ScenarioEvent {
                time_offset_seconds: 55,
                demo_delay_seconds: 2.0,
                kind: EventKind::Signal(SignalEventData {
                    signal_type: "image".to_string(),
                    location: SignalLocation { lat: Some(37.780), lng: Some(-122.410), sector: Some("2".to_string()), name: None },
                    content: Some("AERIAL VERIFICATION: Main Street Bridge - Main span has collapsed. Deck failure on western section confirmed. Bridge is impassable. Debris in waterway.".to_string()),
                    transcript: None,
                    source_type: None,
                }),
            },
            ScenarioEvent {
                time_offset_seconds: 68,
                demo_delay_seconds: 3.0,
                kind: EventKind::Signal(SignalEventData {
                    signal_type: "text".to_string(),
                    location: SignalLocation { lat: None, lng: None, sector: None, name: Some("Oak Street Building".to_string()) },
                    content: Some(
                        "911 Transcript: Caller reports family trapped in apartment building, 3rd floor, Oak \
                         Street and 5th Avenue. Building partially collapsed. 4 people including 2 children. Can \
                         hear other voices in building."
                            .to_string(),
                    ),
                    transcript: None,
                    source_type: Some("911_transcript".to_string()),
                }),
            },
            ScenarioEvent {
                time_offset_seconds: 72,
                demo_delay_seconds: 1.0,
                kind: EventKind::TimeMarker(TimeMarkerData { label: "Planning Agent generating recommendations...".to_string() }),
            },
            ScenarioEvent {
                time_offset_seconds: 120,
                demo_delay_seconds: 3.0,
                kind: EventKind::Aftershock(AftershockData { magnitude: 4.2 }),
            },
            ScenarioEvent {
                time_offset_seconds: 125,
                demo_delay_seconds: 2.0,
                kind: EventKind::Signal(SignalEventData {
                    signal_type: "image".to_string(),
                    location: SignalLocation { lat: Some(37.772), lng: Some(-122.418), sector: Some("3".to_string()), name: None },
                    content: Some("Secondary building collapse in Sector 3 following aftershock. Three-story residential structure partially collapsed. Active fire nearby.".to_string()),
                    transcript: None,
                    source_type: None,
                }),
            },
            ScenarioEvent {
                time_offset_seconds: 130,
                demo_delay_seconds: 2.0,
                kind: EventKind::Signal(SignalEventData {
                    signal_type: "text".to_string(),
                    location: SignalLocation { lat: None, lng: None, sector: None, name: Some("Oak/Elm Intersection".to_string()) },
                    content: Some("PG&E Alert: Gas leak detected at intersection of Oak Street and Elm Avenue, Sector 3. Field crews dispatched. Recommend immediate 200-meter evacuation radius.".to_string()),
                    transcript: None,
                    source_type: Some("utility_company".to_string()),
                }),
            },
        ],
    }
}

fn ambulance_sector(n: u32) -> &'static str {
    match n {
        1 | 2 | 11 => "1",
        3 | 4 | 12 => "2",
        5 | 6 => "3",
        7 | 8 => "4",
        _ => "5",
    }
}

fn fire_unit(id: &str, sector: &str) -> ScenarioResource {
    ScenarioResource { id: id.to_string(), sector: sector.to_string(), status: "available".to_string(), personnel: 2 }
}

fn search_team(id: &str, sector: &str) -> ScenarioResource {
    ScenarioResource { id: id.to_string(), sector: sector.to_string(), status: "available".to_string(), personnel: 6 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_has_expected_rosters() {
        let scenario = default_scenario();
        assert_eq!(scenario.initial_resources["ambulances"].len(), 12);
        assert_eq!(scenario.initial_resources["fire_trucks"].len(), 6);
        assert_eq!(scenario.initial_resources["search_teams"].len(), 4);
        assert_eq!(scenario.initial_resources["helicopters"].len(), 2);
        assert_eq!(scenario.initial_locations.len(), 3);
        assert_eq!(scenario.events.len(), 13);
    }

    #[test]
    fn event_kind_round_trips_through_json() {
        let scenario = default_scenario();
        let json = serde_json::to_string(&scenario).unwrap();
        let parsed: Scenario = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.events.len(), scenario.events.len());
        assert!(matches!(parsed.events[0].kind, EventKind::Signal(_)));
        assert!(matches!(parsed.events[6].kind, EventKind::ContradictionInject(_)));
        assert!(matches!(parsed.events[10].kind, EventKind::Aftershock(_)));
    }
}
