use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// One turn in a four-turn structured debate run over a contradiction
/// alert, broadcast to operators as it happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DebateTurn {
    pub alert_id: String,
    pub turn_number: u8,
    pub role: DebateRole,
    pub argument: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DebateRole {
    Defender,
    Challenger,
    Rebuttal,
    Synthesis,
}

impl DebateTurn {
    /// A debate always runs exactly four turns: defend, challenge, rebut,
    /// synthesize. Only the synthesis turn carries a final confidence.
    pub const TURN_COUNT: u8 = 4;
}
