use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::recommendation::ActionStatus;

/// A transcribed voice report (911 call, field radio traffic) routed
/// through the text analyzer like any other text signal, but tracked
/// separately so operators can review raw call transcripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct VoiceReport {
    pub id: String,
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camp_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_signal_id: Option<String>,
    pub status: ActionStatus,
    pub created_at: DateTime<Utc>,
}
