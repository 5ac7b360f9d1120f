use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A point on the map, with optional human-facing context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            sector: None,
            name: None,
            address: None,
        }
    }

    #[must_use]
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometers.
#[must_use]
pub fn haversine_km(a: &Location, b: &Location) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Deterministic fallback location used when a signal carries no
/// `metadata.location`. Jitters within a 0.1deg box centered on the demo
/// map origin, keyed off the signal id so repeated calls for the same
/// signal are stable.
#[must_use]
pub fn jittered_fallback_location(signal_id: &str) -> Location {
    const BASE_LAT: f64 = 37.78;
    const BASE_LNG: f64 = -122.41;

    let reversed: String = signal_id.chars().rev().collect();
    let lat_jitter = (string_hash(signal_id) % 100) as f64 * 0.001;
    let lng_jitter = (string_hash(&reversed) % 100) as f64 * 0.001;

    Location::new(BASE_LAT + lat_jitter, BASE_LNG + lng_jitter)
}

/// Simple, stable string hash (FNV-1a). Used only for deterministic demo
/// jitter, not for anything security-sensitive.
fn string_hash(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in s.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_distance() {
        let a = Location::new(37.78, -122.41);
        assert!((haversine_km(&a, &a)).abs() < 1e-9);
    }

    #[test]
    fn haversine_known_distance() {
        // San Francisco to Los Angeles, roughly 559 km.
        let sf = Location::new(37.7749, -122.4194);
        let la = Location::new(34.0522, -118.2437);
        let d = haversine_km(&sf, &la);
        assert!((500.0..=620.0).contains(&d), "unexpected distance {d}");
    }

    #[test]
    fn jittered_location_is_deterministic_and_bounded() {
        let a = jittered_fallback_location("sig_abc123");
        let b = jittered_fallback_location("sig_abc123");
        assert_eq!(a, b);
        assert!((37.78..=37.88).contains(&a.lat));
        assert!((-122.41..=-122.31).contains(&a.lng));
    }

    #[test]
    fn jittered_location_varies_by_signal_id() {
        let a = jittered_fallback_location("sig_aaaaaaaa");
        let b = jittered_fallback_location("sig_bbbbbbbb");
        assert_ne!(a, b);
    }
}
