//! Process configuration, loaded once at startup from the environment.
//! Mirrors the shape of `original_source`'s `Settings`/`get_settings()`
//! pairing; the two API-key fields are carried through even though no
//! live oracle implementation ships in this workspace, since a deployer
//! wiring one in will want the same settings surface the Python original
//! exposed.

use std::env;

const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:3000"];
const DEFAULT_SIMULATION_SPEED: f64 = 1.0;
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Settings {
    pub gemini_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub cors_origins: Vec<String>,
    pub simulation_speed: f64,
    pub port: u16,
}

impl Settings {
    /// Reads `GEMINI_API_KEY`, `ELEVENLABS_API_KEY`, `CORS_ORIGINS`
    /// (comma-separated), `SIMULATION_SPEED`, and `PORT` from the
    /// process environment, falling back to documented defaults for
    /// anything absent or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// The parsing logic behind [`Self::from_env`], taking a lookup
    /// function instead of reading the process environment directly so
    /// it can be exercised without mutating real env vars (mutating them
    /// requires `unsafe` as of the 2024 edition, which this workspace
    /// forbids).
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|v| !v.is_empty()),
            elevenlabs_api_key: lookup("ELEVENLABS_API_KEY").filter(|v| !v.is_empty()),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|raw| raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
                .filter(|origins: &Vec<String>| !origins.is_empty())
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()),
            simulation_speed: lookup("SIMULATION_SPEED").and_then(|raw| raw.parse().ok()).unwrap_or(DEFAULT_SIMULATION_SPEED),
            port: lookup("PORT").and_then(|raw| raw.parse().ok()).unwrap_or(DEFAULT_PORT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.cors_origins, vec!["http://localhost:5173", "http://localhost:3000"]);
        assert!((settings.simulation_speed - 1.0).abs() < f64::EPSILON);
        assert_eq!(settings.port, 8080);
        assert!(settings.gemini_api_key.is_none());
    }

    #[test]
    fn parses_comma_separated_origins_and_trims_whitespace() {
        let settings = Settings::from_lookup(|key| match key {
            "CORS_ORIGINS" => Some(" https://a.example, https://b.example ".to_string()),
            "PORT" => Some("9090".to_string()),
            "SIMULATION_SPEED" => Some("2.5".to_string()),
            _ => None,
        });
        assert_eq!(settings.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(settings.port, 9090);
        assert!((settings.simulation_speed - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn blank_api_keys_are_treated_as_unset() {
        let settings = Settings::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some(String::new()),
            _ => None,
        });
        assert!(settings.gemini_api_key.is_none());
    }
}
