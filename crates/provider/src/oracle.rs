//! The [`Oracle`] trait is the one dynamic seam in this crate: every
//! analyzer holds an `Arc<dyn Oracle>` instead of calling a concrete LLM
//! client directly, so a credential-bearing provider can be swapped in
//! without touching analyzer logic. [`NullOracle`] is the default:
//! it always fails, which is what drives every analyzer onto its
//! deterministic fallback path in the absence of configured credentials.

use async_trait::async_trait;

use crate::error::OracleError;

/// A single text-in, text-out call to an external reasoning provider.
///
/// Object-safe so it can be stored behind `Arc<dyn Oracle>` and shared
/// across analyzers and coordinator tasks.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OracleError>;
}

/// An oracle with no upstream configured. Always fails, so every
/// analyzer built against it runs its deterministic fallback. This is
/// what keeps the coordination server fully operable, and its
/// properties testable, without any live LLM or TTS credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOracle;

#[async_trait]
impl Oracle for NullOracle {
    async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String, OracleError> {
        Err(OracleError::Unavailable("no oracle configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_oracle_always_fails() {
        let result = NullOracle.complete("system", "user").await;
        assert!(matches!(result, Err(OracleError::Unavailable(_))));
    }
}
