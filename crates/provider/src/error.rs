use thiserror::Error;

/// Errors an [`crate::Oracle`] call can fail with. Every caller treats all
/// of these identically: catch, log, fall back.
#[derive(Debug, Error)]
pub enum OracleError {
    /// No credentials configured for the upstream provider.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    /// The upstream call returned an error or timed out.
    #[error("oracle call failed: {0}")]
    CallFailed(String),

    /// The oracle's response could not be parsed into the expected shape.
    #[error("could not extract JSON from oracle response")]
    UnparseableResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            OracleError::Unavailable("no GEMINI_API_KEY".into()).to_string(),
            "oracle unavailable: no GEMINI_API_KEY"
        );
        assert_eq!(
            OracleError::UnparseableResponse.to_string(),
            "could not extract JSON from oracle response"
        );
    }
}
