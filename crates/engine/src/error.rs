//! Engine error taxonomy.
//!
//! All of these are recovered internally: the public recommendation surface
//! degrades to fallback results instead of propagating them. They exist so
//! that internal paths can report precisely what went wrong to the logs.

/// Errors that can occur inside the engine.
///
/// Vector-dimension mismatches are deliberately absent: similarity between
/// incompatible vectors is defined as `0.0`, not an error.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// Catalog or interaction fetch failed; the engine serves from an empty
    /// or stale snapshot instead.
    #[error("data load failed: {0}")]
    DataLoad(#[source] anyhow::Error),
    /// A retrain cycle failed; the previous model state stays authoritative.
    #[error("retrain cycle failed: {0}")]
    Training(#[source] anyhow::Error),
    /// Composing one user's recommendations failed; only that call degrades
    /// to the fallback list.
    #[error("recommendation request failed for {user}")]
    Request {
        /// User the failed request was for ("anonymous" when absent).
        user: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_cause() {
        let err = EngineError::DataLoad(anyhow::anyhow!("catalog endpoint unreachable"));
        assert!(err.to_string().contains("catalog endpoint unreachable"));
    }

    #[test]
    fn request_error_names_the_user() {
        let err = EngineError::Request {
            user: "u-42".into(),
        };
        assert!(err.to_string().contains("u-42"));
    }
}
