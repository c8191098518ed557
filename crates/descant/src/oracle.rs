//! The melody-oracle seam.

use async_trait::async_trait;
use counterpoint::{Composition, Voice};

/// Errors from the external melody oracle.
///
/// These are kept apart from rule violations everywhere: the refinement
/// loop never mistakes a failed oracle call for a clean check.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("oracle request timed out")]
    Timeout,

    #[error("oracle API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("oracle returned an empty response")]
    EmptyResponse,

    #[error("could not extract a composition from the response: {0}")]
    Malformed(String),

    #[error("response is missing the {0} staff")]
    MissingVoice(&'static str),
}

/// External generative service that proposes counterpoint candidates.
///
/// Implementations receive the fixed cantus firmus and, after a failed
/// check, the combined violation report as corrective feedback. The first
/// request of a refinement run carries no feedback.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn propose(
        &self,
        cantus_firmus: &Voice,
        feedback: Option<&str>,
    ) -> Result<Composition, OracleError>;
}
