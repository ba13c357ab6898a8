use super::ProviderId;
use thiserror::Error;

/// Why a single provider attempt did not produce audio. Always recoverable:
/// the orchestrator moves on to the next provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider call failed: {0}")]
    CallFailed(String),

    #[error("Provider timed out after {0} ms")]
    Timeout(u64),

    #[error("Provider produced no audio")]
    EmptyOutput,

    #[error("Voice profile does not fit provider {0}")]
    ProfileMismatch(ProviderId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
