use super::error::ProviderError;
use super::ProviderId;
use crate::voice::VoiceSettings;
use async_trait::async_trait;
use std::path::Path;

/// The core trait for every speech engine
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SynthesisProvider: Send + Sync {
    /// Stable identifier, also used in responses and configuration
    fn id(&self) -> ProviderId;

    /// Whether the engine can run on this machine at all. Checked before an
    /// attempt is made, never inferred from a failure.
    fn is_supported(&self) -> bool {
        true
    }

    /// Synthesize `text` into `out`, which the caller owns and cleans up.
    /// The file at `out` may already exist (empty) when this is called.
    async fn attempt(
        &self,
        text: &str,
        voice: &VoiceSettings,
        out: &Path,
    ) -> Result<(), ProviderError>;
}
