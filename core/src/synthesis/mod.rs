//! Speech synthesis providers and the fallback orchestrator.
//!
//! Four provider variants sit behind [`SynthesisProvider`]:
//! - `gtts`: network translate-TTS endpoint (mp3)
//! - `espeak`: offline espeak-ng engine (wav)
//! - `macos_say`: the macOS `say` command (m4a), macOS only
//! - `google_cloud`: Google Cloud Text-to-Speech REST API (mp3)

pub mod cloud;
pub mod error;
pub mod network;
pub mod offline;
pub mod orchestrator;
pub mod platform;
pub mod traits;
pub mod util;

pub use cloud::{CloudSynthesis, GoogleCloudConfig};
pub use error::ProviderError;
pub use network::{NetworkSynthesis, NetworkTtsConfig};
pub use offline::OfflineSynthesis;
pub use orchestrator::{normalize_filename, AudioArtifact, SynthesisOrchestrator, SynthesisRequest};
pub use platform::PlatformSynthesis;
pub use traits::SynthesisProvider;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Speech engines known to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Gtts,
    Espeak,
    MacosSay,
    GoogleCloud,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::Gtts,
        ProviderId::Espeak,
        ProviderId::MacosSay,
        ProviderId::GoogleCloud,
    ];

    /// Order in which untried providers are attempted after the configured
    /// primary and fallback: network, offline, platform, cloud.
    pub const FALLBACK_ORDER: [ProviderId; 4] = [
        ProviderId::Gtts,
        ProviderId::Espeak,
        ProviderId::MacosSay,
        ProviderId::GoogleCloud,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gtts => "gtts",
            Self::Espeak => "espeak",
            Self::MacosSay => "macos_say",
            Self::GoogleCloud => "google_cloud",
        }
    }

    /// Container the engine writes natively.
    pub fn container(&self) -> AudioFormat {
        match self {
            Self::Gtts | Self::GoogleCloud => AudioFormat::Mp3,
            Self::Espeak => AudioFormat::Wav,
            Self::MacosSay => AudioFormat::M4a,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gtts" => Ok(Self::Gtts),
            "espeak" | "espeak-ng" => Ok(Self::Espeak),
            "macos_say" | "say" => Ok(Self::MacosSay),
            "google_cloud" => Ok(Self::GoogleCloud),
            other => Err(format!("unknown TTS provider '{}'", other)),
        }
    }
}

/// Audio containers the service hands out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    M4a,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 3] = [AudioFormat::Mp3, AudioFormat::Wav, AudioFormat::M4a];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::M4a => "m4a",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }
}
