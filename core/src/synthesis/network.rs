//! Network synthesis through the public translate-TTS endpoint.
//!
//! The endpoint accepts at most ~100 characters per request, so longer text
//! is split at word boundaries and the returned mp3 segments are concatenated
//! (mp3 frames are self-delimiting, so plain concatenation plays back).
//! The regional top-level domain from the voice profile selects the accent.

use super::error::ProviderError;
use super::traits::SynthesisProvider;
use super::util::chunk_text;
use super::ProviderId;
use crate::voice::{VoiceProfile, VoiceSettings};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const MAX_CHUNK_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct NetworkTtsConfig {
    pub enabled: bool,
    /// URL template; `{tld}` is replaced with the profile's domain
    pub endpoint: String,
    pub lang: String,
    pub timeout_ms: u64,
}

impl Default for NetworkTtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://translate.google.{tld}/translate_tts".to_string(),
            lang: "en".to_string(),
            timeout_ms: 30_000,
        }
    }
}

pub struct NetworkSynthesis {
    http: Client,
    cfg: NetworkTtsConfig,
}

impl NetworkSynthesis {
    pub fn new(cfg: NetworkTtsConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms.max(1)))
            .user_agent("Mozilla/5.0 (compatible; empathy-engine)")
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, cfg })
    }

    fn url_for(&self, tld: &str) -> String {
        self.cfg.endpoint.replace("{tld}", tld)
    }
}

#[async_trait]
impl SynthesisProvider for NetworkSynthesis {
    fn id(&self) -> ProviderId {
        ProviderId::Gtts
    }

    async fn attempt(
        &self,
        text: &str,
        voice: &VoiceSettings,
        out: &Path,
    ) -> Result<(), ProviderError> {
        let VoiceProfile::Network { tld, slow } = &voice.profile else {
            return Err(ProviderError::ProfileMismatch(self.id()));
        };
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(ProviderError::EmptyOutput);
        }

        let url = self.url_for(tld);
        let speed = if *slow { "0.3" } else { "1" };
        let total = chunks.len().to_string();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let idx_s = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            debug!(target = "synthesis", url = %url, idx, "GET translate_tts");
            let resp = self
                .http
                .get(&url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", self.cfg.lang.as_str()),
                    ("q", chunk.as_str()),
                    ("ttsspeed", speed),
                    ("total", total.as_str()),
                    ("idx", idx_s.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()
                .await
                .map_err(|e| ProviderError::CallFailed(e.to_string()))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(ProviderError::CallFailed(format!("HTTP {}", status)));
            }
            let bytes = resp
                .bytes()
                .await
                .map_err(|e| ProviderError::CallFailed(e.to_string()))?;
            if bytes.is_empty() {
                return Err(ProviderError::EmptyOutput);
            }
            audio.extend_from_slice(&bytes);
        }

        tokio::fs::write(out, &audio).await?;
        Ok(())
    }
}
