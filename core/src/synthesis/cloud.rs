//! Google Cloud Text-to-Speech over its REST API.
//!
//! Authenticates with an API key, taken either from configuration directly or
//! from a credential file holding the key (plain text, or JSON with an
//! `api_key` field). The emotion's scalar speaking rate is applied here since
//! the API exposes a rate knob independent of the voice name.

use super::error::ProviderError;
use super::traits::SynthesisProvider;
use super::ProviderId;
use crate::voice::{VoiceProfile, VoiceSettings};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct GoogleCloudConfig {
    pub api_key: Option<String>,
    pub credentials_path: Option<PathBuf>,
    pub endpoint: String,
    pub language_code: String,
    pub timeout_ms: u64,
}

impl Default for GoogleCloudConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            credentials_path: None,
            endpoint: "https://texttospeech.googleapis.com/v1/text:synthesize".to_string(),
            language_code: "en-US".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Find a usable API key, or `None` if no credential is configured or the
/// credential file cannot be read.
pub fn resolve_api_key(cfg: &GoogleCloudConfig) -> Option<String> {
    if let Some(key) = cfg.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }
    let path = cfg.credentials_path.as_deref()?;
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            debug!(
                target = "synthesis",
                path = %path.display(),
                error = %e,
                "credential file unreadable"
            );
            return None;
        }
    };
    key_from_credentials(&contents)
}

fn key_from_credentials(contents: &str) -> Option<String> {
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') {
        let v: serde_json::Value = serde_json::from_str(trimmed).ok()?;
        return ["api_key", "apiKey", "key"]
            .iter()
            .find_map(|k| v.get(*k).and_then(|x| x.as_str()))
            .map(str::to_string)
            .filter(|k| !k.is_empty());
    }
    if trimmed.lines().count() == 1 && !trimmed.contains(char::is_whitespace) {
        return Some(trimmed.to_string());
    }
    None
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisBody<'a> {
    input: TextInput<'a>,
    voice: VoiceSelectionParams<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct TextInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams<'a> {
    language_code: &'a str,
    name: &'a str,
    ssml_gender: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisReply {
    audio_content: String,
}

pub struct CloudSynthesis {
    http: Client,
    cfg: GoogleCloudConfig,
    api_key: Option<String>,
}

impl CloudSynthesis {
    pub fn new(cfg: GoogleCloudConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms.max(1)))
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("Failed to build HTTP client: {e}")))?;
        let api_key = resolve_api_key(&cfg);
        Ok(Self { http, cfg, api_key })
    }
}

#[async_trait]
impl SynthesisProvider for CloudSynthesis {
    fn id(&self) -> ProviderId {
        ProviderId::GoogleCloud
    }

    fn is_supported(&self) -> bool {
        self.api_key.is_some()
    }

    async fn attempt(
        &self,
        text: &str,
        voice: &VoiceSettings,
        out: &Path,
    ) -> Result<(), ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::Unavailable("no Google Cloud API key".to_string()))?;
        let VoiceProfile::Cloud { voice_name, gender } = &voice.profile else {
            return Err(ProviderError::ProfileMismatch(self.id()));
        };

        let body = SynthesisBody {
            input: TextInput { text },
            voice: VoiceSelectionParams {
                language_code: &self.cfg.language_code,
                name: voice_name,
                ssml_gender: gender,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: voice.speaking_rate,
            },
        };

        debug!(
            target = "synthesis",
            voice = %voice_name,
            rate = voice.speaking_rate,
            "POST text:synthesize"
        );
        let resp = self
            .http
            .post(&self.cfg.endpoint)
            .header("X-Goog-Api-Key", key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::CallFailed(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(ProviderError::CallFailed(format!("HTTP {}: {}", status, detail)));
        }
        let reply: SynthesisReply = resp
            .json()
            .await
            .map_err(|e| ProviderError::CallFailed(format!("Failed to parse reply: {e}")))?;
        let audio = base64::engine::general_purpose::STANDARD
            .decode(reply.audio_content.as_bytes())
            .map_err(|e| ProviderError::CallFailed(format!("Invalid audio payload: {e}")))?;
        if audio.is_empty() {
            return Err(ProviderError::EmptyOutput);
        }
        tokio::fs::write(out, &audio).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_plain_file() {
        assert_eq!(key_from_credentials("  AIzaSyExample \n"), Some("AIzaSyExample".into()));
        assert_eq!(key_from_credentials(""), None);
        assert_eq!(key_from_credentials("two words"), None);
    }

    #[test]
    fn test_key_from_json_file() {
        assert_eq!(
            key_from_credentials(r#"{"api_key": "abc123"}"#),
            Some("abc123".into())
        );
        // service-account files carry no API key
        assert_eq!(
            key_from_credentials(r#"{"type": "service_account", "private_key": "..."}"#),
            None
        );
    }

    #[test]
    fn test_config_key_wins() {
        let cfg = GoogleCloudConfig {
            api_key: Some("direct".into()),
            credentials_path: Some("/nonexistent/creds.json".into()),
            ..GoogleCloudConfig::default()
        };
        assert_eq!(resolve_api_key(&cfg), Some("direct".into()));

        let cfg = GoogleCloudConfig {
            api_key: Some("   ".into()),
            credentials_path: Some("/nonexistent/creds.json".into()),
            ..GoogleCloudConfig::default()
        };
        assert_eq!(resolve_api_key(&cfg), None);
    }
}
