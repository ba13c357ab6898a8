//! Provider availability, probed once at startup.
//!
//! Each probe is lightweight: look for a binary on `PATH`, check that an
//! endpoint or credential is configured, or compare the build platform. A
//! probe that errors counts as "unavailable"; nothing here is raised to
//! callers. The registry is immutable after construction and shared by
//! reference between request pipelines.

use crate::config::EngineConfig;
use crate::emotion::EmotionEngine;
use crate::synthesis::{cloud, util, ProviderId};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Anything the registry can answer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKey {
    Emotion(EmotionEngine),
    Synthesis(ProviderId),
}

impl From<EmotionEngine> for ProviderKey {
    fn from(e: EmotionEngine) -> Self {
        Self::Emotion(e)
    }
}

impl From<ProviderId> for ProviderKey {
    fn from(p: ProviderId) -> Self {
        Self::Synthesis(p)
    }
}

/// Availability flags as reported by the status interface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityReport {
    pub emotion: BTreeMap<String, bool>,
    pub tts: BTreeMap<String, bool>,
}

#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    emotion: BTreeMap<EmotionEngine, bool>,
    synthesis: BTreeMap<ProviderId, bool>,
}

impl ProviderRegistry {
    /// Probe every known provider against the current environment.
    pub fn probe(cfg: &EngineConfig) -> Self {
        let emotion = EmotionEngine::ALL
            .iter()
            .map(|&e| (e, probe_emotion(cfg, e)))
            .collect();
        let synthesis = ProviderId::ALL
            .iter()
            .map(|&p| (p, probe_synthesis(cfg, p)))
            .collect();
        let registry = Self { emotion, synthesis };
        registry.log_summary();
        registry
    }

    /// Build from explicit flags. Providers not listed are unavailable, except
    /// the lexicon scorer, which is always available.
    pub fn with_availability(
        emotion: impl IntoIterator<Item = (EmotionEngine, bool)>,
        synthesis: impl IntoIterator<Item = (ProviderId, bool)>,
    ) -> Self {
        let mut emotion_map: BTreeMap<EmotionEngine, bool> =
            EmotionEngine::ALL.iter().map(|&e| (e, false)).collect();
        emotion_map.extend(emotion);
        emotion_map.insert(EmotionEngine::Vader, true);

        let mut synthesis_map: BTreeMap<ProviderId, bool> =
            ProviderId::ALL.iter().map(|&p| (p, false)).collect();
        synthesis_map.extend(synthesis);

        Self {
            emotion: emotion_map,
            synthesis: synthesis_map,
        }
    }

    pub fn is_available(&self, key: impl Into<ProviderKey>) -> bool {
        match key.into() {
            ProviderKey::Emotion(e) => self.emotion.get(&e).copied().unwrap_or(false),
            ProviderKey::Synthesis(p) => self.synthesis.get(&p).copied().unwrap_or(false),
        }
    }

    pub fn any_synthesis_available(&self) -> bool {
        self.synthesis.values().any(|&v| v)
    }

    pub fn report(&self) -> AvailabilityReport {
        AvailabilityReport {
            emotion: self
                .emotion
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), *v))
                .collect(),
            tts: self
                .synthesis
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), *v))
                .collect(),
        }
    }

    fn log_summary(&self) {
        for (engine, ok) in &self.emotion {
            info!(target = "registry", engine = %engine, available = *ok, "emotion engine");
        }
        for (provider, ok) in &self.synthesis {
            info!(target = "registry", provider = %provider, available = *ok, "tts provider");
        }
    }
}

fn probe_emotion(cfg: &EngineConfig, engine: EmotionEngine) -> bool {
    match engine {
        EmotionEngine::Vader => true,
        EmotionEngine::HuggingFace => cfg
            .classifier
            .api_url
            .as_deref()
            .is_some_and(|u| u.starts_with("http://") || u.starts_with("https://")),
        EmotionEngine::TextBlob => cfg.polarity_enabled,
    }
}

fn probe_synthesis(cfg: &EngineConfig, provider: ProviderId) -> bool {
    match provider {
        ProviderId::Gtts => cfg.network.enabled && !cfg.network.endpoint.is_empty(),
        ProviderId::Espeak => {
            util::find_binary(cfg.espeak_bin.as_deref(), &["espeak-ng", "espeak"]).is_some()
        }
        ProviderId::MacosSay => {
            cfg!(target_os = "macos")
                && util::find_binary(cfg.say_bin.as_deref(), &["say"]).is_some()
        }
        ProviderId::GoogleCloud => cloud::resolve_api_key(&cfg.google).is_some(),
    }
}
