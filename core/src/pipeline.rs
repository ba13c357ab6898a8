//! Request pipeline: text in, emotion-matched audio out.
//!
//! One [`EmpathyEngine`] is built at startup and shared across requests. A
//! request validates and truncates its text, classifies it, casts a voice and
//! runs the synthesis fallback chain. Classification never fails a request;
//! only an empty input or an exhausted synthesis chain does.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::emotion::{
    ClassifierAdapter, EmotionAdapter, EmotionAggregator, EmotionCategory, EmotionEngine,
    EmotionMode, EmotionResult, LexiconAdapter, PolarityAdapter,
};
use crate::registry::{AvailabilityReport, ProviderRegistry};
use crate::synthesis::orchestrator::OrchestratorSettings;
use crate::synthesis::{
    util, CloudSynthesis, NetworkSynthesis, OfflineSynthesis, PlatformSynthesis, ProviderId,
    SynthesisOrchestrator, SynthesisProvider, SynthesisRequest,
};
use crate::voice::VoiceMapper;
use crate::{EmpathyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmotionScores {
    /// Signed headline score of the primary engine
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    /// Confidence of the primary result
    pub intensity: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisResponse {
    pub audio_ref: String,
    pub emotion: EmotionCategory,
    pub emotion_scores: EmotionScores,
    pub engine_used: EmotionEngine,
    pub tts_provider_used: ProviderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_analyses: Option<BTreeMap<EmotionEngine, EmotionResult>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConfig {
    pub emotion_engine: String,
    pub tts_engine: ProviderId,
    pub fallback_tts: ProviderId,
    pub max_text_length: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub platform: &'static str,
    pub version: &'static str,
}

/// Read-only view of configuration and provider availability.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub current_config: CurrentConfig,
    pub available_engines: AvailabilityReport,
    pub system_info: SystemInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub tts_available: bool,
    pub emotion_available: bool,
}

pub struct EmpathyEngine {
    config: EngineConfig,
    registry: Arc<ProviderRegistry>,
    aggregator: EmotionAggregator,
    orchestrator: SynthesisOrchestrator,
}

impl EmpathyEngine {
    /// Probe the environment and build every provider `config` names.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        let registry = Arc::new(ProviderRegistry::probe(&config));

        let voices = match &config.voice_table_path {
            Some(path) => VoiceMapper::load(path)?,
            None => VoiceMapper::builtin(),
        };

        let mut adapters: Vec<Arc<dyn EmotionAdapter>> =
            vec![Arc::new(PolarityAdapter::new(config.polarity_enabled))];
        if config.classifier.api_url.is_some() {
            match ClassifierAdapter::new(config.classifier.clone()) {
                Ok(a) => adapters.push(Arc::new(a)),
                Err(e) => warn!(target = "pipeline", error = %e, "ML classifier disabled"),
            }
        }

        let mut providers: Vec<Arc<dyn SynthesisProvider>> = Vec::new();
        match NetworkSynthesis::new(config.network.clone()) {
            Ok(p) => providers.push(Arc::new(p)),
            Err(e) => {
                warn!(target = "pipeline", provider = "gtts", error = %e, "provider disabled")
            }
        }
        providers.push(Arc::new(OfflineSynthesis::new(util::find_binary(
            config.espeak_bin.as_deref(),
            &["espeak-ng", "espeak"],
        ))));
        providers.push(Arc::new(PlatformSynthesis::new(util::find_binary(
            config.say_bin.as_deref(),
            &["say"],
        ))));
        match CloudSynthesis::new(config.google.clone()) {
            Ok(p) => providers.push(Arc::new(p)),
            Err(e) => {
                warn!(
                    target = "pipeline",
                    provider = "google_cloud",
                    error = %e,
                    "provider disabled"
                )
            }
        }

        Ok(Self::assemble(config, registry, voices, adapters, providers))
    }

    /// Wire an engine from already-built parts.
    pub fn assemble(
        config: EngineConfig,
        registry: Arc<ProviderRegistry>,
        voices: VoiceMapper,
        adapters: Vec<Arc<dyn EmotionAdapter>>,
        providers: Vec<Arc<dyn SynthesisProvider>>,
    ) -> Self {
        let aggregator = EmotionAggregator::new(
            config.emotion_mode,
            registry.clone(),
            Arc::new(LexiconAdapter::new()),
            adapters,
        );
        let orchestrator = SynthesisOrchestrator::new(
            OrchestratorSettings::from_config(&config),
            registry.clone(),
            Arc::new(voices),
            providers,
        );
        Self {
            config,
            registry,
            aggregator,
            orchestrator,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Handle one request body's `text` field.
    #[tracing::instrument(skip(self, text))]
    pub async fn process(&self, text: Option<&str>) -> Result<SynthesisResponse> {
        let text = match text {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(EmpathyError::EmptyText),
        };
        let text = truncate_chars(text, self.config.max_text_length);
        if text.trim().is_empty() {
            return Err(EmpathyError::EmptyText);
        }

        let aggregated = self.aggregator.analyze(text).await;
        let (primary, analyses) = aggregated.into_parts();

        let request = SynthesisRequest {
            text: text.to_string(),
            category: primary.category(),
            filename: format!("output_{}.mp3", Uuid::new_v4().simple()),
        };
        let artifact = self.orchestrator.synthesize(&request).await?;

        info!(
            target = "pipeline",
            emotion = %primary.category(),
            engine = %primary.engine(),
            provider = %artifact.provider,
            audio = %artifact.audio_ref,
            "Request served"
        );

        let summary = primary.summary();
        Ok(SynthesisResponse {
            audio_ref: artifact.audio_ref,
            emotion: primary.category(),
            emotion_scores: EmotionScores {
                compound: summary.compound,
                positive: summary.positive,
                negative: summary.negative,
                neutral: summary.neutral,
                intensity: primary.confidence(),
            },
            engine_used: primary.engine(),
            tts_provider_used: artifact.provider,
            all_analyses: matches!(self.config.emotion_mode, EmotionMode::Ensemble)
                .then_some(analyses),
        })
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            current_config: CurrentConfig {
                emotion_engine: self.config.emotion_mode.to_string(),
                tts_engine: self.config.tts_engine,
                fallback_tts: self.config.fallback_tts,
                max_text_length: self.config.max_text_length,
            },
            available_engines: self.registry.report(),
            system_info: SystemInfo {
                platform: std::env::consts::OS,
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "healthy",
            tts_available: self.registry.any_synthesis_available(),
            emotion_available: true,
        }
    }
}

/// Cut `text` to at most `max` characters, on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
