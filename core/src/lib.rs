// Empathy Core Library
// Emotion-aware text-to-speech: classify the tone of a text, cast a voice for it,
// and synthesize through whichever speech engine is usable right now.

pub mod config;
pub mod emotion;
pub mod pipeline;
pub mod registry;
pub mod synthesis;
pub mod voice;

// Export core types
pub use config::EngineConfig;
pub use emotion::{
    AggregatedResult, EmotionAdapter, EmotionAggregator, EmotionCategory, EmotionEngine,
    EmotionMode, EmotionResult,
};
pub use pipeline::{EmpathyEngine, HealthReport, StatusReport, SynthesisResponse};
pub use registry::{ProviderKey, ProviderRegistry};
pub use synthesis::{
    AudioArtifact, ProviderError, ProviderId, SynthesisOrchestrator, SynthesisProvider,
    SynthesisRequest,
};
pub use voice::{VoiceMapper, VoiceProfile, VoiceSettings};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmpathyError {
    #[error("No text provided")]
    EmptyText,

    #[error("Failed to generate audio with any available TTS engine (tried: {0})")]
    Exhausted(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, EmpathyError>;
