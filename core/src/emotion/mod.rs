//! Emotion classification
//!
//! Three interchangeable classifiers produce incompatible raw outputs
//! (compound score, label + score, polarity + subjectivity). Each adapter
//! normalizes its provider's output into an [`EmotionResult`] carrying one of
//! the seven [`EmotionCategory`] levels, and the [`EmotionAggregator`] picks
//! the authoritative result for a request.

pub mod aggregator;
pub mod classifier;
pub mod lexicon;
mod lexicon_data;
pub mod polarity;

pub use aggregator::{AggregatedResult, EmotionAggregator, EmotionMode};
pub use classifier::{ClassifierAdapter, ClassifierConfig};
pub use lexicon::LexiconAdapter;
pub use polarity::PolarityAdapter;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Seven-level polarity/intensity scale shared by every classifier.
/// Variants are declared from most negative to most positive so the derived
/// `Ord` follows polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EmotionCategory {
    #[serde(rename = "Very Negative")]
    VeryNegative,
    #[serde(rename = "Negative")]
    Negative,
    #[serde(rename = "Slightly Negative")]
    SlightlyNegative,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Slightly Positive")]
    SlightlyPositive,
    #[serde(rename = "Positive")]
    Positive,
    #[serde(rename = "Very Positive")]
    VeryPositive,
}

impl EmotionCategory {
    pub const ALL: [EmotionCategory; 7] = [
        EmotionCategory::VeryNegative,
        EmotionCategory::Negative,
        EmotionCategory::SlightlyNegative,
        EmotionCategory::Neutral,
        EmotionCategory::SlightlyPositive,
        EmotionCategory::Positive,
        EmotionCategory::VeryPositive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryNegative => "Very Negative",
            Self::Negative => "Negative",
            Self::SlightlyNegative => "Slightly Negative",
            Self::Neutral => "Neutral",
            Self::SlightlyPositive => "Slightly Positive",
            Self::Positive => "Positive",
            Self::VeryPositive => "Very Positive",
        }
    }

    pub fn is_positive(&self) -> bool {
        *self > Self::Neutral
    }

    pub fn is_negative(&self) -> bool {
        *self < Self::Neutral
    }

    /// Map a signed score onto the scale using symmetric magnitude bands.
    ///
    /// Positive bands are checked first with `>=`, negative bands with `<=`,
    /// so a score sitting exactly on a boundary lands in the stronger band.
    /// Non-finite scores map to `Neutral`, keeping the mapping total.
    pub fn from_score(score: f64, bands: &ScoreBands) -> Self {
        if !score.is_finite() {
            return Self::Neutral;
        }
        if score >= bands.strong {
            Self::VeryPositive
        } else if score >= bands.moderate {
            Self::Positive
        } else if score >= bands.slight {
            Self::SlightlyPositive
        } else if score <= -bands.strong {
            Self::VeryNegative
        } else if score <= -bands.moderate {
            Self::Negative
        } else if score <= -bands.slight {
            Self::SlightlyNegative
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().replace(' ', "").to_ascii_lowercase() == norm)
            .ok_or_else(|| format!("unknown emotion category '{}'", s))
    }
}

/// Magnitude thresholds for [`EmotionCategory::from_score`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBands {
    pub strong: f64,
    pub moderate: f64,
    pub slight: f64,
}

/// Classification back ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionEngine {
    /// Lexicon-based compound scorer, always available
    Vader,
    /// Pretrained text-classification model behind an inference endpoint
    #[serde(rename = "huggingface")]
    HuggingFace,
    /// Polarity/subjectivity scorer
    #[serde(rename = "textblob")]
    TextBlob,
}

impl EmotionEngine {
    pub const ALL: [EmotionEngine; 3] = [
        EmotionEngine::Vader,
        EmotionEngine::HuggingFace,
        EmotionEngine::TextBlob,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vader => "vader",
            Self::HuggingFace => "huggingface",
            Self::TextBlob => "textblob",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Vader => "VADER",
            Self::HuggingFace => "Hugging Face",
            Self::TextBlob => "TextBlob",
        }
    }
}

impl fmt::Display for EmotionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vader" | "lexicon" => Ok(Self::Vader),
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "textblob" | "polarity" => Ok(Self::TextBlob),
            other => Err(format!("unknown emotion engine '{}'", other)),
        }
    }
}

/// Headline numbers reported to callers, filled by each adapter from its own
/// output. Fields a provider has no notion of stay at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

/// Normalized output of one classifier call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionResult {
    engine: EmotionEngine,
    category: EmotionCategory,
    confidence: f64,
    summary: ScoreSummary,
    raw_scores: BTreeMap<String, Value>,
}

impl EmotionResult {
    pub fn new(
        engine: EmotionEngine,
        category: EmotionCategory,
        confidence: f64,
        summary: ScoreSummary,
        raw_scores: BTreeMap<String, Value>,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.abs().min(1.0)
        } else {
            0.0
        };
        Self {
            engine,
            category,
            confidence,
            summary,
            raw_scores,
        }
    }

    pub fn engine(&self) -> EmotionEngine {
        self.engine
    }

    pub fn category(&self) -> EmotionCategory {
        self.category
    }

    /// Always within `[0, 1]`.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn summary(&self) -> &ScoreSummary {
        &self.summary
    }

    /// Provider-specific diagnostics, passed through untouched.
    pub fn raw_scores(&self) -> &BTreeMap<String, Value> {
        &self.raw_scores
    }
}

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    #[error("Classification call failed: {0}")]
    CallFailed(String),

    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),
}

/// A classification back end normalized to the shared result shape.
#[async_trait]
pub trait EmotionAdapter: Send + Sync {
    fn engine(&self) -> EmotionEngine;

    async fn classify(&self, text: &str) -> Result<EmotionResult, ClassifyError>;
}

pub(crate) fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
