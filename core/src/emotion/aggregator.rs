//! Runs the configured classifiers and picks the authoritative result.
//!
//! Precedence in ensemble mode: the ML classifier when it produced a result,
//! otherwise the lexicon scorer. The polarity scorer is recorded alongside
//! but never promoted. Classification failures never surface to callers; the
//! lexicon scorer backs every path.

use super::{EmotionAdapter, EmotionEngine, EmotionResult, LexiconAdapter};
use crate::registry::ProviderRegistry;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// How many classifiers run per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmotionMode {
    /// Run one named engine; the lexicon scorer stands in if it fails
    Single(EmotionEngine),
    /// Run every available engine and choose by precedence
    Ensemble,
}

impl Default for EmotionMode {
    fn default() -> Self {
        Self::Ensemble
    }
}

impl fmt::Display for EmotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(engine) => f.write_str(engine.as_str()),
            Self::Ensemble => f.write_str("ensemble"),
        }
    }
}

impl FromStr for EmotionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "ensemble" {
            return Ok(Self::Ensemble);
        }
        let engine = s.strip_prefix("single:").unwrap_or(&s);
        engine.parse::<EmotionEngine>().map(Self::Single)
    }
}

/// Per-engine results of one request plus the chosen primary.
#[derive(Debug, Clone)]
pub struct AggregatedResult {
    analyses: BTreeMap<EmotionEngine, EmotionResult>,
    primary: EmotionResult,
}

impl AggregatedResult {
    pub fn into_parts(self) -> (EmotionResult, BTreeMap<EmotionEngine, EmotionResult>) {
        (self.primary, self.analyses)
    }
}

pub struct EmotionAggregator {
    mode: EmotionMode,
    registry: Arc<ProviderRegistry>,
    lexicon: Arc<LexiconAdapter>,
    adapters: BTreeMap<EmotionEngine, Arc<dyn EmotionAdapter>>,
}

impl EmotionAggregator {
    /// `adapters` holds the non-lexicon engines; a lexicon entry is ignored.
    pub fn new(
        mode: EmotionMode,
        registry: Arc<ProviderRegistry>,
        lexicon: Arc<LexiconAdapter>,
        adapters: Vec<Arc<dyn EmotionAdapter>>,
    ) -> Self {
        let adapters = adapters
            .into_iter()
            .filter(|a| a.engine() != EmotionEngine::Vader)
            .map(|a| (a.engine(), a))
            .collect();
        Self {
            mode,
            registry,
            lexicon,
            adapters,
        }
    }

    /// Classify `text`. Always yields a primary result.
    #[tracing::instrument(skip(self, text), fields(mode = %self.mode, chars = text.len()))]
    pub async fn analyze(&self, text: &str) -> AggregatedResult {
        match self.mode {
            EmotionMode::Single(EmotionEngine::Vader) => {
                let lex = self.lexicon.analyze(text);
                self.finish(BTreeMap::new(), lex)
            }
            EmotionMode::Single(engine) => {
                let mut analyses = BTreeMap::new();
                if let Some(result) = self.run(engine, text).await {
                    analyses.insert(engine, result.clone());
                    return AggregatedResult {
                        analyses,
                        primary: result,
                    };
                }
                debug!(target = "emotion", engine = %engine, "falling back to lexicon scorer");
                let lex = self.lexicon.analyze(text);
                self.finish(analyses, lex)
            }
            EmotionMode::Ensemble => {
                let mut analyses = BTreeMap::new();
                // one engine at a time
                for engine in [EmotionEngine::HuggingFace, EmotionEngine::TextBlob] {
                    if let Some(result) = self.run(engine, text).await {
                        analyses.insert(engine, result);
                    }
                }
                let lex = self.lexicon.analyze(text);
                let primary = analyses
                    .get(&EmotionEngine::HuggingFace)
                    .cloned()
                    .unwrap_or_else(|| lex.clone());
                analyses.insert(EmotionEngine::Vader, lex);
                AggregatedResult { analyses, primary }
            }
        }
    }

    fn finish(
        &self,
        mut analyses: BTreeMap<EmotionEngine, EmotionResult>,
        lex: EmotionResult,
    ) -> AggregatedResult {
        analyses.insert(EmotionEngine::Vader, lex.clone());
        AggregatedResult {
            analyses,
            primary: lex,
        }
    }

    async fn run(&self, engine: EmotionEngine, text: &str) -> Option<EmotionResult> {
        if !self.registry.is_available(engine) {
            debug!(target = "emotion", engine = %engine, "engine unavailable; skipped");
            return None;
        }
        let adapter = self.adapters.get(&engine)?;
        match adapter.classify(text).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(target = "emotion", engine = %engine, error = %e, "classification failed");
                None
            }
        }
    }
}
