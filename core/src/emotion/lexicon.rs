//! Lexicon-based compound scorer.
//!
//! Rule-based valence scoring in the style of VADER: per-word valences from a
//! fixed lexicon, adjusted for degree modifiers ("very", "slightly"),
//! negation within a three-word window, ALL-CAPS emphasis, contrastive "but",
//! and trailing `!`/`?` amplification. The summed valence is squashed into a
//! compound score in `[-1, 1]`.
//!
//! This adapter has no external dependency and never fails, which makes it
//! the classifier of last resort for the aggregator.

use super::lexicon_data::{BOOSTERS, NEGATIONS, VALENCES};
use super::{
    round3, ClassifyError, EmotionAdapter, EmotionCategory, EmotionEngine, EmotionResult,
    ScoreBands, ScoreSummary,
};
use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
const NORMALIZE_ALPHA: f64 = 15.0;
const EXCLAMATION_INCR: f64 = 0.292;
const QUESTION_INCR: f64 = 0.18;
const QUESTION_MAX: f64 = 0.96;

/// Compound-score bands for the lexicon scorer.
pub const LEXICON_BANDS: ScoreBands = ScoreBands {
    strong: 0.6,
    moderate: 0.2,
    slight: 0.05,
};

/// Raw scorer output: compound score plus positive/negative/neutral proportions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolarityScores {
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

pub struct LexiconAdapter {
    valences: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl Default for LexiconAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconAdapter {
    pub fn new() -> Self {
        Self {
            valences: VALENCES.iter().copied().collect(),
            boosters: BOOSTERS
                .iter()
                .map(|&(w, up)| (w, if up { B_INCR } else { B_DECR }))
                .collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    /// Map a compound score onto the category scale.
    pub fn categorize(compound: f64) -> EmotionCategory {
        EmotionCategory::from_score(compound, &LEXICON_BANDS)
    }

    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return PolarityScores::default();
        }
        let lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        let upper_count = tokens.iter().filter(|t| is_all_caps(t)).count();
        let cap_differential = upper_count > 0 && upper_count < tokens.len();

        let mut sentiments = Vec::with_capacity(tokens.len());
        for (i, word) in lower.iter().enumerate() {
            if self.boosters.contains_key(word.as_str()) {
                sentiments.push(0.0);
                continue;
            }
            if word == "kind" && lower.get(i + 1).is_some_and(|next| next == "of") {
                sentiments.push(0.0);
                continue;
            }
            let Some(&base) = self.valences.get(word.as_str()) else {
                sentiments.push(0.0);
                continue;
            };

            let mut valence = base;
            if cap_differential && is_all_caps(tokens[i]) {
                valence += C_INCR.copysign(valence);
            }

            for dist in 1..=3usize {
                if i < dist {
                    break;
                }
                let prev = &lower[i - dist];
                if !self.valences.contains_key(prev.as_str()) {
                    if let Some(scalar) =
                        self.booster_scalar(prev, tokens[i - dist], valence, cap_differential)
                    {
                        let damp = match dist {
                            1 => 1.0,
                            2 => 0.95,
                            _ => 0.9,
                        };
                        valence += scalar * damp;
                    }
                }
                if self.is_negation(prev) {
                    valence *= N_SCALAR;
                }
            }

            sentiments.push(valence);
        }

        if let Some(pivot) = lower.iter().position(|w| w == "but") {
            for (i, s) in sentiments.iter_mut().enumerate() {
                if i < pivot {
                    *s *= 0.5;
                } else if i > pivot {
                    *s *= 1.5;
                }
            }
        }

        let punct = punctuation_emphasis(text);
        let mut sum: f64 = sentiments.iter().sum();
        if sum > 0.0 {
            sum += punct;
        } else if sum < 0.0 {
            sum -= punct;
        }
        let compound = normalize(sum);

        let (mut pos_sum, mut neg_sum, mut neu_count) = (0.0f64, 0.0f64, 0usize);
        for &s in &sentiments {
            if s > 0.0 {
                pos_sum += s + 1.0;
            } else if s < 0.0 {
                neg_sum += s - 1.0;
            } else {
                neu_count += 1;
            }
        }
        if pos_sum > neg_sum.abs() {
            pos_sum += punct;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= punct;
        }
        let total = pos_sum + neg_sum.abs() + neu_count as f64;
        if total <= 0.0 {
            return PolarityScores {
                compound,
                ..PolarityScores::default()
            };
        }

        PolarityScores {
            compound,
            positive: (pos_sum / total).abs(),
            negative: (neg_sum / total).abs(),
            neutral: neu_count as f64 / total,
        }
    }

    /// Score `text` and normalize the outcome. Infallible.
    pub fn analyze(&self, text: &str) -> EmotionResult {
        let scores = self.polarity_scores(text);
        let compound = (scores.compound * 10_000.0).round() / 10_000.0;
        let category = Self::categorize(compound);

        let summary = ScoreSummary {
            compound: round3(compound),
            positive: round3(scores.positive),
            negative: round3(scores.negative),
            neutral: round3(scores.neutral),
        };
        let mut raw = BTreeMap::new();
        raw.insert("compound".to_string(), json!(summary.compound));
        raw.insert("positive".to_string(), json!(summary.positive));
        raw.insert("negative".to_string(), json!(summary.negative));
        raw.insert("neutral".to_string(), json!(summary.neutral));

        EmotionResult::new(EmotionEngine::Vader, category, compound.abs(), summary, raw)
    }

    fn booster_scalar(
        &self,
        lower: &str,
        original: &str,
        valence: f64,
        cap_differential: bool,
    ) -> Option<f64> {
        let mut scalar = *self.boosters.get(lower)?;
        if valence < 0.0 {
            scalar = -scalar;
        }
        if cap_differential && is_all_caps(original) {
            scalar += C_INCR.copysign(valence);
        }
        Some(scalar)
    }

    fn is_negation(&self, lower: &str) -> bool {
        if lower.contains("n't") {
            return true;
        }
        let squashed: String = lower.chars().filter(|c| *c != '\'').collect();
        self.negations.contains(squashed.as_str())
    }
}

#[async_trait]
impl EmotionAdapter for LexiconAdapter {
    fn engine(&self) -> EmotionEngine {
        EmotionEngine::Vader
    }

    async fn classify(&self, text: &str) -> Result<EmotionResult, ClassifyError> {
        Ok(self.analyze(text))
    }
}

/// Whitespace tokens with surrounding punctuation stripped; one-character
/// tokens carry no sentiment and are dropped.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|w| w.chars().count() > 1)
        .collect()
}

fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * EXCLAMATION_INCR;
    let questions = match text.matches('?').count() {
        0 | 1 => 0.0,
        n @ 2..=3 => n as f64 * QUESTION_INCR,
        _ => QUESTION_MAX,
    };
    exclamations + questions
}

fn normalize(sum: f64) -> f64 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}
