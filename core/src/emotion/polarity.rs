//! Polarity/subjectivity scorer.
//!
//! Averages per-word (polarity, subjectivity) assessments over the sentiment
//! words found in the text. An intensifier scales the assessment of the word
//! that follows it; a negation within the two preceding words flips and halves
//! polarity. Subjectivity is reported for diagnostics only.

use super::{
    round3, ClassifyError, EmotionAdapter, EmotionCategory, EmotionEngine, EmotionResult,
    ScoreBands, ScoreSummary,
};
use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};

/// Polarity bands for this scorer; narrower than the lexicon scorer's.
pub const POLARITY_BANDS: ScoreBands = ScoreBands {
    strong: 0.5,
    moderate: 0.1,
    slight: 0.05,
};

const NEGATION_FACTOR: f64 = -0.5;

// (word, polarity, subjectivity)
const ASSESSMENTS: &[(&str, f64, f64)] = &[
    ("amazing", 0.6, 0.9),
    ("angry", -0.5, 1.0),
    ("annoying", -0.8, 0.9),
    ("awesome", 1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.667),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("boring", -1.0, 1.0),
    ("brilliant", 0.9, 1.0),
    ("calm", 0.3, 0.75),
    ("cheerful", 0.8, 0.8),
    ("cool", 0.35, 0.65),
    ("cruel", -1.0, 1.0),
    ("delighted", 0.7, 0.8),
    ("depressed", -0.4, 0.6),
    ("disappointed", -0.75, 0.75),
    ("disgusting", -1.0, 1.0),
    ("dull", -0.3, 0.5),
    ("excellent", 1.0, 1.0),
    ("excited", 0.375, 0.75),
    ("fantastic", 0.4, 0.9),
    ("fine", 0.417, 0.5),
    ("fun", 0.3, 0.2),
    ("funny", 0.25, 1.0),
    ("glad", 0.5, 1.0),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("hate", -0.8, 0.9),
    ("horrible", -1.0, 1.0),
    ("interesting", 0.5, 0.5),
    ("lonely", -0.1, 0.4),
    ("love", 0.5, 0.6),
    ("lovely", 0.5, 0.75),
    ("mad", -0.625, 1.0),
    ("miserable", -1.0, 1.0),
    ("nice", 0.6, 1.0),
    ("okay", 0.5, 0.5),
    ("perfect", 1.0, 1.0),
    ("pleasant", 0.733, 0.967),
    ("poor", -0.4, 0.6),
    ("pretty", 0.25, 1.0),
    ("sad", -0.5, 1.0),
    ("scared", -0.5, 1.0),
    ("sick", -0.714, 0.857),
    ("stupid", -0.8, 1.0),
    ("terrible", -1.0, 1.0),
    ("thrilled", 0.8, 0.9),
    ("tired", -0.4, 0.7),
    ("ugly", -0.7, 1.0),
    ("unhappy", -0.6, 0.9),
    ("upset", -0.3, 0.6),
    ("useless", -0.5, 0.0),
    ("wonderful", 1.0, 1.0),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.5),
    ("extremely", 1.5),
    ("incredibly", 1.3),
    ("pretty", 1.1),
    ("quite", 1.1),
    ("rather", 1.1),
    ("really", 1.3),
    ("so", 1.3),
    ("too", 1.3),
    ("totally", 1.4),
    ("very", 1.3),
    ("slightly", 0.5),
    ("somewhat", 0.6),
];

const NEGATIONS: &[&str] = &["not", "never", "no", "nothing", "hardly", "without"];

/// Raw scorer output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sentiment {
    pub polarity: f64,
    pub subjectivity: f64,
}

pub struct PolarityAdapter {
    assessments: HashMap<&'static str, (f64, f64)>,
    intensifiers: HashMap<&'static str, f64>,
    enabled: bool,
}

impl PolarityAdapter {
    pub fn new(enabled: bool) -> Self {
        Self {
            assessments: ASSESSMENTS.iter().map(|&(w, p, s)| (w, (p, s))).collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            enabled,
        }
    }

    pub fn categorize(polarity: f64) -> EmotionCategory {
        EmotionCategory::from_score(polarity, &POLARITY_BANDS)
    }

    pub fn sentiment(&self, text: &str) -> Sentiment {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| c.is_ascii_punctuation())
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();

        let mut assessed: Vec<(f64, f64)> = Vec::new();
        for (i, word) in words.iter().enumerate() {
            // "pretty good": the first word modifies, it is not itself assessed
            if self.intensifiers.contains_key(word.as_str())
                && words
                    .get(i + 1)
                    .is_some_and(|next| self.assessments.contains_key(next.as_str()))
            {
                continue;
            }
            let Some(&(mut polarity, mut subjectivity)) = self.assessments.get(word.as_str())
            else {
                continue;
            };
            if let Some(&factor) = i
                .checked_sub(1)
                .and_then(|p| self.intensifiers.get(words[p].as_str()))
            {
                polarity = (polarity * factor).clamp(-1.0, 1.0);
                subjectivity = (subjectivity * factor).clamp(0.0, 1.0);
            }
            let negated = (1..=2).any(|d| {
                i.checked_sub(d)
                    .is_some_and(|p| is_negation(words[p].as_str()))
            });
            if negated {
                polarity *= NEGATION_FACTOR;
            }
            assessed.push((polarity, subjectivity));
        }

        if assessed.is_empty() {
            return Sentiment::default();
        }
        let n = assessed.len() as f64;
        Sentiment {
            polarity: (assessed.iter().map(|a| a.0).sum::<f64>() / n).clamp(-1.0, 1.0),
            subjectivity: (assessed.iter().map(|a| a.1).sum::<f64>() / n).clamp(0.0, 1.0),
        }
    }

    pub fn analyze(&self, text: &str) -> EmotionResult {
        let s = self.sentiment(text);
        let category = Self::categorize(s.polarity);
        let summary = ScoreSummary {
            compound: round3(s.polarity),
            ..ScoreSummary::default()
        };
        let mut raw = BTreeMap::new();
        raw.insert("polarity".to_string(), json!(round3(s.polarity)));
        raw.insert("subjectivity".to_string(), json!(round3(s.subjectivity)));
        EmotionResult::new(EmotionEngine::TextBlob, category, s.polarity.abs(), summary, raw)
    }
}

fn is_negation(word: &str) -> bool {
    word.ends_with("n't") || NEGATIONS.contains(&word)
}

#[async_trait]
impl EmotionAdapter for PolarityAdapter {
    fn engine(&self) -> EmotionEngine {
        EmotionEngine::TextBlob
    }

    async fn classify(&self, text: &str) -> Result<EmotionResult, ClassifyError> {
        if !self.enabled {
            return Err(ClassifyError::Unavailable(
                "polarity scorer disabled".to_string(),
            ));
        }
        Ok(self.analyze(text))
    }
}
