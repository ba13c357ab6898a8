//! Pretrained text-classification adapter.
//!
//! Posts the text to an inference endpoint serving an emotion classification
//! model (Hugging Face Inference API compatible: `{"inputs": text}` in,
//! `[[{"label", "score"}, ...]]` out) and maps the top label onto the
//! category scale. No retries: a failed call is reported and the aggregator
//! moves on.

use super::{
    round3, ClassifyError, EmotionAdapter, EmotionCategory, EmotionEngine, EmotionResult,
    ScoreSummary,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Inference endpoint settings
#[derive(Debug, Clone, Default)]
pub struct ClassifierConfig {
    /// Full model URL, e.g.
    /// `https://api-inference.huggingface.co/models/j-hartmann/emotion-english-distilroberta-base`
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_ms: u64,
}

/// One label/score pair as returned by the endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

// The endpoint nests predictions one level deeper when batching.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifierResponse {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

/// Closed label set of the emotion model; anything else is `Neutral`.
pub fn map_label(label: &str) -> EmotionCategory {
    match label.trim().to_ascii_lowercase().as_str() {
        "joy" => EmotionCategory::VeryPositive,
        "surprise" => EmotionCategory::Positive,
        "neutral" => EmotionCategory::Neutral,
        "sadness" => EmotionCategory::Negative,
        "disgust" => EmotionCategory::Negative,
        "anger" => EmotionCategory::VeryNegative,
        "fear" => EmotionCategory::VeryNegative,
        _ => EmotionCategory::Neutral,
    }
}

/// Extract all predictions from a raw response body.
pub fn parse_predictions(body: &str) -> Result<Vec<LabelScore>, ClassifyError> {
    let parsed: ClassifierResponse = serde_json::from_str(body)
        .map_err(|e| ClassifyError::MalformedResponse(e.to_string()))?;
    let predictions = match parsed {
        ClassifierResponse::Batched(mut batches) => {
            if batches.is_empty() {
                Vec::new()
            } else {
                batches.swap_remove(0)
            }
        }
        ClassifierResponse::Flat(p) => p,
    };
    if predictions.is_empty() {
        return Err(ClassifyError::MalformedResponse(
            "no predictions in response".to_string(),
        ));
    }
    Ok(predictions)
}

/// Build the normalized result from the model's predictions.
pub fn result_from_predictions(predictions: Vec<LabelScore>) -> Option<EmotionResult> {
    let top = predictions
        .iter()
        .filter(|p| p.score.is_finite())
        .max_by(|a, b| a.score.total_cmp(&b.score))?
        .clone();
    let category = map_label(&top.label);
    let confidence = round3(top.score.clamp(0.0, 1.0));
    let signed = if category.is_negative() {
        -confidence
    } else {
        confidence
    };

    let mut raw = BTreeMap::new();
    raw.insert("raw_emotion".to_string(), json!(top.label));
    raw.insert("all_scores".to_string(), json!(predictions));

    Some(EmotionResult::new(
        EmotionEngine::HuggingFace,
        category,
        confidence,
        ScoreSummary {
            compound: signed,
            ..ScoreSummary::default()
        },
        raw,
    ))
}

pub struct ClassifierAdapter {
    http: Client,
    cfg: ClassifierConfig,
}

impl ClassifierAdapter {
    pub fn new(cfg: ClassifierConfig) -> Result<Self, ClassifyError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms.max(1)))
            .build()
            .map_err(|e| ClassifyError::Unavailable(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, cfg })
    }
}

#[async_trait]
impl EmotionAdapter for ClassifierAdapter {
    fn engine(&self) -> EmotionEngine {
        EmotionEngine::HuggingFace
    }

    async fn classify(&self, text: &str) -> Result<EmotionResult, ClassifyError> {
        let url = self
            .cfg
            .api_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ClassifyError::Unavailable("no classifier endpoint".to_string()))?;

        debug!(target = "emotion", url = %url, "POST classifier");
        let mut req = self.http.post(url).json(&json!({ "inputs": text }));
        if let Some(token) = &self.cfg.api_token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ClassifyError::CallFailed(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ClassifyError::CallFailed(e.to_string()))?;
        if !status.is_success() {
            return Err(ClassifyError::CallFailed(format!("HTTP {}: {}", status, body)));
        }

        let predictions = parse_predictions(&body)?;
        result_from_predictions(predictions).ok_or_else(|| {
            ClassifyError::MalformedResponse("no finite prediction scores".to_string())
        })
    }
}
