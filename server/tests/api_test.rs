use async_trait::async_trait;
use empathy_core::{
    EmpathyEngine, EngineConfig, ProviderError, ProviderId, ProviderRegistry, SynthesisProvider,
    VoiceMapper, VoiceSettings,
};
use reqwest::StatusCode;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

struct StubProvider {
    id: ProviderId,
    ok: bool,
}

#[async_trait]
impl SynthesisProvider for StubProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn attempt(
        &self,
        _text: &str,
        _voice: &VoiceSettings,
        out: &Path,
    ) -> Result<(), ProviderError> {
        if !self.ok {
            return Err(ProviderError::CallFailed("stub down".into()));
        }
        tokio::fs::write(out, b"ID3stub").await?;
        Ok(())
    }
}

/// Serve the router on an ephemeral port and return its base url.
async fn spawn_app(dir: &Path, ok: bool) -> String {
    let mut cfg = EngineConfig::default();
    cfg.output_dir = dir.to_path_buf();
    let registry = Arc::new(ProviderRegistry::with_availability(
        [],
        [(ProviderId::Gtts, true)],
    ));
    let engine = EmpathyEngine::assemble(
        cfg,
        registry,
        VoiceMapper::builtin(),
        vec![],
        vec![Arc::new(StubProvider {
            id: ProviderId::Gtts,
            ok,
        })],
    );
    let app = empathy_server::router(Arc::new(engine));

    let listener = empathy_server::bind("127.0.0.1", Some(0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn post_body(base: &str, body: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/synthesize", base))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_synthesize_success() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(dir.path(), true).await;
    let resp = post_body(&base, r#"{"text": "I absolutely love this!"}"#).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["emotion"], "Very Positive");
    assert_eq!(json["engineUsed"], "vader");
    assert_eq!(json["ttsProviderUsed"], "gtts");
    assert!(json["emotionScores"]["compound"].as_f64().unwrap() >= 0.6);
    assert!(json["emotionScores"]["intensity"].is_number());
    assert!(json["allAnalyses"]["vader"].is_object());
    let audio = json["audioRef"].as_str().unwrap();
    assert!(audio.starts_with("/static/audio/output_"));
}

#[tokio::test]
async fn test_generated_audio_is_served() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(dir.path(), true).await;
    let json: Value = post_body(&base, r#"{"text": "hello"}"#)
        .await
        .json()
        .await
        .unwrap();
    let audio = json["audioRef"].as_str().unwrap();

    let resp = reqwest::get(format!("{}{}", base, audio)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.bytes().await.unwrap();
    assert_eq!(&bytes[..], b"ID3stub");
}

#[tokio::test]
async fn test_missing_text_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(dir.path(), true).await;
    for body in [r#"{}"#, r#"{"text": ""}"#, "not json"] {
        let resp = post_body(&base, body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["error"], "No text provided");
    }
}

#[tokio::test]
async fn test_exhausted_is_service_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(dir.path(), false).await;
    let resp = post_body(&base, r#"{"text": "hello"}"#).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = resp.json().await.unwrap();
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to generate audio"));
}

#[tokio::test]
async fn test_config_and_health() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(dir.path(), true).await;

    let resp = reqwest::get(format!("{}/config", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["currentConfig"]["ttsEngine"], "gtts");
    assert_eq!(json["availableEngines"]["tts"]["gtts"], true);
    assert_eq!(json["availableEngines"]["emotion"]["huggingface"], false);

    let json: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["ttsAvailable"], true);
}

#[tokio::test]
async fn test_bind_explicit_port() {
    let listener = empathy_server::bind("127.0.0.1", Some(0)).await.unwrap();
    assert!(listener.local_addr().unwrap().port() > 0);
}
