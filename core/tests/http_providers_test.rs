use base64::Engine as _;
use empathy_core::emotion::{ClassifierAdapter, ClassifierConfig, ClassifyError};
use empathy_core::synthesis::{
    CloudSynthesis, GoogleCloudConfig, NetworkSynthesis, NetworkTtsConfig,
};
use empathy_core::{
    EmotionAdapter, EmotionCategory, EmotionEngine, ProviderError, ProviderId, SynthesisProvider,
    VoiceMapper,
};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Seen = Arc<Mutex<Vec<String>>>;

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|l| {
            let (k, v) = l.split_once(':')?;
            k.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| v.trim().parse().ok())
                .flatten()
        })
        .unwrap_or(0)
}

// Minimal one-shot-per-connection HTTP/1.1 responder
async fn serve(status: u16, content_type: &'static str, body: Vec<u8>) -> (String, Seen) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    tokio::spawn(async move {
        while let Ok((mut sock, _)) = listener.accept().await {
            let body = body.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut tmp = [0u8; 4096];
                let header_end = loop {
                    let n = sock.read(&mut tmp).await.unwrap_or(0);
                    if n == 0 {
                        return;
                    }
                    buf.extend_from_slice(&tmp[..n]);
                    if let Some(pos) = find_header_end(&buf) {
                        break pos;
                    }
                };
                let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
                let want = header_end + 4 + content_length(&head);
                while buf.len() < want {
                    let n = sock.read(&mut tmp).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&tmp[..n]);
                }
                log.lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&buf).to_string());

                let reply = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    content_type,
                    body.len()
                );
                let _ = sock.write_all(reply.as_bytes()).await;
                let _ = sock.write_all(&body).await;
                let _ = sock.shutdown().await;
            });
        }
    });

    (format!("http://{}", addr), seen)
}

fn classifier(url: String) -> ClassifierAdapter {
    ClassifierAdapter::new(ClassifierConfig {
        api_url: Some(url),
        api_token: Some("hf_test".to_string()),
        timeout_ms: 5_000,
    })
    .unwrap()
}

#[tokio::test]
async fn test_classifier_picks_top_label() {
    let body = br#"[[{"label":"sadness","score":0.82},{"label":"joy","score":0.11}]]"#.to_vec();
    let (base, seen) = serve(200, "application/json", body).await;
    let adapter = classifier(format!("{}/models/emotion", base));

    let result = adapter.classify("my dog ran away").await.unwrap();
    assert_eq!(result.engine(), EmotionEngine::HuggingFace);
    assert_eq!(result.category(), EmotionCategory::Negative);
    assert!((result.confidence() - 0.82).abs() < 1e-9);
    assert!(result.summary().compound < 0.0);
    assert_eq!(result.raw_scores()["raw_emotion"], "sadness");

    let seen = seen.lock().unwrap();
    let request = seen[0].to_ascii_lowercase();
    assert!(request.starts_with("post /models/emotion"));
    assert!(request.contains("authorization: bearer hf_test"));
    assert!(request.contains(r#""inputs":"my dog ran away""#));
}

#[tokio::test]
async fn test_classifier_http_error_is_failure() {
    let (base, _) = serve(503, "text/plain", b"loading".to_vec()).await;
    let err = classifier(base).classify("anything").await.unwrap_err();
    assert!(matches!(err, ClassifyError::CallFailed(_)));
}

#[tokio::test]
async fn test_classifier_garbage_is_failure() {
    let (base, _) = serve(200, "application/json", b"{\"error\":1}".to_vec()).await;
    let err = classifier(base).classify("anything").await.unwrap_err();
    assert!(matches!(err, ClassifyError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_network_synthesis_chunks_and_concatenates() {
    let (base, seen) = serve(200, "audio/mpeg", b"ID3".to_vec()).await;
    let provider = NetworkSynthesis::new(NetworkTtsConfig {
        enabled: true,
        endpoint: format!("{}/{{tld}}/translate_tts", base),
        lang: "en".to_string(),
        timeout_ms: 5_000,
    })
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("clip.mp3");
    let voice = VoiceMapper::builtin().resolve(EmotionCategory::VeryPositive, ProviderId::Gtts);
    let text = "word ".repeat(50);
    provider.attempt(&text, &voice, &out).await.unwrap();

    assert_eq!(std::fs::read(&out).unwrap(), b"ID3ID3ID3");
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen[0].starts_with("GET /com.au/translate_tts?"));
    assert!(seen[0].contains("client=tw-ob"));
    assert!(seen[0].contains("total=3"));
}

#[tokio::test]
async fn test_network_synthesis_rejects_wrong_profile() {
    let provider = NetworkSynthesis::new(NetworkTtsConfig::default()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let voice = VoiceMapper::builtin().resolve(EmotionCategory::Neutral, ProviderId::Espeak);
    let err = provider
        .attempt("hi", &voice, &dir.path().join("x.mp3"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::ProfileMismatch(ProviderId::Gtts)));
}

#[tokio::test]
async fn test_network_synthesis_server_error() {
    let (base, _) = serve(500, "text/plain", b"nope".to_vec()).await;
    let provider = NetworkSynthesis::new(NetworkTtsConfig {
        endpoint: format!("{}/tts", base),
        ..NetworkTtsConfig::default()
    })
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let voice = VoiceMapper::builtin().resolve(EmotionCategory::Neutral, ProviderId::Gtts);
    let err = provider
        .attempt("hello", &voice, &dir.path().join("x.mp3"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::CallFailed(_)));
}

#[tokio::test]
async fn test_cloud_synthesis_decodes_audio() {
    let payload = base64::engine::general_purpose::STANDARD.encode(b"FAKEMP3");
    let body = format!(r#"{{"audioContent":"{}"}}"#, payload).into_bytes();
    let (base, seen) = serve(200, "application/json", body).await;
    let provider = CloudSynthesis::new(GoogleCloudConfig {
        api_key: Some("k-test".to_string()),
        endpoint: format!("{}/v1/text:synthesize", base),
        ..GoogleCloudConfig::default()
    })
    .unwrap();
    assert!(provider.is_supported());

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("cloud.mp3");
    let voice =
        VoiceMapper::builtin().resolve(EmotionCategory::VeryPositive, ProviderId::GoogleCloud);
    provider.attempt("great news", &voice, &out).await.unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), b"FAKEMP3");

    let seen = seen.lock().unwrap();
    let request = seen[0].to_ascii_lowercase();
    assert!(request.contains("x-goog-api-key: k-test"));
    assert!(seen[0].contains(r#""name":"en-US-Wavenet-H""#));
    assert!(seen[0].contains(r#""speakingRate":1.2"#));
}

#[test]
fn test_cloud_without_key_is_unsupported() {
    let provider = CloudSynthesis::new(GoogleCloudConfig::default()).unwrap();
    assert!(!provider.is_supported());
}
