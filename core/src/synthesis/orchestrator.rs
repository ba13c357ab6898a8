//! Ordered synthesis fallback.
//!
//! Attempt order: configured primary, configured fallback (when distinct),
//! then every other provider in [`ProviderId::FALLBACK_ORDER`]. Providers the
//! registry marks unavailable, or that report themselves unsupported on this
//! platform, are skipped without an attempt.
//!
//! Every attempt writes into its own hidden temporary file next to the
//! target. Only a non-empty result is renamed into place, so a failed or
//! timed-out attempt never leaves audio behind for a later one.

use super::error::ProviderError;
use super::traits::SynthesisProvider;
use super::{AudioFormat, ProviderId};
use crate::config::EngineConfig;
use crate::emotion::EmotionCategory;
use crate::registry::ProviderRegistry;
use crate::voice::{VoiceMapper, VoiceSettings};
use crate::{EmpathyError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// One utterance to voice
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub category: EmotionCategory,
    /// Requested output file name; the extension may be replaced
    pub filename: String,
}

/// A finished audio file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioArtifact {
    /// Public reference (URL path) to the file
    pub audio_ref: String,
    pub path: PathBuf,
    pub provider: ProviderId,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub primary: ProviderId,
    pub fallback: ProviderId,
    pub output_dir: PathBuf,
    pub url_prefix: String,
    pub attempt_timeout: Duration,
}

impl OrchestratorSettings {
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self {
            primary: cfg.tts_engine,
            fallback: cfg.fallback_tts,
            output_dir: cfg.output_dir.clone(),
            url_prefix: cfg.url_prefix.clone(),
            attempt_timeout: Duration::from_millis(cfg.tts_timeout_ms),
        }
    }
}

/// Keep `.mp3`, `.wav` and `.m4a` names as they are; anything else gets its
/// last extension swapped for `.mp3`. Directory components are dropped.
pub fn normalize_filename(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("output");
    let supported = Path::new(base)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(AudioFormat::from_extension)
        .is_some();
    if supported {
        return base.to_string();
    }
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    };
    format!("{}.{}", stem, AudioFormat::Mp3.extension())
}

pub struct SynthesisOrchestrator {
    settings: OrchestratorSettings,
    registry: Arc<ProviderRegistry>,
    voices: Arc<VoiceMapper>,
    providers: BTreeMap<ProviderId, Arc<dyn SynthesisProvider>>,
}

impl SynthesisOrchestrator {
    pub fn new(
        settings: OrchestratorSettings,
        registry: Arc<ProviderRegistry>,
        voices: Arc<VoiceMapper>,
        providers: Vec<Arc<dyn SynthesisProvider>>,
    ) -> Self {
        let providers = providers.into_iter().map(|p| (p.id(), p)).collect();
        Self {
            settings,
            registry,
            voices,
            providers,
        }
    }

    /// Providers that would be attempted, in order.
    pub fn plan(&self) -> Vec<ProviderId> {
        let mut order = vec![self.settings.primary];
        if self.settings.fallback != self.settings.primary {
            order.push(self.settings.fallback);
        }
        for p in ProviderId::FALLBACK_ORDER {
            if !order.contains(&p) {
                order.push(p);
            }
        }
        order.into_iter().filter(|p| self.is_usable(*p)).collect()
    }

    fn is_usable(&self, id: ProviderId) -> bool {
        self.registry.is_available(id)
            && self
                .providers
                .get(&id)
                .is_some_and(|p| p.is_supported())
    }

    /// Voice `req.text` with the first provider that succeeds.
    #[tracing::instrument(skip(self, req), fields(emotion = %req.category))]
    pub async fn synthesize(&self, req: &SynthesisRequest) -> Result<AudioArtifact> {
        let plan = self.plan();
        if plan.is_empty() {
            warn!(target = "synthesis", "No TTS provider available");
            return Err(EmpathyError::Exhausted("none available".to_string()));
        }

        let filename = normalize_filename(&req.filename);
        let stem = Path::new(&filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output")
            .to_string();
        tokio::fs::create_dir_all(&self.settings.output_dir).await?;

        let mut tried = Vec::with_capacity(plan.len());
        for id in plan {
            let Some(provider) = self.providers.get(&id) else {
                continue;
            };
            let voice = self.voices.resolve(req.category, id);
            let file = format!("{}.{}", stem, id.container().extension());
            let target = self.settings.output_dir.join(&file);
            tried.push(id.as_str());

            match self.attempt(provider.as_ref(), &req.text, &voice, &target).await {
                Ok(bytes) => {
                    info!(
                        target = "synthesis",
                        provider = %id,
                        emotion = %req.category,
                        profile = ?voice.profile,
                        bytes,
                        "Synthesized"
                    );
                    return Ok(AudioArtifact {
                        audio_ref: format!(
                            "{}/{}",
                            self.settings.url_prefix.trim_end_matches('/'),
                            file
                        ),
                        path: target,
                        provider: id,
                        bytes,
                    });
                }
                Err(e) => {
                    warn!(
                        target = "synthesis",
                        provider = %id,
                        error = %e,
                        "TTS attempt failed; trying next provider"
                    );
                }
            }
        }

        Err(EmpathyError::Exhausted(tried.join(", ")))
    }

    async fn attempt(
        &self,
        provider: &dyn SynthesisProvider,
        text: &str,
        voice: &VoiceSettings,
        target: &Path,
    ) -> std::result::Result<u64, ProviderError> {
        let suffix = target
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let partial = tempfile::Builder::new()
            .prefix(".partial-")
            .suffix(&suffix)
            .tempfile_in(&self.settings.output_dir)?;
        debug!(
            target = "synthesis",
            provider = %provider.id(),
            path = %partial.path().display(),
            "attempt"
        );

        let limit = self.settings.attempt_timeout;
        match timeout(limit, provider.attempt(text, voice, partial.path())).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(ProviderError::Timeout(limit.as_millis() as u64)),
        }

        let bytes = tokio::fs::metadata(partial.path()).await?.len();
        if bytes == 0 {
            return Err(ProviderError::EmptyOutput);
        }
        partial.persist(target).map_err(|e| ProviderError::Io(e.error))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::traits::MockSynthesisProvider;
    use async_trait::async_trait;

    fn mock(id: ProviderId) -> MockSynthesisProvider {
        let mut m = MockSynthesisProvider::new();
        m.expect_id().return_const(id);
        m.expect_is_supported().return_const(true);
        m
    }

    fn settings(dir: &Path, primary: ProviderId, fallback: ProviderId) -> OrchestratorSettings {
        OrchestratorSettings {
            primary,
            fallback,
            output_dir: dir.to_path_buf(),
            url_prefix: "/static/audio".to_string(),
            attempt_timeout: Duration::from_millis(200),
        }
    }

    fn all_available() -> Arc<ProviderRegistry> {
        Arc::new(ProviderRegistry::with_availability(
            [],
            ProviderId::ALL.iter().map(|&p| (p, true)),
        ))
    }

    fn request(name: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: "hello there".to_string(),
            category: EmotionCategory::Positive,
            filename: name.to_string(),
        }
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with(".partial-"))
            .collect()
    }

    #[test]
    fn test_normalize_filename() {
        assert_eq!(normalize_filename("out.mp3"), "out.mp3");
        assert_eq!(normalize_filename("out.WAV"), "out.WAV");
        assert_eq!(normalize_filename("out.m4a"), "out.m4a");
        assert_eq!(normalize_filename("out.ogg"), "out.mp3");
        assert_eq!(normalize_filename("out"), "out.mp3");
        assert_eq!(normalize_filename("a.b.txt"), "a.b.mp3");
        assert_eq!(normalize_filename("../../etc/passwd"), "passwd.mp3");
        assert_eq!(normalize_filename(""), "output.mp3");
    }

    #[test]
    fn test_plan_order() {
        let dir = tempfile::tempdir().unwrap();
        let providers: Vec<Arc<dyn SynthesisProvider>> = ProviderId::ALL
            .iter()
            .map(|&id| Arc::new(mock(id)) as Arc<dyn SynthesisProvider>)
            .collect();
        let orch = SynthesisOrchestrator::new(
            settings(dir.path(), ProviderId::GoogleCloud, ProviderId::Espeak),
            all_available(),
            Arc::new(VoiceMapper::builtin()),
            providers,
        );
        assert_eq!(
            orch.plan(),
            vec![
                ProviderId::GoogleCloud,
                ProviderId::Espeak,
                ProviderId::Gtts,
                ProviderId::MacosSay
            ]
        );
    }

    #[test]
    fn test_plan_skips_unavailable_and_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let mut say = MockSynthesisProvider::new();
        say.expect_id().return_const(ProviderId::MacosSay);
        say.expect_is_supported().return_const(false);
        let providers: Vec<Arc<dyn SynthesisProvider>> = vec![
            Arc::new(mock(ProviderId::Gtts)),
            Arc::new(mock(ProviderId::Espeak)),
            Arc::new(say),
        ];
        let registry = Arc::new(ProviderRegistry::with_availability(
            [],
            [
                (ProviderId::Gtts, false),
                (ProviderId::Espeak, true),
                (ProviderId::MacosSay, true),
            ],
        ));
        let orch = SynthesisOrchestrator::new(
            settings(dir.path(), ProviderId::Gtts, ProviderId::Gtts),
            registry,
            Arc::new(VoiceMapper::builtin()),
            providers,
        );
        assert_eq!(orch.plan(), vec![ProviderId::Espeak]);
    }

    #[tokio::test]
    async fn test_primary_success_stops_chain() {
        let dir = tempfile::tempdir().unwrap();
        let mut primary = mock(ProviderId::Gtts);
        primary
            .expect_attempt()
            .times(1)
            .returning(|_, voice, out| {
                assert!(matches!(
                    voice.profile,
                    crate::voice::VoiceProfile::Network { .. }
                ));
                std::fs::write(out, b"ID3 audio")?;
                Ok(())
            });
        let mut fallback = mock(ProviderId::Espeak);
        fallback.expect_attempt().times(0);

        let orch = SynthesisOrchestrator::new(
            settings(dir.path(), ProviderId::Gtts, ProviderId::Espeak),
            all_available(),
            Arc::new(VoiceMapper::builtin()),
            vec![Arc::new(primary), Arc::new(fallback)],
        );
        let art = orch.synthesize(&request("output_1.mp3")).await.unwrap();
        assert_eq!(art.provider, ProviderId::Gtts);
        assert_eq!(art.audio_ref, "/static/audio/output_1.mp3");
        assert_eq!(std::fs::read(&art.path).unwrap(), b"ID3 audio");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_failed_attempt_leaves_no_residue() {
        let dir = tempfile::tempdir().unwrap();
        let mut primary = mock(ProviderId::Gtts);
        primary.expect_attempt().times(1).returning(|_, _, out| {
            std::fs::write(out, b"half-written garbage")?;
            Err(ProviderError::CallFailed("connection reset".into()))
        });
        let mut fallback = mock(ProviderId::GoogleCloud);
        fallback.expect_attempt().times(1).returning(|_, _, out| {
            std::fs::write(out, b"good")?;
            Ok(())
        });

        let orch = SynthesisOrchestrator::new(
            settings(dir.path(), ProviderId::Gtts, ProviderId::GoogleCloud),
            all_available(),
            Arc::new(VoiceMapper::builtin()),
            vec![Arc::new(primary), Arc::new(fallback)],
        );
        let art = orch.synthesize(&request("clip")).await.unwrap();
        assert_eq!(art.provider, ProviderId::GoogleCloud);
        assert_eq!(std::fs::read(&art.path).unwrap(), b"good");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_empty_output_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut primary = mock(ProviderId::Espeak);
        primary.expect_attempt().times(1).returning(|_, _, _| Ok(()));
        let orch = SynthesisOrchestrator::new(
            settings(dir.path(), ProviderId::Espeak, ProviderId::Espeak),
            all_available(),
            Arc::new(VoiceMapper::builtin()),
            vec![Arc::new(primary)],
        );
        match orch.synthesize(&request("x.wav")).await {
            Err(EmpathyError::Exhausted(tried)) => assert_eq!(tried, "espeak"),
            other => panic!("expected exhaustion, got {:?}", other),
        }
        assert!(!dir.path().join("x.wav").exists());
        assert!(leftovers(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_nothing_available_is_exhaustion() {
        let dir = tempfile::tempdir().unwrap();
        let mut primary = mock(ProviderId::Gtts);
        primary.expect_attempt().times(0);
        let orch = SynthesisOrchestrator::new(
            settings(&dir.path().join("audio"), ProviderId::Gtts, ProviderId::Espeak),
            Arc::new(ProviderRegistry::with_availability([], [])),
            Arc::new(VoiceMapper::builtin()),
            vec![Arc::new(primary)],
        );
        for _ in 0..3 {
            assert!(matches!(
                orch.synthesize(&request("a.mp3")).await,
                Err(EmpathyError::Exhausted(_))
            ));
        }
        assert!(!dir.path().join("audio").exists());
    }

    #[tokio::test]
    async fn test_unavailable_primary_goes_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut primary = mock(ProviderId::Gtts);
        primary.expect_attempt().times(0);
        let mut fallback = mock(ProviderId::Espeak);
        fallback.expect_attempt().times(1).returning(|_, voice, out| {
            assert!(matches!(
                voice.profile,
                crate::voice::VoiceProfile::Offline { rate: 180, .. }
            ));
            std::fs::write(out, b"RIFF")?;
            Ok(())
        });
        let registry = Arc::new(ProviderRegistry::with_availability(
            [],
            [(ProviderId::Gtts, false), (ProviderId::Espeak, true)],
        ));
        let orch = SynthesisOrchestrator::new(
            settings(dir.path(), ProviderId::Gtts, ProviderId::Espeak),
            registry,
            Arc::new(VoiceMapper::builtin()),
            vec![Arc::new(primary), Arc::new(fallback)],
        );
        let art = orch.synthesize(&request("output_2.mp3")).await.unwrap();
        assert_eq!(art.provider, ProviderId::Espeak);
        assert_eq!(art.audio_ref, "/static/audio/output_2.wav");
    }

    struct Stalled;

    #[async_trait]
    impl SynthesisProvider for Stalled {
        fn id(&self) -> ProviderId {
            ProviderId::Gtts
        }

        async fn attempt(
            &self,
            _text: &str,
            _voice: &VoiceSettings,
            out: &Path,
        ) -> std::result::Result<(), ProviderError> {
            tokio::fs::write(out, b"partial").await?;
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_timeout_triggers_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut fallback = mock(ProviderId::Espeak);
        fallback.expect_attempt().times(1).returning(|_, _, out| {
            std::fs::write(out, b"RIFF")?;
            Ok(())
        });
        let orch = SynthesisOrchestrator::new(
            settings(dir.path(), ProviderId::Gtts, ProviderId::Espeak),
            all_available(),
            Arc::new(VoiceMapper::builtin()),
            vec![Arc::new(Stalled), Arc::new(fallback)],
        );
        let art = orch.synthesize(&request("slow.mp3")).await.unwrap();
        assert_eq!(art.provider, ProviderId::Espeak);
        assert!(!dir.path().join("slow.mp3").exists());
        assert!(leftovers(dir.path()).is_empty());
    }
}
