use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::emotion::classifier::ClassifierConfig;
use crate::emotion::EmotionMode;
use crate::synthesis::{GoogleCloudConfig, NetworkTtsConfig, ProviderId};
use crate::{EmpathyError, Result};

/// Everything the engine needs to wire its providers.
///
/// Built in three layers: compiled defaults, environment variables, then an
/// optional TOML file named by `EMPATHY_CONFIG` (default `./empathy.toml`).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub emotion_mode: EmotionMode,
    pub tts_engine: ProviderId,
    pub fallback_tts: ProviderId,
    /// Longer input is truncated to this many characters
    pub max_text_length: usize,
    pub output_dir: PathBuf,
    pub url_prefix: String,
    /// Upper bound for a single synthesis attempt
    pub tts_timeout_ms: u64,
    pub voice_table_path: Option<PathBuf>,
    pub classifier: ClassifierConfig,
    pub polarity_enabled: bool,
    pub network: NetworkTtsConfig,
    pub espeak_bin: Option<PathBuf>,
    pub say_bin: Option<PathBuf>,
    pub google: GoogleCloudConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            emotion_mode: EmotionMode::Ensemble,
            tts_engine: ProviderId::Gtts,
            fallback_tts: ProviderId::Espeak,
            max_text_length: 1000,
            output_dir: PathBuf::from("static/audio"),
            url_prefix: "/static/audio".to_string(),
            tts_timeout_ms: 30_000,
            voice_table_path: None,
            classifier: ClassifierConfig {
                api_url: None,
                api_token: None,
                timeout_ms: 10_000,
            },
            polarity_enabled: true,
            network: NetworkTtsConfig::default(),
            espeak_bin: None,
            say_bin: None,
            google: GoogleCloudConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Defaults, then environment, then the TOML overlay (if the file exists).
    pub fn load() -> Result<Self> {
        let mut cfg = Self::from_env()?;
        let path = std::env::var("EMPATHY_CONFIG").unwrap_or_else(|_| "empathy.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(
                target = "config",
                path = %path,
                "No TOML config found; using defaults/env"
            );
            return Ok(cfg);
        }
        cfg.apply_file(p)?;
        tracing::info!(target = "config", path = %path, "Loaded TOML config");
        Ok(cfg)
    }

    /// Apply variables from `lookup`. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("EMOTION_ENGINE") {
            self.emotion_mode = parse_named("EMOTION_ENGINE", &v)?;
        }
        if let Some(v) = get("TTS_ENGINE") {
            self.tts_engine = parse_named("TTS_ENGINE", &v)?;
        }
        if let Some(v) = get("FALLBACK_TTS") {
            self.fallback_tts = parse_named("FALLBACK_TTS", &v)?;
        }
        if let Some(v) = get("MAX_TEXT_LENGTH") {
            let n = parse_number("MAX_TEXT_LENGTH", &v)?;
            self.max_text_length = checked_length("MAX_TEXT_LENGTH", n)?;
        }
        if let Some(v) = get("TTS_TIMEOUT_MS") {
            self.set_timeout(parse_number("TTS_TIMEOUT_MS", &v)?);
        }
        if let Some(v) = get("AUDIO_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = get("AUDIO_URL_PREFIX") {
            self.url_prefix = v;
        }
        if let Some(v) = get("VOICE_TABLE_PATH") {
            self.voice_table_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("HF_API_URL") {
            self.classifier.api_url = Some(v);
        }
        if let Some(v) = get("HF_API_TOKEN") {
            self.classifier.api_token = Some(v);
        }
        if let Some(v) = get("TEXTBLOB_ENABLED") {
            self.polarity_enabled = parse_flag("TEXTBLOB_ENABLED", &v)?;
        }
        if let Some(v) = get("ESPEAK_BIN") {
            self.espeak_bin = Some(PathBuf::from(v));
        }
        if let Some(v) = get("SAY_BIN") {
            self.say_bin = Some(PathBuf::from(v));
        }
        if let Some(v) = get("GOOGLE_TTS_API_KEY") {
            self.google.api_key = Some(v);
        }
        if let Some(v) = get("GOOGLE_APPLICATION_CREDENTIALS") {
            self.google.credentials_path = Some(PathBuf::from(v));
        }
        Ok(())
    }

    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let s = fs::read_to_string(path)?;
        self.apply_toml_str(&s)
    }

    pub fn apply_toml_str(&mut self, s: &str) -> Result<()> {
        let overlay: EngineToml = toml::from_str(s)
            .map_err(|e| EmpathyError::Config(format!("invalid config TOML: {e}")))?;
        overlay.apply(self)
    }

    fn set_timeout(&mut self, ms: u64) {
        self.tts_timeout_ms = ms;
        self.network.timeout_ms = ms;
        self.google.timeout_ms = ms;
    }
}

fn parse_named<T: FromStr<Err = String>>(key: &str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|e| EmpathyError::Config(format!("{key}: {e}")))
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| EmpathyError::Config(format!("{key}: expected a number, got {value:?}")))
}

// Zero would truncate every request to nothing
fn checked_length(key: &str, value: usize) -> Result<usize> {
    if value == 0 {
        return Err(EmpathyError::Config(format!("{key}: must be at least 1")));
    }
    Ok(value)
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(EmpathyError::Config(format!(
            "{key}: expected a boolean, got {value:?}"
        ))),
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct EngineToml {
    pub emotion_engine: Option<String>,
    pub tts_engine: Option<String>,
    pub fallback_tts: Option<String>,
    pub max_text_length: Option<usize>,
    pub tts_timeout_ms: Option<u64>,
    pub voice_table: Option<PathBuf>,
    pub textblob_enabled: Option<bool>,
    pub espeak_bin: Option<PathBuf>,
    pub say_bin: Option<PathBuf>,
    pub audio: Option<AudioToml>,
    pub classifier: Option<ClassifierToml>,
    pub network: Option<NetworkToml>,
    pub google_cloud: Option<GoogleCloudToml>,
}

impl EngineToml {
    fn apply(self, base: &mut EngineConfig) -> Result<()> {
        if let Some(v) = self.emotion_engine {
            base.emotion_mode = parse_named("emotion_engine", &v)?;
        }
        if let Some(v) = self.tts_engine {
            base.tts_engine = parse_named("tts_engine", &v)?;
        }
        if let Some(v) = self.fallback_tts {
            base.fallback_tts = parse_named("fallback_tts", &v)?;
        }
        if let Some(v) = self.max_text_length {
            base.max_text_length = checked_length("max_text_length", v)?;
        }
        if let Some(v) = self.tts_timeout_ms {
            base.set_timeout(v);
        }
        if let Some(v) = self.voice_table {
            base.voice_table_path = Some(v);
        }
        if let Some(v) = self.textblob_enabled {
            base.polarity_enabled = v;
        }
        if let Some(v) = self.espeak_bin {
            base.espeak_bin = Some(v);
        }
        if let Some(v) = self.say_bin {
            base.say_bin = Some(v);
        }
        if let Some(a) = self.audio {
            a.apply(base);
        }
        if let Some(c) = self.classifier {
            c.apply(&mut base.classifier);
        }
        if let Some(n) = self.network {
            n.apply(&mut base.network);
        }
        if let Some(g) = self.google_cloud {
            g.apply(&mut base.google);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct AudioToml {
    pub output_dir: Option<PathBuf>,
    pub url_prefix: Option<String>,
}
impl AudioToml {
    fn apply(self, base: &mut EngineConfig) {
        if let Some(x) = self.output_dir {
            base.output_dir = x;
        }
        if let Some(x) = self.url_prefix {
            base.url_prefix = x;
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassifierToml {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_ms: Option<u64>,
}
impl ClassifierToml {
    fn apply(self, c: &mut ClassifierConfig) {
        if let Some(x) = self.api_url {
            c.api_url = Some(x);
        }
        if let Some(x) = self.api_token {
            c.api_token = Some(x);
        }
        if let Some(x) = self.timeout_ms {
            c.timeout_ms = x;
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct NetworkToml {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub lang: Option<String>,
}
impl NetworkToml {
    fn apply(self, n: &mut NetworkTtsConfig) {
        if let Some(x) = self.enabled {
            n.enabled = x;
        }
        if let Some(x) = self.endpoint {
            n.endpoint = x;
        }
        if let Some(x) = self.lang {
            n.lang = x;
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct GoogleCloudToml {
    pub api_key: Option<String>,
    pub credentials_path: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub language_code: Option<String>,
}
impl GoogleCloudToml {
    fn apply(self, g: &mut GoogleCloudConfig) {
        if let Some(x) = self.api_key {
            g.api_key = Some(x);
        }
        if let Some(x) = self.credentials_path {
            g.credentials_path = Some(x);
        }
        if let Some(x) = self.endpoint {
            g.endpoint = x;
        }
        if let Some(x) = self.language_code {
            g.language_code = x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::EmotionEngine;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.emotion_mode, EmotionMode::Ensemble);
        assert_eq!(cfg.tts_engine, ProviderId::Gtts);
        assert_eq!(cfg.fallback_tts, ProviderId::Espeak);
        assert_eq!(cfg.max_text_length, 1000);
        assert_eq!(cfg.url_prefix, "/static/audio");
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = EngineConfig::default();
        cfg.apply_env(env(&[
            ("EMOTION_ENGINE", "vader"),
            ("TTS_ENGINE", "google_cloud"),
            ("FALLBACK_TTS", "espeak-ng"),
            ("MAX_TEXT_LENGTH", "250"),
            ("TTS_TIMEOUT_MS", "5000"),
            ("TEXTBLOB_ENABLED", "false"),
            ("HF_API_URL", "https://example.test/model"),
            ("GOOGLE_TTS_API_KEY", "  "),
        ]))
        .unwrap();
        assert_eq!(cfg.emotion_mode, EmotionMode::Single(EmotionEngine::Vader));
        assert_eq!(cfg.tts_engine, ProviderId::GoogleCloud);
        assert_eq!(cfg.fallback_tts, ProviderId::Espeak);
        assert_eq!(cfg.max_text_length, 250);
        assert_eq!(cfg.tts_timeout_ms, 5000);
        assert_eq!(cfg.network.timeout_ms, 5000);
        assert!(!cfg.polarity_enabled);
        assert_eq!(
            cfg.classifier.api_url.as_deref(),
            Some("https://example.test/model")
        );
        assert_eq!(cfg.google.api_key, None);
    }

    #[test]
    fn test_unknown_engine_is_rejected() {
        let mut cfg = EngineConfig::default();
        let err = cfg
            .apply_env(env(&[("TTS_ENGINE", "festival")]))
            .unwrap_err();
        assert!(matches!(err, EmpathyError::Config(_)));

        let err = cfg
            .apply_env(env(&[("MAX_TEXT_LENGTH", "lots")]))
            .unwrap_err();
        assert!(matches!(err, EmpathyError::Config(_)));
    }

    #[test]
    fn test_zero_max_length_is_rejected() {
        let mut cfg = EngineConfig::default();
        let err = cfg
            .apply_env(env(&[("MAX_TEXT_LENGTH", "0")]))
            .unwrap_err();
        assert!(matches!(err, EmpathyError::Config(_)));

        let err = cfg.apply_toml_str("max_text_length = 0\n").unwrap_err();
        assert!(matches!(err, EmpathyError::Config(_)));
        assert_eq!(cfg.max_text_length, 1000);
    }

    #[test]
    fn test_toml_overlay() {
        let mut cfg = EngineConfig::default();
        cfg.apply_toml_str(
            r#"
emotion_engine = "huggingface"
fallback_tts = "macos_say"
voice_table = "voices.toml"

[audio]
output_dir = "/tmp/empathy-audio"

[network]
enabled = false

[google_cloud]
api_key = "k-123"
"#,
        )
        .unwrap();
        assert_eq!(
            cfg.emotion_mode,
            EmotionMode::Single(EmotionEngine::HuggingFace)
        );
        assert_eq!(cfg.fallback_tts, ProviderId::MacosSay);
        assert_eq!(cfg.voice_table_path, Some(PathBuf::from("voices.toml")));
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/empathy-audio"));
        assert!(!cfg.network.enabled);
        assert_eq!(cfg.google.api_key.as_deref(), Some("k-123"));
        // untouched
        assert_eq!(cfg.tts_engine, ProviderId::Gtts);
    }

    #[test]
    fn test_toml_rejects_unknown_keys_and_names() {
        let mut cfg = EngineConfig::default();
        assert!(cfg.apply_toml_str("speed = 3").is_err());
        assert!(cfg.apply_toml_str("tts_engine = \"festival\"").is_err());
    }

    #[test]
    fn test_apply_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empathy.toml");
        std::fs::write(&path, "max_text_length = 42\n").unwrap();
        let mut cfg = EngineConfig::default();
        cfg.apply_file(&path).unwrap();
        assert_eq!(cfg.max_text_length, 42);
    }
}
