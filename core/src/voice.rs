//! Emotion → voice casting.
//!
//! Every synthesis provider has exactly one [`VoiceProfile`] per emotion
//! category. The built-in table can be overridden entry by entry from a TOML
//! file, so the casting choices stay data rather than code:
//!
//! ```toml
//! [[gtts]]
//! emotion = "Very Positive"
//! tld = "com.au"
//!
//! [[espeak]]
//! emotion = "Negative"
//! rate = 125
//! volume = 0.5
//! variant = "m3"
//! ```
//!
//! Separately from the table, [`speaking_rate`] gives a scalar rate for
//! providers that only expose a rate knob.

use crate::emotion::EmotionCategory;
use crate::synthesis::ProviderId;
use crate::{EmpathyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

/// Provider-specific synthesis parameters. Only the matching provider
/// interprets the contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoiceProfile {
    /// Regional endpoint (accent proxy) and slow-speech flag
    Network { tld: String, slow: bool },
    /// Words per minute, volume in `0.0..=1.0`, optional voice variant
    Offline {
        rate: u32,
        volume: f32,
        variant: Option<String>,
    },
    /// Named system voice and words per minute
    Platform { voice: String, rate: u32 },
    /// Named cloud voice and its SSML gender
    Cloud { voice_name: String, gender: String },
}

/// Everything a provider needs to voice one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    pub category: EmotionCategory,
    pub profile: VoiceProfile,
    /// Multiplier around 1.0, see [`speaking_rate`]
    pub speaking_rate: f32,
}

/// Scalar delivery speed: only the extremes move away from baseline.
pub fn speaking_rate(category: EmotionCategory) -> f32 {
    match category {
        EmotionCategory::VeryPositive => 1.2,
        EmotionCategory::VeryNegative => 0.8,
        _ => 1.0,
    }
}

// Built-in casting, ordered VeryPositive → VeryNegative.
const NETWORK_TABLE: [(EmotionCategory, &str, bool); 7] = [
    (EmotionCategory::VeryPositive, "com.au", false),
    (EmotionCategory::Positive, "co.uk", false),
    (EmotionCategory::SlightlyPositive, "ca", false),
    (EmotionCategory::Neutral, "com", false),
    (EmotionCategory::SlightlyNegative, "co.in", false),
    (EmotionCategory::Negative, "co.za", true),
    (EmotionCategory::VeryNegative, "com", true),
];

const OFFLINE_TABLE: [(EmotionCategory, u32, f32, Option<&str>); 7] = [
    (EmotionCategory::VeryPositive, 200, 1.0, Some("f3")),
    (EmotionCategory::Positive, 180, 0.9, Some("f3")),
    (EmotionCategory::SlightlyPositive, 170, 0.8, Some("f3")),
    (EmotionCategory::Neutral, 160, 0.7, None),
    (EmotionCategory::SlightlyNegative, 140, 0.6, Some("m3")),
    (EmotionCategory::Negative, 130, 0.5, Some("m3")),
    (EmotionCategory::VeryNegative, 120, 0.4, Some("m3")),
];

const PLATFORM_TABLE: [(EmotionCategory, &str, u32); 7] = [
    (EmotionCategory::VeryPositive, "Samantha", 200),
    (EmotionCategory::Positive, "Kathy", 180),
    (EmotionCategory::SlightlyPositive, "Alex", 170),
    (EmotionCategory::Neutral, "Alex", 160),
    (EmotionCategory::SlightlyNegative, "Tom", 140),
    (EmotionCategory::Negative, "Ralph", 130),
    (EmotionCategory::VeryNegative, "Fred", 120),
];

const CLOUD_TABLE: [(EmotionCategory, &str, &str); 7] = [
    (EmotionCategory::VeryPositive, "en-US-Wavenet-H", "FEMALE"),
    (EmotionCategory::Positive, "en-US-Wavenet-C", "FEMALE"),
    (EmotionCategory::SlightlyPositive, "en-US-Wavenet-E", "MALE"),
    (EmotionCategory::Neutral, "en-US-Wavenet-D", "MALE"),
    (EmotionCategory::SlightlyNegative, "en-US-Wavenet-B", "MALE"),
    (EmotionCategory::Negative, "en-US-Wavenet-A", "MALE"),
    (EmotionCategory::VeryNegative, "en-US-Wavenet-I", "MALE"),
];

#[derive(Debug, Clone)]
pub struct VoiceMapper {
    table: HashMap<(ProviderId, EmotionCategory), VoiceProfile>,
}

impl Default for VoiceMapper {
    fn default() -> Self {
        Self::builtin()
    }
}

impl VoiceMapper {
    pub fn builtin() -> Self {
        let mut table = HashMap::new();
        for (c, tld, slow) in NETWORK_TABLE {
            table.insert(
                (ProviderId::Gtts, c),
                VoiceProfile::Network {
                    tld: tld.to_string(),
                    slow,
                },
            );
        }
        for (c, rate, volume, variant) in OFFLINE_TABLE {
            table.insert(
                (ProviderId::Espeak, c),
                VoiceProfile::Offline {
                    rate,
                    volume,
                    variant: variant.map(str::to_string),
                },
            );
        }
        for (c, voice, rate) in PLATFORM_TABLE {
            table.insert(
                (ProviderId::MacosSay, c),
                VoiceProfile::Platform {
                    voice: voice.to_string(),
                    rate,
                },
            );
        }
        for (c, name, gender) in CLOUD_TABLE {
            table.insert(
                (ProviderId::GoogleCloud, c),
                VoiceProfile::Cloud {
                    voice_name: name.to_string(),
                    gender: gender.to_string(),
                },
            );
        }
        Self { table }
    }

    /// Overlay entries from TOML onto the built-in table.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let parsed: VoiceTableToml = toml::from_str(s)
            .map_err(|e| EmpathyError::Config(format!("invalid voice table: {e}")))?;
        let mut mapper = Self::builtin();
        parsed.apply(&mut mapper)?;
        Ok(mapper)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let mapper = Self::from_toml_str(&s)?;
        info!(target = "voice", path = %path.display(), "Loaded voice table");
        Ok(mapper)
    }

    /// Profile for `(category, provider)`; the provider's `Neutral` entry
    /// stands in for anything unmapped.
    pub fn map_voice(&self, category: EmotionCategory, provider: ProviderId) -> VoiceProfile {
        self.table
            .get(&(provider, category))
            .or_else(|| self.table.get(&(provider, EmotionCategory::Neutral)))
            .cloned()
            .unwrap_or_else(|| builtin_neutral(provider))
    }

    pub fn resolve(&self, category: EmotionCategory, provider: ProviderId) -> VoiceSettings {
        VoiceSettings {
            category,
            profile: self.map_voice(category, provider),
            speaking_rate: speaking_rate(category),
        }
    }
}

fn builtin_neutral(provider: ProviderId) -> VoiceProfile {
    match provider {
        ProviderId::Gtts => VoiceProfile::Network {
            tld: "com".to_string(),
            slow: false,
        },
        ProviderId::Espeak => VoiceProfile::Offline {
            rate: 160,
            volume: 0.7,
            variant: None,
        },
        ProviderId::MacosSay => VoiceProfile::Platform {
            voice: "Alex".to_string(),
            rate: 160,
        },
        ProviderId::GoogleCloud => VoiceProfile::Cloud {
            voice_name: "en-US-Wavenet-D".to_string(),
            gender: "MALE".to_string(),
        },
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct VoiceTableToml {
    #[serde(default)]
    gtts: Vec<NetworkToml>,
    #[serde(default)]
    espeak: Vec<OfflineToml>,
    #[serde(default)]
    macos_say: Vec<PlatformToml>,
    #[serde(default)]
    google_cloud: Vec<CloudToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NetworkToml {
    emotion: EmotionCategory,
    tld: String,
    #[serde(default)]
    slow: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OfflineToml {
    emotion: EmotionCategory,
    rate: u32,
    volume: f32,
    variant: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlatformToml {
    emotion: EmotionCategory,
    voice: String,
    rate: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CloudToml {
    emotion: EmotionCategory,
    voice_name: String,
    gender: String,
}

impl VoiceTableToml {
    fn apply(self, m: &mut VoiceMapper) -> Result<()> {
        let mut entries = Vec::new();
        for e in self.gtts {
            entries.push((
                ProviderId::Gtts,
                e.emotion,
                VoiceProfile::Network {
                    tld: e.tld,
                    slow: e.slow,
                },
            ));
        }
        for e in self.espeak {
            entries.push((
                ProviderId::Espeak,
                e.emotion,
                VoiceProfile::Offline {
                    rate: e.rate,
                    volume: e.volume.clamp(0.0, 1.0),
                    variant: e.variant.filter(|v| !v.is_empty()),
                },
            ));
        }
        for e in self.macos_say {
            entries.push((
                ProviderId::MacosSay,
                e.emotion,
                VoiceProfile::Platform {
                    voice: e.voice,
                    rate: e.rate,
                },
            ));
        }
        for e in self.google_cloud {
            entries.push((
                ProviderId::GoogleCloud,
                e.emotion,
                VoiceProfile::Cloud {
                    voice_name: e.voice_name,
                    gender: e.gender.to_ascii_uppercase(),
                },
            ));
        }

        let mut seen = HashSet::new();
        for (provider, emotion, profile) in entries {
            if !seen.insert((provider, emotion)) {
                return Err(EmpathyError::Config(format!(
                    "voice table defines '{}' twice for {}",
                    emotion, provider
                )));
            }
            m.table.insert((provider, emotion), profile);
        }
        Ok(())
    }
}
