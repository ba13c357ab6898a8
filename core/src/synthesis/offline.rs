//! Offline synthesis via espeak-ng.
//!
//! Text goes in on stdin (so leading dashes are never read as flags), audio
//! comes out as WAV at the target path. Rate maps to words per minute,
//! volume to espeak amplitude (0–200, 100 = normal), and the optional voice
//! variant picks a brighter or darker timbre.

use super::error::ProviderError;
use super::traits::SynthesisProvider;
use super::ProviderId;
use crate::voice::{VoiceProfile, VoiceSettings};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

pub struct OfflineSynthesis {
    bin: Option<PathBuf>,
    language: String,
}

impl OfflineSynthesis {
    pub fn new(bin: Option<PathBuf>) -> Self {
        Self {
            bin,
            language: "en".to_string(),
        }
    }

    fn build_command(
        &self,
        bin: &Path,
        rate: u32,
        volume: f32,
        variant: Option<&str>,
        out: &Path,
    ) -> Command {
        let wpm = rate.clamp(80, 450);
        let amp = (100.0 * volume).round().clamp(0.0, 200.0) as i32;
        let voice = match variant {
            Some(v) => format!("{}+{}", self.language, v),
            None => self.language.clone(),
        };

        let mut cmd = Command::new(bin);
        cmd.arg("-v").arg(voice);
        cmd.arg("-s").arg(wpm.to_string());
        cmd.arg("-a").arg(amp.to_string());
        cmd.arg("-w").arg(out);
        cmd.arg("--stdin");
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl SynthesisProvider for OfflineSynthesis {
    fn id(&self) -> ProviderId {
        ProviderId::Espeak
    }

    fn is_supported(&self) -> bool {
        self.bin.is_some()
    }

    async fn attempt(
        &self,
        text: &str,
        voice: &VoiceSettings,
        out: &Path,
    ) -> Result<(), ProviderError> {
        let bin = self
            .bin
            .as_deref()
            .ok_or_else(|| ProviderError::Unavailable("espeak-ng not found".to_string()))?;
        let VoiceProfile::Offline {
            rate,
            volume,
            variant,
        } = &voice.profile
        else {
            return Err(ProviderError::ProfileMismatch(self.id()));
        };

        let mut cmd = self.build_command(bin, *rate, *volume, variant.as_deref(), out);
        debug!(target = "synthesis", command = ?cmd, "Running espeak-ng");
        let mut child = cmd.spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }
        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(ProviderError::CallFailed(format!(
                "espeak-ng failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }
}
