//! macOS `say` command.
//!
//! Only supported when built for macOS with `say` on `PATH`; elsewhere the
//! provider reports itself unsupported before any attempt. Output is AAC in
//! an m4a container.

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

pub struct PlatformSynthesis {
    bin: Option<PathBuf>,
}

impl PlatformSynthesis {
    pub fn new(bin: Option<PathBuf>) -> Self {
        Self { bin }
    }
}

#[async_trait]
impl SynthesisProvider for PlatformSynthesis {
    fn id(&self) -> ProviderId {
        ProviderId::MacosSay
    }

    fn is_supported(&self) -> bool {
        cfg!(target_os = "macos") && self.bin.is_some()
    }

    async fn attempt(
        &self,
        text: &str,
        voice: &VoiceSettings,
        out: &Path,
    ) -> Result<(), ProviderError> {
        if !self.is_supported() {
            return Err(ProviderError::Unavailable(
                "say is only available on macOS".to_string(),
            ));
        }
        let bin = self
            .bin
            .as_deref()
            .ok_or_else(|| ProviderError::Unavailable("say not found".to_string()))?;
        let VoiceProfile::Platform { voice: name, rate } = &voice.profile else {
            return Err(ProviderError::ProfileMismatch(self.id()));
        };

        let mut cmd = Command::new(bin);
        cmd.arg("-v").arg(name);
        cmd.arg("-r").arg(rate.to_string());
        cmd.arg("-o").arg(out);
        cmd.arg("--file-format=m4af");
        cmd.arg("--data-format=aac");
        // no text argument: say reads stdin
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        debug!(target = "synthesis", command = ?cmd, "Running say");
        let mut child = cmd.spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }
        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(ProviderError::CallFailed(format!(
                "say failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }
}
