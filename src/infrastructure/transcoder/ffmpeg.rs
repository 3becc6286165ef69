use super::{TranscodeError, Transcoder};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{error, info};

// Keeps error messages readable when ffmpeg dumps a long log.
const STDERR_TAIL: usize = 2048;

#[derive(Clone, Debug)]
pub struct FfmpegTranscoder {
    program: String,
}

impl FfmpegTranscoder {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }
}

fn tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    match text.char_indices().rev().nth(STDERR_TAIL) {
        Some((idx, _)) => text[idx..].to_string(),
        None => text.to_string(),
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        info!(input = %input.display(), output = %output.display(), "Running ffmpeg");

        let result = Command::new(&self.program)
            .args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(input)
            .arg(output)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| TranscodeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            let stderr = tail(&result.stderr);
            error!(status = %result.status, stderr = %stderr, "ffmpeg failed");
            return Err(TranscodeError::Exit {
                program: self.program.clone(),
                status: result.status.to_string(),
                stderr,
            });
        }

        Ok(())
    }
}
