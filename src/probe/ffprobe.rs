use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::catalog::document::parse_probe_output;
use crate::catalog::node::ProbeInfo;
use crate::probe::Probe;

pub const DEFAULT_BINARY: &str = "ffprobe";

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{binary} exited with {status}")]
    Status { binary: String, status: std::process::ExitStatus },
    #[error("unreadable ffprobe output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Runs the external `ffprobe` tool.
#[derive(Debug, Clone)]
pub struct Ffprobe {
    binary: PathBuf,
}

impl Default for Ffprobe {
    fn default() -> Self {
        Ffprobe::new(DEFAULT_BINARY)
    }
}

impl Ffprobe {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Ffprobe { binary: binary.into() }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Confirm the binary can be executed (`ffprobe -version`).
    pub fn check(&self) -> Result<(), ProbeError> {
        let status = Command::new(&self.binary)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| ProbeError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;
        if !status.success() {
            return Err(ProbeError::Status {
                binary: self.binary.display().to_string(),
                status,
            });
        }
        Ok(())
    }

    /// Probe one file. `Ok(None)` when ffprobe ran but reported no streams
    /// or no format section.
    pub fn run(&self, path: &Path) -> Result<Option<ProbeInfo>, ProbeError> {
        let output = Command::new(&self.binary)
            .args(["-v", "error", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProbeError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(ProbeError::Status {
                binary: self.binary.display().to_string(),
                status: output.status,
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_probe_output(&stdout)?)
    }
}

impl Probe for Ffprobe {
    fn probe(&self, path: &Path) -> Option<ProbeInfo> {
        match self.run(path) {
            Ok(Some(info)) => Some(info),
            Ok(None) => {
                tracing::warn!("No stream info reported for {}", path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Cannot probe {}: {}", path.display(), e);
                None
            }
        }
    }
}
