use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::{Args, Command};
use crate::probe::ffprobe::DEFAULT_BINARY;

const DEFAULT_PORT: u16 = 8300;
const DEFAULT_DOCUMENT: &str = "media_info.json";

/// Settings read from the TOML config file. Every key is optional.
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub localhost: Option<bool>,
    pub ffprobe: Option<PathBuf>,
    /// Where `scan` writes; falls back to `document` when unset.
    pub output: Option<PathBuf>,
    /// Document read by `serve`, `filter` and `options`.
    pub document: Option<PathBuf>,
}

/// Effective settings: CLI flag, then config file, then built-in default.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub localhost: bool,
    pub ffprobe: PathBuf,
    pub document: PathBuf,
}

impl Config {
    pub fn resolve(file: Option<FileConfig>, args: &Args) -> Self {
        let file = file.unwrap_or_default();

        let (cli_document, cli_port, cli_localhost, cli_ffprobe) = match &args.command {
            Command::Scan { output, ffprobe, .. } => (output.clone(), None, false, ffprobe.clone()),
            Command::Serve { document, port, localhost } => (document.clone(), *port, *localhost, None),
            Command::Filter { document, .. } | Command::Options { document } => {
                (document.clone(), None, false, None)
            }
        };
        let file_document = match &args.command {
            Command::Scan { .. } => file.output.or(file.document),
            _ => file.document,
        };

        Config {
            port: cli_port.or(file.port).unwrap_or(DEFAULT_PORT),
            localhost: cli_localhost || file.localhost.unwrap_or(false),
            ffprobe: cli_ffprobe
                .or(file.ffprobe)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY)),
            document: cli_document
                .or(file_document)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT)),
        }
    }
}

const CONFIG_FILE_NAME: &str = "mediacat.toml";

/// Places searched for a config file when none is given, most specific first.
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    candidates.extend(dirs::config_dir().map(|dir| dir.join("mediacat").join("config.toml")));
    candidates
}

/// An explicit `--config` path is returned as is, even if it does not exist,
/// so that loading it reports the problem.
pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_owned()),
        None => config_candidates().into_iter().find(|path| path.is_file()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}
