use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, Serializer};

use crate::catalog::node::{
    AudioStream, Directory, FormatInfo, MediaFile, MediaNode, ProbeInfo, StreamDescriptor,
    VideoStream,
};

const TYPE_VIDEO: &str = "video";
const TYPE_DIRECTORY: &str = "directory";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read media document: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse media document: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Wire shape ────────────────────────────────────────────────────────────────
//
// Mirrors the JSON written by the scanner and consumed by viewers:
// `{ path, type, info?: { streams, format }, contents? }`. ffprobe adds many
// more fields than these; unknown fields are ignored.

#[derive(Debug, Serialize, Deserialize)]
struct WireNode {
    path: PathBuf,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    info: Option<WireInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contents: Option<Vec<WireNode>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    streams: Option<Vec<WireStream>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<WireFormat>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireStream {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    codec_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    codec_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    codec_long_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    channels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    channel_layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tags: Option<WireTags>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bit_rate: Option<Numeric>,
}

/// ffprobe reports numbers as strings ("120.000000"); hand-written documents
/// tend to use plain JSON numbers. Accept both.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Text(String),
    Number(f64),
}

impl Numeric {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Numeric::Text(s) => s.trim().parse::<f64>().ok()?,
            Numeric::Number(n) => *n,
        };
        value.is_finite().then_some(value)
    }

    /// Durations and bit rates; ffprobe reports unknowns as "N/A" or a
    /// negative sentinel.
    fn as_non_negative(&self) -> Option<f64> {
        self.as_f64().filter(|value| *value >= 0.0)
    }
}

// ── Wire → model ──────────────────────────────────────────────────────────────

impl WireNode {
    /// Returns `None` for entries that are neither videos nor directories
    /// (the scanner's plain `"file"` entries, or unknown types).
    fn into_node(self) -> Option<MediaNode> {
        match self.kind.as_str() {
            TYPE_VIDEO => Some(MediaNode::File(MediaFile {
                path: self.path,
                probe: self.info.and_then(WireInfo::into_probe),
            })),
            TYPE_DIRECTORY => Some(MediaNode::Directory(Directory {
                path: self.path,
                contents: self
                    .contents
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(WireNode::into_node)
                    .collect(),
            })),
            other => {
                tracing::debug!("skipping {} entry {}", other, self.path.display());
                None
            }
        }
    }
}

impl WireInfo {
    /// Probe output lacking either `streams` or `format` carries no usable
    /// attributes; the file is kept but treated as unprobed.
    fn into_probe(self) -> Option<ProbeInfo> {
        let (Some(streams), Some(format)) = (self.streams, self.format) else {
            return None;
        };
        Some(ProbeInfo {
            streams: streams.into_iter().filter_map(WireStream::into_stream).collect(),
            format: FormatInfo {
                duration: format.duration.as_ref().and_then(Numeric::as_non_negative),
                bit_rate: format
                    .bit_rate
                    .as_ref()
                    .and_then(Numeric::as_non_negative)
                    .map(|rate| rate as u64),
            },
        })
    }
}

impl WireStream {
    /// Subtitle, data and attachment streams are dropped.
    fn into_stream(self) -> Option<StreamDescriptor> {
        let codec_name = self.codec_name.unwrap_or_default();
        match self.codec_type.as_deref() {
            Some("video") => Some(StreamDescriptor::Video(VideoStream {
                codec_name,
                width: self.width,
                height: self.height,
            })),
            Some("audio") => Some(StreamDescriptor::Audio(AudioStream {
                codec_name,
                codec_long_name: self.codec_long_name,
                channels: self.channels,
                channel_layout: self.channel_layout,
                language: self.tags.and_then(|tags| tags.language),
            })),
            _ => None,
        }
    }
}

// ── Model → wire ──────────────────────────────────────────────────────────────

impl From<&MediaNode> for WireNode {
    fn from(node: &MediaNode) -> Self {
        match node {
            MediaNode::Directory(dir) => WireNode {
                path: dir.path.clone(),
                kind: TYPE_DIRECTORY.to_string(),
                info: None,
                contents: Some(dir.contents.iter().map(WireNode::from).collect()),
            },
            MediaNode::File(file) => WireNode {
                path: file.path.clone(),
                kind: TYPE_VIDEO.to_string(),
                info: file.probe.as_ref().map(WireInfo::from),
                contents: None,
            },
        }
    }
}

impl From<&ProbeInfo> for WireInfo {
    fn from(probe: &ProbeInfo) -> Self {
        WireInfo {
            streams: Some(probe.streams.iter().map(WireStream::from).collect()),
            format: Some(WireFormat {
                duration: probe.format.duration.map(|d| Numeric::Text(d.to_string())),
                bit_rate: probe.format.bit_rate.map(|b| Numeric::Text(b.to_string())),
            }),
        }
    }
}

impl From<&StreamDescriptor> for WireStream {
    fn from(stream: &StreamDescriptor) -> Self {
        match stream {
            StreamDescriptor::Video(video) => WireStream {
                codec_type: Some("video".to_string()),
                codec_name: Some(video.codec_name.clone()),
                width: video.width,
                height: video.height,
                ..Default::default()
            },
            StreamDescriptor::Audio(audio) => WireStream {
                codec_type: Some("audio".to_string()),
                codec_name: Some(audio.codec_name.clone()),
                codec_long_name: audio.codec_long_name.clone(),
                channels: audio.channels,
                channel_layout: audio.channel_layout.clone(),
                tags: audio.language.clone().map(|language| WireTags {
                    language: Some(language),
                }),
                ..Default::default()
            },
        }
    }
}

impl Serialize for MediaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireNode::from(self).serialize(serializer)
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Parse a media document (a JSON array of root nodes).
pub fn parse_document(json: &str) -> Result<Vec<MediaNode>, DocumentError> {
    let wire: Vec<WireNode> = serde_json::from_str(json)?;
    Ok(wire.into_iter().filter_map(WireNode::into_node).collect())
}

pub fn load_document(path: &Path) -> Result<Vec<MediaNode>, DocumentError> {
    let content = std::fs::read_to_string(path)?;
    parse_document(&content)
}

/// Convert raw `ffprobe -print_format json -show_format -show_streams`
/// output into probe info. `Ok(None)` means ffprobe answered but reported
/// no streams or no format section.
pub fn parse_probe_output(json: &str) -> Result<Option<ProbeInfo>, serde_json::Error> {
    let info: WireInfo = serde_json::from_str(json)?;
    Ok(info.into_probe())
}

pub fn to_json_pretty(nodes: &[MediaNode]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(nodes)
}

pub fn write_document(path: &Path, nodes: &[MediaNode]) -> Result<(), DocumentError> {
    let json = to_json_pretty(nodes)?;
    std::fs::write(path, json)?;
    Ok(())
}
