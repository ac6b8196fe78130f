use std::path::PathBuf;

/// Sentinel shown for attributes the probe did not report (e.g. an audio
/// stream without a language tag).
pub const NOT_AVAILABLE: &str = "N/A";

/// One entry of the media tree: either a directory or a probed video file.
///
/// The tree is a pure forest: every node is owned by exactly one parent
/// `contents` vector, or by the root vector returned from document parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaNode {
    Directory(Directory),
    File(MediaFile),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Directory {
    pub path: PathBuf,
    pub contents: Vec<MediaNode>,
}

/// A video file. `probe` is `None` when ffprobe produced nothing usable for
/// the file; such a file has no attributes to match against.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaFile {
    pub path: PathBuf,
    pub probe: Option<ProbeInfo>,
}

/// Stream and container metadata reported by ffprobe for one file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbeInfo {
    pub streams: Vec<StreamDescriptor>,
    pub format: FormatInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FormatInfo {
    /// Seconds.
    pub duration: Option<f64>,
    /// Bits per second.
    pub bit_rate: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamDescriptor {
    Video(VideoStream),
    Audio(AudioStream),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoStream {
    pub codec_name: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioStream {
    pub codec_name: String,
    pub codec_long_name: Option<String>,
    pub channels: Option<u32>,
    pub channel_layout: Option<String>,
    pub language: Option<String>,
}

impl MediaNode {
    pub fn path(&self) -> &std::path::Path {
        match self {
            MediaNode::Directory(dir) => &dir.path,
            MediaNode::File(file) => &file.path,
        }
    }

    /// Number of media files at or below this node.
    pub fn file_count(&self) -> usize {
        match self {
            MediaNode::Directory(dir) => count_files(&dir.contents),
            MediaNode::File(_) => 1,
        }
    }
}

/// Number of media files anywhere in `nodes`.
pub fn count_files(nodes: &[MediaNode]) -> usize {
    nodes.iter().map(MediaNode::file_count).sum()
}

impl MediaFile {
    /// The first video stream. Later video streams (cover art, alternate
    /// angles) are ignored for display and matching.
    pub fn video_stream(&self) -> Option<&VideoStream> {
        self.probe.as_ref()?.video_stream()
    }

    pub fn audio_streams(&self) -> impl Iterator<Item = &AudioStream> {
        self.probe.iter().flat_map(|probe| probe.audio_streams())
    }
}

impl ProbeInfo {
    pub fn video_stream(&self) -> Option<&VideoStream> {
        self.streams.iter().find_map(|stream| match stream {
            StreamDescriptor::Video(video) => Some(video),
            StreamDescriptor::Audio(_) => None,
        })
    }

    pub fn audio_streams(&self) -> impl Iterator<Item = &AudioStream> {
        self.streams.iter().filter_map(|stream| match stream {
            StreamDescriptor::Audio(audio) => Some(audio),
            StreamDescriptor::Video(_) => None,
        })
    }
}

impl VideoStream {
    /// `"{width}x{height}"`, or `None` when either dimension is unknown.
    pub fn resolution(&self) -> Option<String> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(format!("{}x{}", w, h)),
            _ => None,
        }
    }
}

impl AudioStream {
    pub fn language_or_na(&self) -> &str {
        self.language.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}
