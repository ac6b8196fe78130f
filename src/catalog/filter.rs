use serde::{Deserialize, Deserializer};

use crate::catalog::node::{Directory, MediaFile, MediaNode};

/// Active filter constraints, one per filterable dimension.
///
/// A missing or blank value means "no constraint" on that dimension. Field
/// names follow the viewer's form fields (`videoCodec`, ...); snake_case
/// spellings are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring of the video codec name.
    #[serde(default, alias = "video_codec")]
    pub video_codec: Option<String>,
    /// Case-insensitive substring of any audio stream's codec name.
    #[serde(default, alias = "audio_codec")]
    pub audio_codec: Option<String>,
    /// Exact channel count of any audio stream.
    #[serde(default, alias = "audio_channels", deserialize_with = "string_or_number")]
    pub audio_channels: Option<String>,
    /// Exact `"{width}x{height}"` of the video stream.
    #[serde(default, alias = "video_resolution")]
    pub video_resolution: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video_codec(mut self, value: impl Into<String>) -> Self {
        self.video_codec = Some(value.into());
        self
    }

    pub fn with_audio_codec(mut self, value: impl Into<String>) -> Self {
        self.audio_codec = Some(value.into());
        self
    }

    pub fn with_audio_channels(mut self, value: impl ToString) -> Self {
        self.audio_channels = Some(value.to_string());
        self
    }

    pub fn with_video_resolution(mut self, value: impl Into<String>) -> Self {
        self.video_resolution = Some(value.into());
        self
    }

    /// True when no dimension carries a constraint.
    pub fn is_empty(&self) -> bool {
        Matcher::new(self).is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(u64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }),
    )
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Channel constraint after parsing. Compared by numeric value, so "2",
/// "02", "2.0" and "2e0" are the same count. A criterion that is not a
/// finite number is still active but can never match.
#[derive(Debug, Clone, Copy)]
enum ChannelCount {
    Exact(f64),
    Unmatchable,
}

/// Criteria normalized once per filter call: needles lowercased, channel
/// count parsed, blanks dropped.
#[derive(Debug)]
struct Matcher {
    video_codec: Option<String>,
    audio_codec: Option<String>,
    audio_channels: Option<ChannelCount>,
    video_resolution: Option<String>,
}

impl Matcher {
    fn new(criteria: &FilterCriteria) -> Self {
        Matcher {
            video_codec: active(&criteria.video_codec).map(str::to_lowercase),
            audio_codec: active(&criteria.audio_codec).map(str::to_lowercase),
            audio_channels: active(&criteria.audio_channels).map(|s| match s.parse::<f64>() {
                Ok(n) if n.is_finite() => ChannelCount::Exact(n),
                _ => ChannelCount::Unmatchable,
            }),
            video_resolution: active(&criteria.video_resolution).map(str::to_string),
        }
    }

    fn is_empty(&self) -> bool {
        self.video_codec.is_none()
            && self.audio_codec.is_none()
            && self.audio_channels.is_none()
            && self.video_resolution.is_none()
    }

    /// Conjunction of every active constraint.
    fn matches(&self, file: &MediaFile) -> bool {
        if self.is_empty() {
            return true;
        }
        if file.probe.is_none() {
            return false;
        }
        let video = file.video_stream();

        if let Some(needle) = &self.video_codec {
            let hit = video.is_some_and(|v| v.codec_name.to_lowercase().contains(needle.as_str()));
            if !hit {
                return false;
            }
        }

        if let Some(needle) = &self.audio_codec {
            let hit = file
                .audio_streams()
                .any(|a| a.codec_name.to_lowercase().contains(needle.as_str()));
            if !hit {
                return false;
            }
        }

        if let Some(wanted) = self.audio_channels {
            let hit = match wanted {
                ChannelCount::Exact(n) => file
                    .audio_streams()
                    .any(|a| a.channels.is_some_and(|c| f64::from(c) == n)),
                ChannelCount::Unmatchable => false,
            };
            if !hit {
                return false;
            }
        }

        if let Some(wanted) = &self.video_resolution {
            let hit = video
                .and_then(|v| v.resolution())
                .is_some_and(|res| res == *wanted);
            if !hit {
                return false;
            }
        }

        true
    }
}

/// Return a new tree holding only the files that satisfy `criteria` and the
/// directories that still contain at least one of them.
///
/// The input is never modified, so the same tree can be filtered again with
/// different criteria. Order within each level is preserved. With no active
/// criteria the result is a copy of the input, empty directories included.
pub fn filter_tree(nodes: &[MediaNode], criteria: &FilterCriteria) -> Vec<MediaNode> {
    let matcher = Matcher::new(criteria);
    if matcher.is_empty() {
        return nodes.to_vec();
    }
    filter_nodes(nodes, &matcher)
}

fn filter_nodes(nodes: &[MediaNode], matcher: &Matcher) -> Vec<MediaNode> {
    nodes
        .iter()
        .filter_map(|node| filter_node(node, matcher))
        .collect()
}

fn filter_node(node: &MediaNode, matcher: &Matcher) -> Option<MediaNode> {
    match node {
        MediaNode::File(file) => matcher.matches(file).then(|| node.clone()),
        MediaNode::Directory(dir) => {
            let contents = filter_nodes(&dir.contents, matcher);
            if contents.is_empty() {
                return None;
            }
            Some(MediaNode::Directory(Directory {
                path: dir.path.clone(),
                contents,
            }))
        }
    }
}
