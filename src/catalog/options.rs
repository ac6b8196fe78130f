use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use serde::{Serialize, Serializer};

use crate::catalog::node::MediaNode;

/// Sentinel choice placed first in every option list; selecting it clears
/// the constraint for that dimension.
pub const ANY: &str = "any";

/// Set that remembers first-insertion order. Iteration yields each distinct
/// value once, in the order it was first seen.
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        OrderedSet {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the value was already present.
    pub fn insert(&mut self, value: T) -> bool {
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: Eq + Hash> PartialEq for OrderedSet<T> {
    /// Set equality: order is a presentation detail.
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
    }
}

impl<T: Eq + Hash> Eq for OrderedSet<T> {}

impl<T: Eq + Hash + Clone> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for OrderedSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

/// A filterable attribute dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    VideoCodec,
    AudioCodec,
    AudioChannels,
    VideoResolution,
}

impl Dimension {
    pub fn all() -> &'static [Dimension] {
        &[
            Dimension::VideoCodec,
            Dimension::AudioCodec,
            Dimension::AudioChannels,
            Dimension::VideoResolution,
        ]
    }

    /// Field name used by the filter form and query strings.
    pub fn field_name(&self) -> &'static str {
        match self {
            Dimension::VideoCodec => "videoCodec",
            Dimension::AudioCodec => "audioCodec",
            Dimension::AudioChannels => "audioChannels",
            Dimension::VideoResolution => "videoResolution",
        }
    }
}

/// Every distinct filterable value reachable from a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub video_codecs: OrderedSet<String>,
    pub audio_codecs: OrderedSet<String>,
    pub audio_channels: OrderedSet<u32>,
    pub video_resolutions: OrderedSet<String>,
}

impl FilterOptions {
    /// Selectable entries for one dimension, `ANY` first.
    pub fn choices(&self, dimension: Dimension) -> Vec<String> {
        let values: Vec<String> = match dimension {
            Dimension::VideoCodec => self.video_codecs.iter().cloned().collect(),
            Dimension::AudioCodec => self.audio_codecs.iter().cloned().collect(),
            Dimension::AudioChannels => self.audio_channels.iter().map(u32::to_string).collect(),
            Dimension::VideoResolution => self.video_resolutions.iter().cloned().collect(),
        };
        std::iter::once(ANY.to_string()).chain(values).collect()
    }

    fn collect(&mut self, nodes: &[MediaNode]) {
        for node in nodes {
            match node {
                MediaNode::Directory(dir) => self.collect(&dir.contents),
                MediaNode::File(file) => {
                    if let Some(video) = file.video_stream() {
                        if !video.codec_name.is_empty() {
                            self.video_codecs.insert(video.codec_name.clone());
                        }
                        if let Some(resolution) = video.resolution() {
                            self.video_resolutions.insert(resolution);
                        }
                    }
                    for audio in file.audio_streams() {
                        if !audio.codec_name.is_empty() {
                            self.audio_codecs.insert(audio.codec_name.clone());
                        }
                        if let Some(channels) = audio.channels {
                            self.audio_channels.insert(channels);
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for FilterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for dimension in Dimension::all() {
            writeln!(
                f,
                "{}: {}",
                dimension.field_name(),
                self.choices(*dimension).join(", ")
            )?;
        }
        Ok(())
    }
}

/// Walk the whole tree and collect the distinct video codecs, audio codecs,
/// audio channel counts and video resolutions it contains.
pub fn extract_options(nodes: &[MediaNode]) -> FilterOptions {
    let mut options = FilterOptions::default();
    options.collect(nodes);
    options
}
