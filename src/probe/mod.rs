//! Producing the media document: probing files with ffprobe and walking
//! directories into a media tree.

pub mod ffprobe;
pub mod scanner;

use std::path::Path;

use crate::catalog::node::ProbeInfo;

/// Source of stream/format metadata for a single file.
///
/// `None` means nothing usable could be learned; the file still appears in
/// the tree, without attributes.
pub trait Probe {
    fn probe(&self, path: &Path) -> Option<ProbeInfo>;
}

impl<F> Probe for F
where
    F: Fn(&Path) -> Option<ProbeInfo>,
{
    fn probe(&self, path: &Path) -> Option<ProbeInfo> {
        self(path)
    }
}

/// File extensions treated as video, matched case-insensitively.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "wmv", "mpg", "mpeg"];

pub fn is_video(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    VIDEO_EXTENSIONS.contains(&ext.as_str())
}
