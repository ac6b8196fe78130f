use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

use crate::catalog::node::{Directory, MediaFile, MediaNode};
use crate::probe::{is_video, Probe};

/// Counters for the summary line logged after a scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub directories: usize,
    pub videos: usize,
    pub unprobed: usize,
    pub skipped: usize,
}

/// Build a media tree from the given roots.
///
/// A directory root becomes a `Directory` node with its full recursive
/// contents; a video file root becomes a file node. Missing roots are
/// logged and skipped. Entries are visited in file-name order and
/// non-video files are left out.
pub fn scan(paths: &[PathBuf], probe: &impl Probe) -> Vec<MediaNode> {
    scan_with_stats(paths, probe).0
}

pub fn scan_with_stats(paths: &[PathBuf], probe: &impl Probe) -> (Vec<MediaNode>, ScanStats) {
    let start = Instant::now();
    let mut stats = ScanStats::default();
    let mut roots = Vec::new();

    for root in paths {
        if !root.exists() {
            tracing::warn!("Scan path does not exist, skipping: {}", root.display());
            continue;
        }
        if root.is_dir() {
            roots.push(MediaNode::Directory(scan_directory(root, probe, &mut stats)));
        } else if is_video(root) {
            roots.push(MediaNode::File(probe_file(root, probe, &mut stats)));
        } else {
            tracing::warn!("Not a directory or video file, skipping: {}", root.display());
            stats.skipped += 1;
        }
    }

    tracing::info!(
        "Scanned {} videos ({} without stream info) in {} directories in {:.1}s",
        stats.videos,
        stats.unprobed,
        stats.directories,
        start.elapsed().as_secs_f64()
    );

    (roots, stats)
}

/// One walkdir pass over `dir`. Directories are kept on a stack while
/// their entries are visited and attached to their parent once the walk
/// moves past them.
fn scan_directory(dir: &Path, probe: &impl Probe, stats: &mut ScanStats) -> Directory {
    stats.directories += 1;
    let mut stack = vec![Directory {
        path: dir.to_path_buf(),
        contents: Vec::new(),
    }];

    let entries = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // unreadable entries, broken symlinks and symlink loops
                tracing::warn!("Cannot access entry: {}", e);
                stats.skipped += 1;
                continue;
            }
        };

        // an entry at depth d belongs to stack[d - 1]
        close_to_depth(&mut stack, entry.depth());

        if entry.file_type().is_dir() {
            stats.directories += 1;
            stack.push(Directory {
                path: entry.path().to_path_buf(),
                contents: Vec::new(),
            });
        } else if entry.file_type().is_file() && is_video(entry.path()) {
            let file = probe_file(entry.path(), probe, stats);
            if let Some(parent) = stack.last_mut() {
                parent.contents.push(MediaNode::File(file));
            }
        } else {
            tracing::debug!("not a video, skipping {}", entry.path().display());
            stats.skipped += 1;
        }
    }

    close_to_depth(&mut stack, 1);
    stack.pop().unwrap_or_default()
}

fn close_to_depth(stack: &mut Vec<Directory>, depth: usize) {
    while stack.len() > depth {
        let Some(done) = stack.pop() else {
            return;
        };
        if let Some(parent) = stack.last_mut() {
            parent.contents.push(MediaNode::Directory(done));
        }
    }
}

fn probe_file(path: &Path, probe: &impl Probe, stats: &mut ScanStats) -> MediaFile {
    stats.videos += 1;
    let info = probe.probe(path);
    if info.is_none() {
        stats.unprobed += 1;
    }
    tracing::debug!("probed {}", path.display());
    MediaFile {
        path: path.to_path_buf(),
        probe: info,
    }
}
