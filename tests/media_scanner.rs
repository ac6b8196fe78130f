use std::fs;
use std::path::{Path, PathBuf};

use mediacat::catalog::node::{FormatInfo, MediaNode, ProbeInfo, StreamDescriptor, VideoStream};
use mediacat::probe::ffprobe::Ffprobe;
use mediacat::probe::scanner::{scan, scan_with_stats};
use mediacat::probe::is_video;

fn no_probe(_: &Path) -> Option<ProbeInfo> {
    None
}

fn fake_probe(path: &Path) -> Option<ProbeInfo> {
    // pretend every .mkv is hevc and everything else fails to probe
    if path.extension()? != "mkv" {
        return None;
    }
    Some(ProbeInfo {
        streams: vec![StreamDescriptor::Video(VideoStream {
            codec_name: "hevc".to_string(),
            width: Some(3840),
            height: Some(2160),
        })],
        format: FormatInfo::default(),
    })
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

fn names(nodes: &[MediaNode]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| n.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn scan_nonexistent_path_returns_empty_tree() {
    let paths = vec![PathBuf::from("/nonexistent/path/does/not/exist")];
    assert!(scan(&paths, &no_probe).is_empty());
}

#[test]
fn scan_empty_paths_returns_empty_tree() {
    let paths: Vec<PathBuf> = vec![];
    assert!(scan(&paths, &no_probe).is_empty());
}

#[test]
fn scan_builds_nested_tree_of_videos() {
    let root = tempfile::tempdir().unwrap();
    touch(&root.path().join("b.mp4"));
    touch(&root.path().join("a.MKV"));
    touch(&root.path().join("notes.txt"));
    touch(&root.path().join("season1/ep2.mkv"));
    touch(&root.path().join("season1/ep1.mkv"));
    touch(&root.path().join("season1/extras/cover.jpg"));
    fs::create_dir_all(root.path().join("empty")).unwrap();

    let (nodes, stats) = scan_with_stats(&[root.path().to_path_buf()], &fake_probe);
    assert_eq!(nodes.len(), 1);

    let MediaNode::Directory(top) = &nodes[0] else {
        panic!("root should be a directory");
    };
    assert_eq!(top.path, root.path());
    assert_eq!(names(&top.contents), vec!["a.MKV", "b.mp4", "empty", "season1"]);

    let MediaNode::Directory(season) = &top.contents[3] else {
        panic!("season1 should be a directory");
    };
    assert_eq!(names(&season.contents), vec!["ep1.mkv", "ep2.mkv", "extras"]);
    assert_eq!(season.contents[0].path(), root.path().join("season1/ep1.mkv"));

    assert_eq!(nodes[0].file_count(), 4);
    assert_eq!(stats.videos, 4);
    assert_eq!(stats.directories, 4);
    assert_eq!(stats.skipped, 2);
}

#[test]
fn unprobed_videos_are_kept_without_info() {
    let root = tempfile::tempdir().unwrap();
    touch(&root.path().join("ok.mkv"));
    touch(&root.path().join("broken.avi"));

    let (nodes, stats) = scan_with_stats(&[root.path().to_path_buf()], &fake_probe);
    let MediaNode::Directory(top) = &nodes[0] else {
        panic!("root should be a directory");
    };
    let probed: Vec<bool> = top
        .contents
        .iter()
        .map(|n| match n {
            MediaNode::File(f) => f.probe.is_some(),
            MediaNode::Directory(_) => panic!("unexpected directory"),
        })
        .collect();
    assert_eq!(names(&top.contents), vec!["broken.avi", "ok.mkv"]);
    assert_eq!(probed, vec![false, true]);
    assert_eq!(stats.unprobed, 1);
}

#[test]
fn video_file_root_becomes_file_node() {
    let root = tempfile::tempdir().unwrap();
    let video = root.path().join("single.mkv");
    let text = root.path().join("readme.txt");
    touch(&video);
    touch(&text);

    let nodes = scan(&[video.clone(), text], &fake_probe);
    assert_eq!(nodes.len(), 1);
    match &nodes[0] {
        MediaNode::File(file) => {
            assert_eq!(file.path, video);
            assert!(file.probe.is_some());
        }
        MediaNode::Directory(_) => panic!("expected a file node"),
    }
}

#[test]
fn video_extensions_are_case_insensitive() {
    for name in ["a.mp4", "b.MKV", "c.Avi", "d.mov", "e.wmv", "f.mpg", "g.MPEG"] {
        assert!(is_video(Path::new(name)), "{name}");
    }
    for name in ["a.txt", "b.jpg", "Makefile", "c.mp3"] {
        assert!(!is_video(Path::new(name)), "{name}");
    }
}

#[test]
fn missing_ffprobe_binary_fails_check() {
    let ffprobe = Ffprobe::new("/nonexistent/bin/ffprobe");
    assert!(ffprobe.check().is_err());
    assert!(ffprobe.run(Path::new("/nonexistent/video.mkv")).is_err());
}
