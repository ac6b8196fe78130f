//! Catalog video files with ffprobe, then browse and filter the catalog by
//! codec, channel count and resolution.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod http;
pub mod probe;
