use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::FilterCriteria;

#[derive(Parser, Debug)]
#[command(
    name = "mediacat",
    about = "Catalog video files with ffprobe, then browse and filter the catalog",
    long_about = None,
    version,
    arg_required_else_help = true,
)]
pub struct Args {
    /// Path to TOML config file (overrides default search: ./mediacat.toml, ~/.config/mediacat/config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Probe every video under the given paths and write the media document
    Scan {
        /// Directories (or single video files) to catalog
        #[arg(num_args = 1.., required = true)]
        paths: Vec<PathBuf>,

        /// Where to write the document [default: media_info.json]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// ffprobe executable to use [default: ffprobe on PATH]
        #[arg(long, value_name = "BIN")]
        ffprobe: Option<PathBuf>,
    },

    /// Serve the document, its filter options and filtered views over HTTP
    Serve {
        /// Media document to serve [default: media_info.json]
        document: Option<PathBuf>,

        /// HTTP port to listen on [default: 8300]
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind to localhost only (127.0.0.1) instead of all interfaces
        #[arg(long)]
        localhost: bool,
    },

    /// Print the document filtered by the given criteria
    Filter {
        /// Media document to filter [default: media_info.json]
        document: Option<PathBuf>,

        #[command(flatten)]
        criteria: CriteriaArgs,
    },

    /// List the values available for each filter
    Options {
        /// Media document to inspect [default: media_info.json]
        document: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct CriteriaArgs {
    /// Substring of the video codec name (case-insensitive)
    #[arg(long)]
    pub video_codec: Option<String>,

    /// Substring of any audio codec name (case-insensitive)
    #[arg(long)]
    pub audio_codec: Option<String>,

    /// Channel count of any audio stream
    #[arg(long)]
    pub audio_channels: Option<String>,

    /// Video resolution as WIDTHxHEIGHT
    #[arg(long, value_name = "WxH")]
    pub video_resolution: Option<String>,
}

impl From<CriteriaArgs> for FilterCriteria {
    fn from(args: CriteriaArgs) -> Self {
        FilterCriteria {
            video_codec: args.video_codec,
            audio_codec: args.audio_codec,
            audio_channels: args.audio_channels,
            video_resolution: args.video_resolution,
        }
    }
}
