use std::path::PathBuf;

use clap::Parser;

use crate::data::model::{FilterSpec, DEFAULT_YEAR_RANGE};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Track table to load at start (.csv, .json or .parquet)
    #[arg(env = "SPOTIFY_DASHBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// Initial artist selection (default: all artists)
    #[arg(long)]
    pub artist: Option<String>,

    /// Initial playlist selection (default: all playlists)
    #[arg(long)]
    pub playlist: Option<String>,

    /// First release year of the initial range
    #[arg(long, default_value_t = DEFAULT_YEAR_RANGE.0)]
    pub year_min: i32,

    /// Last release year of the initial range
    #[arg(long, default_value_t = DEFAULT_YEAR_RANGE.1)]
    pub year_max: i32,

    /// Print the dashboard tables as JSON instead of opening a window
    #[arg(long, requires = "data")]
    pub report: bool,
}

impl Args {
    /// The selection requested on the command line.
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            artist: self.artist.clone(),
            playlist: self.playlist.clone(),
            year_min: self.year_min,
            year_max: self.year_max,
        }
    }
}
