//! Command-line arguments
use crate::image::ImageOptions;
use crate::template::FilenameTemplate;
use clap::Parser;
use ripcheck_core::{ScanSettings, TimeValue, Volume};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ripcheck", version)]
#[command(about = "Find potential ripping errors in WAVE files", long_about = None)]
#[command(after_help = "TIME values take an optional unit: samples (default), ms or s.\n\
VOLUME values are a percentage (33%), a fraction (0.33) or an absolute sample value (12000).")]
pub struct Cli {
    /// Analyze at most this much audio
    #[arg(short = 't', long, value_name = "TIME")]
    pub max_time: Option<TimeValue>,

    /// Stop after this many bad areas
    #[arg(short = 'b', long, value_name = "COUNT")]
    pub max_bad_areas: Option<u64>,

    /// Ignore drops and dupes at the start [default: 5s]
    #[arg(short = 'i', long, value_name = "TIME")]
    pub intro_length: Option<TimeValue>,

    /// Ignore everything at the end [default: 5s]
    #[arg(short = 'o', long, value_name = "TIME")]
    pub outro_length: Option<TimeValue>,

    /// Minimum magnitude of a pop [default: 33.333%]
    #[arg(short = 'p', long, value_name = "VOLUME")]
    pub pop_limit: Option<Volume>,

    /// Minimum magnitude around a dropped sample [default: 66.666%]
    #[arg(short = 'd', long, value_name = "VOLUME")]
    pub drop_limit: Option<Volume>,

    /// Minimum magnitude of a duplicated value [default: 0.033%]
    #[arg(short = 'u', long, value_name = "VOLUME")]
    pub dupe_limit: Option<Volume>,

    /// Ignore drops this close after a pop [default: 8]
    #[arg(short = 'D', long, value_name = "TIME")]
    pub pop_drop_dist: Option<TimeValue>,

    /// Ignore dupe runs this close after the previous one [default: intro length]
    #[arg(long, value_name = "TIME")]
    pub dupe_dist: Option<TimeValue>,

    /// Shortest run of identical samples to report [default: 400]
    #[arg(short = 'm', long, value_name = "COUNT")]
    pub min_dupes: Option<u64>,

    /// Samples of context kept for reports, at least 7
    #[arg(short = 'w', long, value_name = "COUNT")]
    pub window_size: Option<usize>,

    /// Write a PNG of the samples around every bad area
    #[arg(long)]
    pub visualize: bool,

    /// Image size and colors as KEY=VALUE,... (samp-width, samp-height,
    /// bg-color, wave-color, zero-color, error-color, error-bg-color)
    #[arg(long, value_name = "OPTIONS", requires = "visualize")]
    pub image_options: Option<ImageOptions>,

    /// Image file name template
    /// [default: {basename}_sample_{first_error_sample}_channel_{channel}_{errorname}.png]
    #[arg(long, value_name = "TEMPLATE", requires = "visualize")]
    pub image_filename: Option<FilenameTemplate>,

    /// Configuration file [default: ./ripcheck.toml if present]
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// WAVE files to check; standard input is read when none are given
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Image settings when `--visualize` was given
    pub fn image_output(&self) -> Option<(ImageOptions, FilenameTemplate)> {
        self.visualize.then(|| {
            (
                self.image_options.clone().unwrap_or_default(),
                self.image_filename.clone().unwrap_or_default(),
            )
        })
    }

    /// Override `settings` with every flag that was given
    pub fn apply(&self, settings: &mut ScanSettings) {
        if let Some(max_time) = self.max_time {
            settings.max_time = Some(max_time);
        }
        if let Some(max_bad_areas) = self.max_bad_areas {
            settings.max_bad_areas = Some(max_bad_areas);
        }
        if let Some(intro_length) = self.intro_length {
            settings.intro_length = intro_length;
        }
        if let Some(outro_length) = self.outro_length {
            settings.outro_length = outro_length;
        }
        if let Some(pop_limit) = self.pop_limit {
            settings.pop_limit = pop_limit;
        }
        if let Some(drop_limit) = self.drop_limit {
            settings.drop_limit = drop_limit;
        }
        if let Some(dupe_limit) = self.dupe_limit {
            settings.dupe_limit = dupe_limit;
        }
        if let Some(pop_drop_dist) = self.pop_drop_dist {
            settings.pop_drop_dist = pop_drop_dist;
        }
        if let Some(dupe_dist) = self.dupe_dist {
            settings.dupe_dist = Some(dupe_dist);
        }
        if let Some(min_dupes) = self.min_dupes {
            settings.min_dupes = min_dupes;
        }
        if let Some(window_size) = self.window_size {
            settings.window_size = window_size;
        }
    }
}
