//! Scan settings and the per-file run context

use crate::container::RiffHeader;
use crate::detectors::ChannelState;
use crate::format::WaveFormat;
use crate::units::{TimeValue, Volume};
use crate::window::{SampleWindow, MIN_WINDOW_SIZE};
use serde::{Deserialize, Serialize};

/// User-facing scan parameters, before conversion to the sample domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Stop after this much audio; `None` scans the whole data chunk
    pub max_time: Option<TimeValue>,
    /// Leading part of the file excluded from drop and dupe detection
    pub intro_length: TimeValue,
    /// Trailing part of the file excluded from all detectors
    pub outro_length: TimeValue,
    /// Minimum distance of a drop after the last pop on the same channel
    pub pop_drop_dist: TimeValue,
    /// Minimum distance between two dupe runs; defaults to `intro_length`
    pub dupe_dist: Option<TimeValue>,
    pub pop_limit: Volume,
    pub drop_limit: Volume,
    pub dupe_limit: Volume,
    /// Shortest run of identical samples that counts as dupes
    pub min_dupes: u64,
    /// Stop scanning after this many bad areas; `None` never stops
    pub max_bad_areas: Option<u64>,
    /// Frames of history kept for reporting (at least 7)
    pub window_size: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_time: None,
            intro_length: TimeValue::Seconds(5.0),
            outro_length: TimeValue::Seconds(5.0),
            pop_drop_dist: TimeValue::Samples(8),
            dupe_dist: None,
            pop_limit: Volume::Ratio(0.33333),
            drop_limit: Volume::Ratio(0.66666),
            dupe_limit: Volume::Ratio(0.00033),
            min_dupes: 400,
            max_bad_areas: None,
            window_size: MIN_WINDOW_SIZE,
        }
    }
}

/// Settings resolved against a concrete format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Limits {
    pub pop_limit: i64,
    pub drop_limit: i64,
    pub dupe_limit: i64,
    pub max_sample: u64,
    pub intro_length: u64,
    pub outro_length: u64,
    pub pop_drop_dist: u64,
    pub dupe_dist: u64,
    pub min_dupes: u64,
    pub max_bad_areas: u64,
    pub window_size: usize,
}

impl Limits {
    /// Convert every time and volume value exactly once
    pub fn resolve(settings: &ScanSettings, format: &WaveFormat) -> Self {
        let rate = format.sample_rate;
        let max_value = format.max_value();
        let intro_length = settings.intro_length.to_samples(rate);

        Self {
            pop_limit: settings.pop_limit.to_absolute(max_value),
            drop_limit: settings.drop_limit.to_absolute(max_value),
            dupe_limit: settings.dupe_limit.to_absolute(max_value),
            max_sample: settings
                .max_time
                .map_or(u64::MAX, |time| time.to_samples(rate)),
            intro_length,
            outro_length: settings.outro_length.to_samples(rate),
            pop_drop_dist: settings.pop_drop_dist.to_samples(rate),
            dupe_dist: settings
                .dupe_dist
                .map_or(intro_length, |time| time.to_samples(rate)),
            min_dupes: settings.min_dupes,
            max_bad_areas: settings.max_bad_areas.unwrap_or(u64::MAX),
            window_size: settings.window_size.max(MIN_WINDOW_SIZE),
        }
    }
}

/// Everything known about the file being scanned
///
/// Created when the scan starts, filled in while the header is parsed and
/// mutated only by the scan loop. Reporters get shared access.
#[derive(Debug)]
pub struct RunContext<'a> {
    filename: &'a str,
    pub(crate) header: Option<RiffHeader>,
    pub(crate) format: Option<WaveFormat>,
    pub(crate) limits: Limits,
    pub(crate) window: SampleWindow,
    pub(crate) channels: Vec<ChannelState>,
    pub(crate) data_size: Option<u32>,
    pub(crate) frames: u64,
    pub(crate) current_sample: u64,
    pub(crate) bad_areas: u64,
    pub(crate) stopped_early: bool,
}

impl<'a> RunContext<'a> {
    pub fn new(filename: &'a str) -> Self {
        Self {
            filename,
            header: None,
            format: None,
            limits: Limits::default(),
            window: SampleWindow::default(),
            channels: Vec::new(),
            data_size: None,
            frames: 0,
            current_sample: 0,
            bad_areas: 0,
            stopped_early: false,
        }
    }

    pub fn filename(&self) -> &str {
        self.filename
    }

    /// RIFF and fmt sizes, once the header was read
    pub fn header(&self) -> Option<&RiffHeader> {
        self.header.as_ref()
    }

    /// Format descriptor, once the fmt chunk was read
    pub fn format(&self) -> Option<&WaveFormat> {
        self.format.as_ref()
    }

    /// Resolved thresholds and bounds
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Decoded history; offset 0 is [`current_sample`](Self::current_sample)
    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub fn channel_state(&self, channel: u16) -> Option<&ChannelState> {
        self.channels.get(usize::from(channel))
    }

    pub fn last_pop(&self, channel: u16) -> Option<u64> {
        self.channel_state(channel).and_then(|state| state.last_pop)
    }

    pub fn last_dupe(&self, channel: u16) -> Option<u64> {
        self.channel_state(channel).and_then(|state| state.last_dupe)
    }

    /// Declared byte length of the data chunk
    pub fn data_size(&self) -> Option<u32> {
        self.data_size
    }

    /// Whole frames in the data chunk
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Index of the newest decoded frame
    pub fn current_sample(&self) -> u64 {
        self.current_sample
    }

    pub fn bad_areas(&self) -> u64 {
        self.bad_areas
    }

    /// Whether scanning stopped at `max_bad_areas`
    pub fn stopped_early(&self) -> bool {
        self.stopped_early
    }
}
