//! Pop, drop and dupe detection
//!
//! All three detectors run once per channel for every decoded frame and only
//! look back from the newest sample. Their per-channel memory lives in
//! [`ChannelState`], which reporters can read through the run context.
//!
//! Sample indices are frame indices from the start of the data chunk.

use crate::context::Limits;
use crate::window::SampleWindow;
use serde::Serialize;
use std::fmt;

/// Per-channel detector memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ChannelState {
    /// Location of the last reported pop
    pub last_pop: Option<u64>,
    /// First sample of the last reported dupe run
    pub last_dupe: Option<u64>,
    /// Length of the run of identical values ending at the previous sample
    pub run_length: u64,
}

/// The newest seven values of one channel, `x[0]` being the newest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Taps([i64; 7]);

impl Taps {
    pub fn new(window: &SampleWindow, channel: usize) -> Self {
        let mut taps = [0i64; 7];
        for (offset, tap) in taps.iter_mut().enumerate() {
            *tap = i64::from(window.get(offset, channel));
        }
        Self(taps)
    }

    /// Value `offset` samples before the newest one
    pub fn x(&self, offset: usize) -> i64 {
        self.0[offset]
    }
}

impl From<[i64; 7]> for Taps {
    fn from(taps: [i64; 7]) -> Self {
        Self(taps)
    }
}

/// What kind of defect an event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Pop,
    Drop,
    Dupes,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pop => "pop",
            Self::Drop => "drop",
            Self::Dupes => "dupes",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected defect, handed once to the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Event {
    /// Isolated spike after silence, at `sample`
    Pop { channel: u16, sample: u64 },
    /// Zero sample `dropped` between two loud same-signed samples;
    /// `sample` is the newest sample at detection time
    Drop {
        channel: u16,
        sample: u64,
        dropped: u64,
    },
    /// Run of `run_length` identical samples starting at `first`
    Dupes {
        channel: u16,
        first: u64,
        run_length: u64,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Pop { .. } => EventKind::Pop,
            Self::Drop { .. } => EventKind::Drop,
            Self::Dupes { .. } => EventKind::Dupes,
        }
    }

    pub fn channel(&self) -> u16 {
        match *self {
            Self::Pop { channel, .. } | Self::Drop { channel, .. } | Self::Dupes { channel, .. } => {
                channel
            }
        }
    }

    /// First and last affected sample, inclusive
    pub fn span(&self) -> (u64, u64) {
        match *self {
            Self::Pop { sample, .. } => (sample, sample),
            Self::Drop { dropped, .. } => (dropped, dropped),
            Self::Dupes {
                first, run_length, ..
            } => (first, first + run_length - 1),
        }
    }
}

/// Resolved thresholds and bounds for one data chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detectors {
    pop_limit: i64,
    drop_limit: i64,
    dupe_limit: i64,
    pop_drop_dist: u64,
    dupe_dist: u64,
    min_dupes: u64,
    intro_end: u64,
    outro_start: u64,
}

impl Detectors {
    /// Bounds for a data chunk of `frames` whole frames
    pub fn new(limits: &Limits, frames: u64) -> Self {
        Self {
            pop_limit: limits.pop_limit,
            drop_limit: limits.drop_limit,
            dupe_limit: limits.dupe_limit,
            pop_drop_dist: limits.pop_drop_dist,
            dupe_dist: limits.dupe_dist,
            min_dupes: limits.min_dupes,
            intro_end: limits.intro_length,
            outro_start: frames.saturating_sub(limits.outro_length),
        }
    }

    /// First sample of the outro exclusion zone
    pub fn outro_start(&self) -> u64 {
        self.outro_start
    }

    /// Whether `sample` lies between the intro and the outro
    pub fn in_analysis_window(&self, sample: u64) -> bool {
        sample >= self.intro_end && sample < self.outro_start
    }

    /// Spike two samples back, with four silent samples before it
    pub fn check_pop(
        &self,
        taps: &Taps,
        state: &mut ChannelState,
        channel: u16,
        sample: u64,
    ) -> Option<Event> {
        let silent_before = (3..=6).all(|offset| taps.x(offset) == 0);
        if !silent_before || taps.x(2).abs() <= self.pop_limit {
            return None;
        }
        if sample <= 4 || sample >= self.outro_start {
            return None;
        }

        let location = sample - 2;
        state.last_pop = Some(location);
        Some(Event::Pop {
            channel,
            sample: location,
        })
    }

    /// Zero sample between two loud samples of the same sign
    pub fn check_drop(
        &self,
        taps: &Taps,
        state: &ChannelState,
        channel: u16,
        sample: u64,
    ) -> Option<Event> {
        let (x0, x1, x2) = (taps.x(0), taps.x(1), taps.x(2));
        let limit = self.drop_limit;
        if x1 != 0 || !((x2 > limit && x0 > limit) || (x2 < -limit && x0 < -limit)) {
            return None;
        }

        let dropped = sample.checked_sub(1)?;
        let clear_of_pop = match state.last_pop {
            Some(pop) => dropped > pop.saturating_add(self.pop_drop_dist),
            None => true,
        };
        if !clear_of_pop || !self.in_analysis_window(dropped) {
            return None;
        }

        Some(Event::Drop {
            channel,
            sample,
            dropped,
        })
    }

    /// Track runs of identical values; report a run when it breaks
    ///
    /// The run length counts every identical sample, including the first one.
    pub fn check_dupes(
        &self,
        taps: &Taps,
        state: &mut ChannelState,
        channel: u16,
        sample: u64,
    ) -> Option<Event> {
        let (x0, x1) = (taps.x(0), taps.x(1));
        if state.run_length > 0 && x0 == x1 {
            state.run_length += 1;
            return None;
        }

        let run_length = state.run_length;
        state.run_length = 1;

        if run_length == 0 || run_length < self.min_dupes || x1.abs() < self.dupe_limit {
            return None;
        }

        let first = sample - run_length;
        let clear_of_last = match state.last_dupe {
            Some(last) => first > last.saturating_add(self.dupe_dist),
            None => true,
        };
        if !clear_of_last || !self.in_analysis_window(first) {
            return None;
        }

        state.last_dupe = Some(first);
        Some(Event::Dupes {
            channel,
            first,
            run_length,
        })
    }
}
