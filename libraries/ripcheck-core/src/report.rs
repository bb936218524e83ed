//! Reporting interface between the scan loop and its consumers

use crate::context::RunContext;
use crate::detectors::Event;
use crate::error::ErrorKind;
use crate::format::WaveFormat;

/// Receives everything the scan finds, in stream order
///
/// Implementations get shared access to the run context and can read the
/// format, resolved limits, window and per-channel state from it.
pub trait Reporter {
    /// Header and format chunk were read
    fn begin(&mut self, ctx: &RunContext<'_>) {
        let _ = ctx;
    }

    /// The data chunk was found; `data_size` is its declared byte length
    fn sample_data(&mut self, ctx: &RunContext<'_>, data_size: u32) {
        let _ = (ctx, data_size);
    }

    /// Possible pop at `sample`
    fn possible_pop(&mut self, ctx: &RunContext<'_>, channel: u16, sample: u64);

    /// Possible dropped sample `dropped_sample`, detected at `sample`
    fn possible_drop(
        &mut self,
        ctx: &RunContext<'_>,
        channel: u16,
        sample: u64,
        dropped_sample: u64,
    );

    /// Run of `run_length` identical samples starting at `sample`
    fn dupes(&mut self, ctx: &RunContext<'_>, channel: u16, sample: u64, run_length: u64);

    /// The scan finished without a fatal error
    fn complete(&mut self, ctx: &RunContext<'_>) {
        let _ = ctx;
    }

    /// The scan of this file was aborted
    fn error(&mut self, ctx: &RunContext<'_>, kind: ErrorKind, message: &str);

    /// Something is off but scanning continues
    fn warning(&mut self, ctx: &RunContext<'_>, message: &str) {
        let _ = (ctx, message);
    }
}

impl Event {
    /// Route this event to the matching reporter callback
    pub fn dispatch<P: Reporter + ?Sized>(&self, reporter: &mut P, ctx: &RunContext<'_>) {
        match *self {
            Self::Pop { channel, sample } => reporter.possible_pop(ctx, channel, sample),
            Self::Drop {
                channel,
                sample,
                dropped,
            } => reporter.possible_drop(ctx, channel, sample, dropped),
            Self::Dupes {
                channel,
                first,
                run_length,
            } => reporter.dupes(ctx, channel, first, run_length),
        }
    }
}

/// One callback as seen by [`RecordingReporter`]
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Begin { format: Option<WaveFormat> },
    SampleData { data_size: u32 },
    Event(Event),
    Complete { bad_areas: u64 },
    Error { kind: ErrorKind, message: String },
    Warning(String),
}

/// Reporter that keeps every callback in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    pub records: Vec<Recorded>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.records
            .iter()
            .filter_map(|record| match record {
                Recorded::Event(event) => Some(*event),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|record| match record {
                Recorded::Warning(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<(ErrorKind, &str)> {
        self.records
            .iter()
            .filter_map(|record| match record {
                Recorded::Error { kind, message } => Some((*kind, message.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn completed(&self) -> bool {
        self.records
            .iter()
            .any(|record| matches!(record, Recorded::Complete { .. }))
    }
}

impl Reporter for RecordingReporter {
    fn begin(&mut self, ctx: &RunContext<'_>) {
        self.records.push(Recorded::Begin {
            format: ctx.format().copied(),
        });
    }

    fn sample_data(&mut self, _ctx: &RunContext<'_>, data_size: u32) {
        self.records.push(Recorded::SampleData { data_size });
    }

    fn possible_pop(&mut self, _ctx: &RunContext<'_>, channel: u16, sample: u64) {
        self.records
            .push(Recorded::Event(Event::Pop { channel, sample }));
    }

    fn possible_drop(
        &mut self,
        _ctx: &RunContext<'_>,
        channel: u16,
        sample: u64,
        dropped_sample: u64,
    ) {
        self.records.push(Recorded::Event(Event::Drop {
            channel,
            sample,
            dropped: dropped_sample,
        }));
    }

    fn dupes(&mut self, _ctx: &RunContext<'_>, channel: u16, sample: u64, run_length: u64) {
        self.records.push(Recorded::Event(Event::Dupes {
            channel,
            first: sample,
            run_length,
        }));
    }

    fn complete(&mut self, ctx: &RunContext<'_>) {
        self.records.push(Recorded::Complete {
            bad_areas: ctx.bad_areas(),
        });
    }

    fn error(&mut self, _ctx: &RunContext<'_>, kind: ErrorKind, message: &str) {
        self.records.push(Recorded::Error {
            kind,
            message: message.to_string(),
        });
    }

    fn warning(&mut self, _ctx: &RunContext<'_>, message: &str) {
        self.records.push(Recorded::Warning(message.to_string()));
    }
}
