//! Plain-text reporter
//!
//! Scan results go to `out`, errors and warnings to `err`:
//!
//! ```text
//! File: track01.wav
//! [RIFF WAVE] 42336036 bytes
//! ...
//! pop: sample = 300412, time = 6812.063 ms, channel = 1, samples[300408 ... 300414] = {0, 0, 0, 0, 14210, 0, 0}
//! done: 1 bad area found
//! ```
use ripcheck_core::{ErrorKind, Reporter, RunContext};
use std::fmt;
use std::io::{self, Write};

pub struct TextReporter<W: Write, E: Write> {
    out: W,
    err: E,
    /// First write failure; later output is still attempted
    write_error: Option<io::Error>,
}

impl TextReporter<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<W: Write, E: Write> TextReporter<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self {
            out,
            err,
            write_error: None,
        }
    }

    /// Take the first write failure, if any
    pub fn take_write_error(&mut self) -> Option<io::Error> {
        self.write_error.take()
    }

    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    pub(crate) fn print(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = self.out.write_fmt(args) {
            self.write_error.get_or_insert(err);
        }
    }

    fn eprint(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = self.err.write_fmt(args) {
            self.write_error.get_or_insert(err);
        }
    }

    /// One event line with the window contents for `channel`
    fn print_event(
        &mut self,
        ctx: &RunContext<'_>,
        what: &str,
        channel: u16,
        first: u64,
        last: u64,
    ) {
        let sample_rate = ctx.format().map_or(0, |format| format.sample_rate);
        let location = if first == last {
            format!(
                "sample = {}, time = {:.3} ms",
                first,
                millis(first, sample_rate)
            )
        } else {
            format!(
                "samples = {} ... {} ({} samples, time = {:.3} ms ... {:.3} ms)",
                first,
                last,
                last - first + 1,
                millis(first, sample_rate),
                millis(last, sample_rate)
            )
        };

        let window = ctx.window();
        let newest = ctx.current_sample();
        let held = (window.size() as u64).min(newest + 1);
        let values: Vec<String> = window
            .history(usize::from(channel), held as usize)
            .map(|value| value.to_string())
            .collect();

        self.print(format_args!(
            "{}: {}, channel = {}, samples[{} ... {}] = {{{}}}\n",
            what,
            location,
            channel,
            newest + 1 - held,
            newest,
            values.join(", ")
        ));
    }
}

fn millis(sample: u64, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        0.0
    } else {
        1000.0 * sample as f64 / f64::from(sample_rate)
    }
}

impl<W: Write, E: Write> Reporter for TextReporter<W, E> {
    fn begin(&mut self, ctx: &RunContext<'_>) {
        self.print(format_args!("File: {}\n", ctx.filename()));
        if let Some(header) = ctx.header() {
            self.print(format_args!("[RIFF WAVE] {} bytes\n", header.riff_size));
            self.print(format_args!("[fmt ] {} bytes\n", header.fmt_size));
        }
        if let Some(format) = ctx.format().copied() {
            self.print(format_args!(
                "  Audio format = {} (1 = PCM)\n",
                format.audio_format
            ));
            self.print(format_args!(
                "  Number of channels = {} (1 = mono, 2 = stereo)\n",
                format.channels
            ));
            self.print(format_args!("  Sample rate = {}Hz\n", format.sample_rate));
            self.print(format_args!("  Bytes / second = {}\n", format.byte_rate));
            self.print(format_args!("  Block alignment = {}\n", format.block_align));
            self.print(format_args!("  Bits / sample = {}\n", format.bits_per_sample));
        }
    }

    fn sample_data(&mut self, ctx: &RunContext<'_>, data_size: u32) {
        let byte_rate = ctx.format().map_or(0, |format| format.byte_rate);
        let duration = if byte_rate == 0 {
            0.0
        } else {
            f64::from(data_size) / f64::from(byte_rate)
        };
        self.print(format_args!("[data] {} bytes\n", data_size));
        self.print(format_args!("  Duration = {:.3} sec\n", duration));
    }

    fn possible_pop(&mut self, ctx: &RunContext<'_>, channel: u16, sample: u64) {
        self.print_event(ctx, "pop", channel, sample, sample);
    }

    fn possible_drop(
        &mut self,
        ctx: &RunContext<'_>,
        channel: u16,
        _sample: u64,
        dropped_sample: u64,
    ) {
        self.print_event(ctx, "drop", channel, dropped_sample, dropped_sample);
    }

    fn dupes(&mut self, ctx: &RunContext<'_>, channel: u16, sample: u64, run_length: u64) {
        let last = sample + run_length.saturating_sub(1);
        self.print_event(ctx, "dupes", channel, sample, last);
    }

    fn complete(&mut self, ctx: &RunContext<'_>) {
        match ctx.bad_areas() {
            0 => self.print(format_args!("done: all ok\n")),
            1 => self.print(format_args!("done: 1 bad area found\n")),
            n => self.print(format_args!("done: {} bad areas found\n", n)),
        }
    }

    fn error(&mut self, ctx: &RunContext<'_>, _kind: ErrorKind, message: &str) {
        self.eprint(format_args!("error: {}: {}\n", ctx.filename(), message));
    }

    fn warning(&mut self, ctx: &RunContext<'_>, message: &str) {
        self.eprint(format_args!("warning: {}: {}\n", ctx.filename(), message));
    }
}
