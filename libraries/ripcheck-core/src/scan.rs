//! The per-file scan loop
//!
//! ```text
//! bytes ──► container walk ──► frame decode ──► window ──► detectors ──► reporter
//! ```

use crate::container::RiffHeader;
use crate::context::{Limits, RunContext, ScanSettings};
use crate::decoder::SampleDecoder;
use crate::detectors::{Detectors, Event, Taps};
use crate::error::Result;
use crate::report::Reporter;
use crate::window::SampleWindow;
use std::io::Read;
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

/// Outcome of a successful scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    /// Declared size of the data chunk, if one was found
    pub data_size: Option<u32>,
    /// Frames decoded and evaluated
    pub frames_scanned: u64,
    pub bad_areas: u64,
    /// Scanning stopped because `max_bad_areas` was reached
    pub stopped_early: bool,
}

impl ScanSummary {
    pub fn is_clean(&self) -> bool {
        self.bad_areas == 0
    }
}

/// Scan one WAVE stream, reporting everything to `reporter`
///
/// Fatal errors are passed to [`Reporter::error`] and returned; nothing is
/// shared between calls, so a failure never affects the next file.
pub fn scan<R, P>(
    reader: &mut R,
    filename: &str,
    settings: &ScanSettings,
    reporter: &mut P,
) -> Result<ScanSummary>
where
    R: Read,
    P: Reporter + ?Sized,
{
    let mut ctx = RunContext::new(filename);

    match run(reader, settings, reporter, &mut ctx) {
        Ok(frames_scanned) => {
            info!(
                file = filename,
                frames = frames_scanned,
                bad_areas = ctx.bad_areas,
                "scan complete"
            );
            reporter.complete(&ctx);
            Ok(ScanSummary {
                data_size: ctx.data_size,
                frames_scanned,
                bad_areas: ctx.bad_areas,
                stopped_early: ctx.stopped_early,
            })
        }
        Err(err) => {
            warn!(file = filename, error = %err, "scan aborted");
            reporter.error(&ctx, err.kind(), &err.to_string());
            Err(err)
        }
    }
}

fn run<R, P>(
    reader: &mut R,
    settings: &ScanSettings,
    reporter: &mut P,
    ctx: &mut RunContext<'_>,
) -> Result<u64>
where
    R: Read,
    P: Reporter + ?Sized,
{
    let header = RiffHeader::read(reader)?;
    ctx.header = Some(header);

    let format = header.read_format(reader)?;
    ctx.format = Some(format);
    ctx.limits = Limits::resolve(settings, &format);
    debug!(?format, limits = ?ctx.limits, "header parsed");

    reporter.begin(ctx);
    format.validate()?;

    let channels = usize::from(format.channels);
    ctx.window = SampleWindow::new(channels, ctx.limits.window_size)?;
    ctx.channels = allocate(channels)?;
    let mut frame = allocate::<u8>(usize::from(format.block_align))?;

    let Some(data_size) = header.chunks().find_data(reader)? else {
        debug!("no data chunk before end of RIFF body");
        return Ok(0);
    };

    scan_data(reader, data_size, &mut frame, reporter, ctx)
}

fn scan_data<R, P>(
    reader: &mut R,
    data_size: u32,
    frame: &mut [u8],
    reporter: &mut P,
    ctx: &mut RunContext<'_>,
) -> Result<u64>
where
    R: Read,
    P: Reporter + ?Sized,
{
    let Some(format) = ctx.format else {
        return Ok(0);
    };
    let block_align = u32::from(format.block_align);
    let frames = u64::from(data_size / block_align);

    ctx.data_size = Some(data_size);
    ctx.frames = frames;
    info!(data_size, frames, "scanning data chunk");
    reporter.sample_data(ctx, data_size);

    if data_size % block_align != 0 {
        let message = format!(
            "The size of the 'data' chunk ({}) is not a multiple of the block alignment ({}).",
            data_size, block_align
        );
        warn!("{}", message);
        reporter.warning(ctx, &message);
    }

    let detectors = Detectors::new(&ctx.limits, frames);
    let decoder = SampleDecoder::new(&format);
    let max_sample = ctx.limits.max_sample.min(frames);

    for sample in 0..max_sample {
        reader.read_exact(frame)?;
        ctx.current_sample = sample;
        decoder.decode_frame(frame, ctx.window.advance());

        for channel in 0..format.channels {
            if evaluate(&detectors, channel, sample, reporter, ctx).is_break() {
                warn!(
                    bad_areas = ctx.bad_areas,
                    sample, "maximum number of bad areas reached, stopping"
                );
                ctx.stopped_early = true;
                return Ok(sample + 1);
            }
        }
    }

    Ok(max_sample)
}

/// Run all detectors for one channel of the newest frame
fn evaluate<P: Reporter + ?Sized>(
    detectors: &Detectors,
    channel: u16,
    sample: u64,
    reporter: &mut P,
    ctx: &mut RunContext<'_>,
) -> ControlFlow<()> {
    let index = usize::from(channel);
    let taps = Taps::new(&ctx.window, index);

    if let Some(event) = detectors.check_pop(&taps, &mut ctx.channels[index], channel, sample) {
        record(event, reporter, ctx)?;
    }
    if let Some(event) = detectors.check_drop(&taps, &ctx.channels[index], channel, sample) {
        record(event, reporter, ctx)?;
    }
    if let Some(event) = detectors.check_dupes(&taps, &mut ctx.channels[index], channel, sample) {
        record(event, reporter, ctx)?;
    }
    ControlFlow::Continue(())
}

fn record<P: Reporter + ?Sized>(
    event: Event,
    reporter: &mut P,
    ctx: &mut RunContext<'_>,
) -> ControlFlow<()> {
    ctx.bad_areas += 1;
    debug!(kind = %event.kind(), channel = event.channel(), span = ?event.span(), "bad area");
    event.dispatch(reporter, ctx);

    if ctx.bad_areas >= ctx.limits.max_bad_areas {
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}

fn allocate<T: Default + Clone>(len: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len)?;
    buffer.resize(len, T::default());
    Ok(buffer)
}
