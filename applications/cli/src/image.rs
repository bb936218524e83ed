//! PNG snapshots of the samples around each bad area
//!
//! [`ImageReporter`] prints everything [`TextReporter`] prints and additionally
//! renders the window of the affected channel to a PNG per event. Each shown
//! sample is a bar of `samp-width` pixels growing up or down from a zero line;
//! the bad samples get the error colors.
//!
//! ```text
//! --image-options samp-width=20,samp-height=100,bg-color=white,wave-color=#0000FF,
//!                 zero-color=gray,error-color=red,error-bg-color=#FFFF50
//! ```
use crate::template::{FilenameTemplate, Snapshot};
use crate::text::TextReporter;
use ripcheck_core::{ErrorKind, Reporter, RunContext};
use std::collections::TryReserveError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image of {width}x{height} pixels is too large")]
    TooLarge { width: u64, height: u64 },

    #[error("out of memory: {0}")]
    Alloc(#[from] TryReserveError),

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageOptionError {
    #[error("no image options given")]
    Empty,

    #[error("expected KEY=VALUE but found '{0}'")]
    MissingValue(String),

    #[error("unknown image option '{0}'")]
    UnknownKey(String),

    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidDimension { key: String, value: String },

    #[error("{key} must be #RRGGBB or a color name, got '{value}'")]
    InvalidColor { key: String, value: String },
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Self([(value >> 16) as u8, (value >> 8) as u8, value as u8])
    }
}

const NAMED_COLORS: [(&str, u32); 16] = [
    ("black", 0x000000),
    ("silver", 0xC0C0C0),
    ("gray", 0x808080),
    ("white", 0xFFFFFF),
    ("maroon", 0x800000),
    ("red", 0xFF0000),
    ("purple", 0x800080),
    ("fuchsia", 0xFF00FF),
    ("green", 0x008000),
    ("lime", 0x00FF00),
    ("olive", 0x808000),
    ("yellow", 0xFFFF00),
    ("navy", 0x000080),
    ("blue", 0x0000FF),
    ("teal", 0x008080),
    ("aqua", 0x00FFFF),
];

impl FromStr for Rgb {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(());
            }
            return u32::from_str_radix(hex, 16).map(Self::hex).map_err(|_| ());
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, value)| Self::hex(*value))
            .ok_or(())
    }
}

/// Size and colors of rendered snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    /// Pixels per sample horizontally
    pub sample_width: u32,
    /// Pixels from the zero line to full scale
    pub sample_height: u32,
    pub bg_color: Rgb,
    pub wave_color: Rgb,
    pub zero_color: Rgb,
    pub error_color: Rgb,
    pub error_bg_color: Rgb,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            sample_width: 20,
            sample_height: 50,
            bg_color: Rgb::hex(0xFFFFFF),
            wave_color: Rgb::hex(0x0000FF),
            zero_color: Rgb::hex(0x808080),
            error_color: Rgb::hex(0xFF0000),
            error_bg_color: Rgb::hex(0xFFFF50),
        }
    }
}

impl ImageOptions {
    /// Override options from a `KEY=VALUE[,KEY=VALUE]*` list
    pub fn apply(&mut self, spec: &str) -> Result<(), ImageOptionError> {
        if spec.trim().is_empty() {
            return Err(ImageOptionError::Empty);
        }

        for item in spec.split(',') {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| ImageOptionError::MissingValue(item.to_string()))?;
            let key = key.trim().to_ascii_lowercase();

            match key.as_str() {
                "samp-width" => self.sample_width = parse_dimension(&key, value)?,
                "samp-height" => self.sample_height = parse_dimension(&key, value)?,
                "bg-color" => self.bg_color = parse_color(&key, value)?,
                "wave-color" => self.wave_color = parse_color(&key, value)?,
                "zero-color" => self.zero_color = parse_color(&key, value)?,
                "error-color" => self.error_color = parse_color(&key, value)?,
                "error-bg-color" => self.error_bg_color = parse_color(&key, value)?,
                _ => return Err(ImageOptionError::UnknownKey(key)),
            }
        }
        Ok(())
    }
}

impl FromStr for ImageOptions {
    type Err = ImageOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut options = Self::default();
        options.apply(s)?;
        Ok(options)
    }
}

fn parse_dimension(key: &str, value: &str) -> Result<u32, ImageOptionError> {
    match value.trim().parse::<u32>() {
        Ok(dimension) if dimension > 0 => Ok(dimension),
        _ => Err(ImageOptionError::InvalidDimension {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_color(key: &str, value: &str) -> Result<Rgb, ImageOptionError> {
    value.parse().map_err(|()| ImageOptionError::InvalidColor {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// RGB pixel buffer, rows top to bottom
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Result<Self, ImageError> {
        let too_large = || ImageError::TooLarge {
            width: u64::from(width),
            height: u64::from(height),
        };
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or_else(too_large)?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len)?;
        for _ in 0..len / 3 {
            pixels.extend_from_slice(&background.0);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let i = self.index(x, y);
        Rgb([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Fill the inclusive rectangle, clipped to the canvas
    pub fn fill_rect(&mut self, x1: u32, y1: u32, x2: u32, y2: u32, color: Rgb) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let x2 = x2.min(self.width - 1);
        let y2 = y2.min(self.height - 1);
        for y in y1..=y2 {
            for x in x1..=x2 {
                let i = self.index(x, y);
                self.pixels[i..i + 3].copy_from_slice(&color.0);
            }
        }
    }

    pub fn write_png(&self, path: &Path) -> Result<(), ImageError> {
        let file = BufWriter::new(File::create(path)?);
        let mut encoder = png::Encoder::new(file, self.width, self.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        writer.finish()?;
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }
}

/// Samples of the window currently held for reporting: `(first, count)`
fn shown_samples(ctx: &RunContext<'_>) -> (u64, u64) {
    let newest = ctx.current_sample();
    let count = (ctx.window().size() as u64).min(newest + 1);
    (newest + 1 - count, count)
}

/// Draw one channel of the window, highlighting `first_error..=last_error`
pub fn render(
    ctx: &RunContext<'_>,
    options: &ImageOptions,
    channel: u16,
    first_error: u64,
    last_error: u64,
) -> Result<Canvas, ImageError> {
    let (first_shown, count) = shown_samples(ctx);
    let bar = options.sample_height;
    let width = u64::from(options.sample_width) * count;
    let height = u64::from(bar) * 2 + 1;
    let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(ImageError::TooLarge { width, height });
    };

    let max_value = ctx.format().map_or(1, |format| format.max_value().max(1));
    let zero = bar;
    let mut canvas = Canvas::new(width, height, options.bg_color)?;

    let history = ctx.window().history(usize::from(channel), count as usize);
    for (column, value) in (0u32..).zip(history) {
        let sample = first_shown + u64::from(column);
        let x1 = column * options.sample_width;
        let x2 = x1 + options.sample_width - 1;

        let color = if (first_error..=last_error).contains(&sample) {
            canvas.fill_rect(x1, 0, x2, height - 1, options.error_bg_color);
            options.error_color
        } else {
            options.wave_color
        };

        let scaled = i64::from(value) * i64::from(bar) / max_value;
        let magnitude = scaled.unsigned_abs().min(u64::from(bar)) as u32;
        if scaled < 0 {
            canvas.fill_rect(x1, zero, x2, zero + magnitude, color);
        } else {
            canvas.fill_rect(x1, zero - magnitude, x2, zero, color);
        }
    }

    canvas.fill_rect(0, zero, width.saturating_sub(1), zero, options.zero_color);
    Ok(canvas)
}

/// Text reporter that also writes a PNG for every bad area
pub struct ImageReporter<W: Write, E: Write> {
    text: TextReporter<W, E>,
    options: ImageOptions,
    template: FilenameTemplate,
    written: Vec<PathBuf>,
}

impl<W: Write, E: Write> ImageReporter<W, E> {
    pub fn new(text: TextReporter<W, E>, options: ImageOptions, template: FilenameTemplate) -> Self {
        Self {
            text,
            options,
            template,
            written: Vec::new(),
        }
    }

    /// Images written so far, in event order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn take_write_error(&mut self) -> Option<io::Error> {
        self.text.take_write_error()
    }

    pub fn into_inner(self) -> (W, E) {
        self.text.into_inner()
    }

    fn snapshot(
        &mut self,
        ctx: &RunContext<'_>,
        errorname: &str,
        channel: u16,
        first_error: u64,
        last_error: u64,
    ) {
        let (first_shown, _) = shown_samples(ctx);
        let path = self.template.render(&Snapshot {
            errorname,
            filepath: ctx.filename(),
            channel,
            first_error_sample: first_error,
            last_error_sample: last_error,
            first_window_sample: first_shown,
            last_window_sample: ctx.current_sample(),
            window_size: ctx.limits().window_size,
        });

        let result = render(ctx, &self.options, channel, first_error, last_error)
            .and_then(|canvas| canvas.write_png(&path));
        match result {
            Ok(()) => {
                info!(path = %path.display(), "image written");
                self.text
                    .print(format_args!("written image: {}\n", path.display()));
                self.written.push(path);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot write image");
                let message = format!("Cannot write image {}: {}", path.display(), err);
                self.text.warning(ctx, &message);
            }
        }
    }
}

impl<W: Write, E: Write> Reporter for ImageReporter<W, E> {
    fn begin(&mut self, ctx: &RunContext<'_>) {
        self.text.begin(ctx);
    }

    fn sample_data(&mut self, ctx: &RunContext<'_>, data_size: u32) {
        self.text.sample_data(ctx, data_size);
    }

    fn possible_pop(&mut self, ctx: &RunContext<'_>, channel: u16, sample: u64) {
        self.text.possible_pop(ctx, channel, sample);
        self.snapshot(ctx, "pop", channel, sample, sample);
    }

    fn possible_drop(
        &mut self,
        ctx: &RunContext<'_>,
        channel: u16,
        sample: u64,
        dropped_sample: u64,
    ) {
        self.text.possible_drop(ctx, channel, sample, dropped_sample);
        self.snapshot(ctx, "drop", channel, dropped_sample, dropped_sample);
    }

    fn dupes(&mut self, ctx: &RunContext<'_>, channel: u16, sample: u64, run_length: u64) {
        self.text.dupes(ctx, channel, sample, run_length);
        let last = sample + run_length.saturating_sub(1);
        self.snapshot(ctx, "dupes", channel, sample, last);
    }

    fn complete(&mut self, ctx: &RunContext<'_>) {
        self.text.complete(ctx);
    }

    fn error(&mut self, ctx: &RunContext<'_>, kind: ErrorKind, message: &str) {
        self.text.error(ctx, kind, message);
    }

    fn warning(&mut self, ctx: &RunContext<'_>, message: &str) {
        self.text.warning(ctx, message);
    }
}
