//! Common test utilities: synthetic WAVE streams
#![allow(dead_code)]

use ripcheck_core::{RecordingReporter, ScanSettings, ScanSummary, TimeValue};
use std::io::Cursor;

/// Builder for in-memory RIFF/WAVE byte streams
///
/// Frames are given as signed values per channel and encoded at the
/// configured depth: left-justified in `ceil(bits / 8)` bytes, unsigned for
/// depths of 8 bits and below.
#[derive(Debug, Clone)]
pub struct WavBuilder {
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Overrides the computed block alignment
    pub block_align: Option<u16>,
    /// Bytes appended to the 16-byte fmt record
    pub fmt_extension: Vec<u8>,
    /// Chunks placed between `fmt ` and `data`
    pub extra_chunks: Vec<([u8; 4], Vec<u8>)>,
    pub frames: Vec<Vec<i32>>,
    /// Raw bytes appended to the data payload
    pub trailing_data: Vec<u8>,
    /// Overrides the declared RIFF size
    pub riff_size: Option<u32>,
    pub with_data_chunk: bool,
}

impl WavBuilder {
    pub fn new(channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        Self {
            audio_format: 1,
            channels,
            sample_rate,
            bits_per_sample,
            block_align: None,
            fmt_extension: Vec::new(),
            extra_chunks: Vec::new(),
            frames: Vec::new(),
            trailing_data: Vec::new(),
            riff_size: None,
            with_data_chunk: true,
        }
    }

    /// Mono 16-bit at 1 kHz, so milliseconds equal samples
    pub fn mono16(samples: &[i32]) -> Self {
        Self::new(1, 1000, 16).mono_samples(samples)
    }

    pub fn mono_samples(mut self, samples: &[i32]) -> Self {
        self.frames = samples.iter().map(|&s| vec![s]).collect();
        self
    }

    pub fn frames(mut self, frames: Vec<Vec<i32>>) -> Self {
        self.frames = frames;
        self
    }

    pub fn chunk(mut self, id: &[u8; 4], body: &[u8]) -> Self {
        self.extra_chunks.push((*id, body.to_vec()));
        self
    }

    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample).div_ceil(8)
    }

    pub fn computed_block_align(&self) -> u16 {
        self.block_align
            .unwrap_or((self.bytes_per_sample() * usize::from(self.channels)) as u16)
    }

    /// Encode one signed value into its little-endian slot
    pub fn encode_sample(&self, value: i32) -> Vec<u8> {
        let bits = u32::from(self.bits_per_sample);
        let width = self.bytes_per_sample();
        let shift = width as u32 * 8 - bits;

        let raw = if bits <= 8 {
            (value + (1 << (bits - 1))) as u32
        } else {
            value as u32
        };
        let raw = u64::from(raw & mask(bits)) << shift;
        raw.to_le_bytes()[..width].to_vec()
    }

    fn data_payload(&self) -> Vec<u8> {
        let block_align = usize::from(self.computed_block_align());
        let mut data = Vec::new();
        for frame in &self.frames {
            let start = data.len();
            for &value in frame {
                data.extend(self.encode_sample(value));
            }
            data.resize(start + block_align, 0);
        }
        data.extend_from_slice(&self.trailing_data);
        data
    }

    pub fn build(&self) -> Vec<u8> {
        let block_align = self.computed_block_align();
        let fmt_size = 16 + self.fmt_extension.len() as u32;
        let data = self.data_payload();

        let mut body = Vec::new();
        body.extend_from_slice(b"WAVE");
        body.extend_from_slice(b"fmt ");
        body.extend_from_slice(&fmt_size.to_le_bytes());
        body.extend_from_slice(&self.audio_format.to_le_bytes());
        body.extend_from_slice(&self.channels.to_le_bytes());
        body.extend_from_slice(&self.sample_rate.to_le_bytes());
        body.extend_from_slice(&(self.sample_rate * u32::from(block_align)).to_le_bytes());
        body.extend_from_slice(&block_align.to_le_bytes());
        body.extend_from_slice(&self.bits_per_sample.to_le_bytes());
        body.extend_from_slice(&self.fmt_extension);

        for (id, chunk) in &self.extra_chunks {
            body.extend_from_slice(id);
            body.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
            body.extend_from_slice(chunk);
        }

        if self.with_data_chunk {
            body.extend_from_slice(b"data");
            body.extend_from_slice(&(data.len() as u32).to_le_bytes());
            body.extend_from_slice(&data);
        }

        let riff_size = self.riff_size.unwrap_or(body.len() as u32);
        let mut bytes = Vec::with_capacity(body.len() + 8);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&riff_size.to_le_bytes());
        bytes.extend_from_slice(&body);
        bytes
    }
}

fn mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1 << bits) - 1
    }
}

/// Settings with short intro/outro so small synthetic streams get analyzed
pub fn short_settings() -> ScanSettings {
    ScanSettings {
        intro_length: TimeValue::Samples(10),
        outro_length: TimeValue::Samples(10),
        dupe_dist: Some(TimeValue::Samples(10)),
        min_dupes: 20,
        ..Default::default()
    }
}

/// Scan `bytes` and return the summary together with every callback
pub fn scan_bytes(
    bytes: Vec<u8>,
    settings: &ScanSettings,
) -> (ripcheck_core::Result<ScanSummary>, RecordingReporter) {
    let mut reporter = RecordingReporter::new();
    let result = ripcheck_core::scan(&mut Cursor::new(bytes), "test.wav", settings, &mut reporter);
    (result, reporter)
}

/// Silent mono stream of `len` samples with `spike` written at `position`
pub fn spike_at(len: usize, position: usize, spike: i32) -> Vec<i32> {
    let mut samples = vec![0; len];
    samples[position] = spike;
    samples
}
