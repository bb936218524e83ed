//! Frame decoding into centered signed integers

use crate::format::WaveFormat;

/// Decodes interleaved little-endian PCM frames of any depth up to 32 bits
///
/// Each channel occupies `ceil(bits / 8)` bytes. Samples are stored
/// left-justified, so padding bits sit in the low bits and are shifted out.
/// Depths of 8 bits and below are unsigned and get re-centered; wider depths
/// are two's complement and get sign-extended.
#[derive(Debug, Clone)]
pub struct SampleDecoder {
    channels: usize,
    bits_per_sample: u32,
    bytes_per_sample: usize,
    shift: u32,
}

impl SampleDecoder {
    /// Build a decoder for an already validated format
    pub fn new(format: &WaveFormat) -> Self {
        let bytes_per_sample = format.bytes_per_sample();
        let bits_per_sample = u32::from(format.bits_per_sample);
        Self {
            channels: usize::from(format.channels),
            bits_per_sample,
            bytes_per_sample,
            shift: bytes_per_sample as u32 * 8 - bits_per_sample,
        }
    }

    /// Decode one frame, writing one value per channel into `out`
    pub fn decode_frame(&self, frame: &[u8], out: &mut [i32]) {
        for (channel, value) in out.iter_mut().enumerate().take(self.channels) {
            let start = channel * self.bytes_per_sample;
            let slot = &frame[start..start + self.bytes_per_sample];
            *value = self.decode_sample(slot);
        }
    }

    /// Decode a single channel slot of `bytes_per_sample` bytes
    pub fn decode_sample(&self, slot: &[u8]) -> i32 {
        let raw = slot
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &byte)| acc | (u32::from(byte) << (i * 8)));
        let raw = raw >> self.shift;
        let bits = self.bits_per_sample;

        if bits <= 8 {
            raw as i32 - (1 << (bits - 1))
        } else if bits < 32 && raw & (1 << (bits - 1)) != 0 {
            (raw | (u32::MAX << bits)) as i32
        } else {
            raw as i32
        }
    }
}
