//! Format parameters read from the `fmt ` chunk

use crate::error::ContainerError;
use crate::units;
use serde::Serialize;

/// Audio format code for integer PCM
pub const PCM: u16 = 1;

/// Size of the minimal `fmt ` record in bytes
pub const WAVE_FMT_SIZE: u32 = 16;

/// Width of the integer samples are decoded into
pub const WORKING_BITS: u16 = 32;

/// Immutable description of the sample stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WaveFormat {
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    /// Bytes per multi-channel frame
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl WaveFormat {
    /// Parse the 16-byte little-endian format record
    pub fn from_le_bytes(raw: &[u8; WAVE_FMT_SIZE as usize]) -> Self {
        Self {
            audio_format: u16::from_le_bytes([raw[0], raw[1]]),
            channels: u16::from_le_bytes([raw[2], raw[3]]),
            sample_rate: u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]),
            byte_rate: u32::from_le_bytes([raw[8], raw[9], raw[10], raw[11]]),
            block_align: u16::from_le_bytes([raw[12], raw[13]]),
            bits_per_sample: u16::from_le_bytes([raw[14], raw[15]]),
        }
    }

    /// Full-scale reference for ratio thresholds
    pub fn max_value(&self) -> i64 {
        units::max_value(self.bits_per_sample)
    }

    /// Bytes occupied by one channel's sample inside a frame
    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample).div_ceil(8)
    }

    /// Check that frames can be decoded with the 32-bit working integer
    pub fn validate(&self) -> Result<(), ContainerError> {
        if self.audio_format != PCM {
            return Err(ContainerError::UnsupportedFormat(self.audio_format));
        }
        if self.bits_per_sample == 0 {
            return Err(ContainerError::ZeroBitDepth);
        }
        if self.channels == 0 || self.block_align == 0 {
            return Err(ContainerError::EmptyFrame {
                channels: self.channels,
                block_align: self.block_align,
            });
        }

        // each channel occupies a whole number of bytes inside the frame
        let frame_bytes = self.bytes_per_sample() * usize::from(self.channels);
        if frame_bytes > usize::from(self.block_align) {
            return Err(ContainerError::BitsExceedBlock {
                bits_per_sample: self.bits_per_sample,
                channels: self.channels,
                block_align: self.block_align,
            });
        }
        if self.bits_per_sample > WORKING_BITS {
            return Err(ContainerError::BitsTooWide(self.bits_per_sample));
        }
        Ok(())
    }
}
