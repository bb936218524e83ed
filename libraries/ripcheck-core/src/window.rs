//! Fixed-capacity history of decoded frames

use crate::error::Result;

/// Minimum history the detectors need (newest sample plus six back)
pub const MIN_WINDOW_SIZE: usize = 7;

/// Ring buffer of the last `size` frames, all channels interleaved
///
/// Offset 0 is the newest frame, offset `size - 1` the oldest one still held.
/// Rows before the start of the stream read as zero.
#[derive(Debug, Clone, Default)]
pub struct SampleWindow {
    data: Vec<i32>,
    channels: usize,
    size: usize,
    /// Row index of the newest frame
    head: usize,
}

impl SampleWindow {
    /// Allocate a zeroed window, clamping `size` up to [`MIN_WINDOW_SIZE`]
    ///
    /// Allocation failure is reported instead of aborting the process.
    pub fn new(channels: usize, size: usize) -> Result<Self> {
        let size = size.max(MIN_WINDOW_SIZE);
        let len = size.saturating_mul(channels);

        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, 0);

        Ok(Self {
            data,
            channels,
            size,
            head: 0,
        })
    }

    /// Number of frames held
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Evict the oldest frame and return the row that becomes offset 0
    pub fn advance(&mut self) -> &mut [i32] {
        self.head = (self.head + 1) % self.size;
        let start = self.head * self.channels;
        &mut self.data[start..start + self.channels]
    }

    /// Value of `channel`, `offset` frames before the newest one
    ///
    /// # Panics
    /// Panics if `offset >= size` or `channel >= channels`.
    pub fn get(&self, offset: usize, channel: usize) -> i32 {
        assert!(offset < self.size, "window offset {} out of range", offset);
        let row = (self.head + self.size - offset) % self.size;
        self.data[row * self.channels + channel]
    }

    /// The newest frame across all channels
    pub fn newest(&self) -> &[i32] {
        let start = self.head * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Up to `len` most recent values of one channel, oldest first
    pub fn history(&self, channel: usize, len: usize) -> impl Iterator<Item = i32> + '_ {
        let len = len.min(self.size);
        (0..len).rev().map(move |offset| self.get(offset, channel))
    }
}
