//! RIFF/WAVE container walk
//!
//! Reads the fixed RIFF header together with the first chunk header, the
//! minimal `fmt ` record, and then walks `(id, size)` chunk headers until the
//! first `data` chunk. Everything is read sequentially, so any [`Read`] works,
//! including pipes; skipped chunks are consumed rather than seeked over.

use crate::error::{ContainerError, Result};
use crate::format::{WaveFormat, WAVE_FMT_SIZE};
use std::io::{self, Read};
use tracing::debug;

/// RIFF id, RIFF size, form type, first chunk id and first chunk size
pub const RIFF_HEADER_SIZE: usize = 20;

/// Chunk id plus chunk size
pub const CHUNK_HEADER_SIZE: u64 = 8;

/// Declared sizes from the RIFF header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiffHeader {
    /// Size declared by the `RIFF` chunk (counts everything after itself)
    pub riff_size: u32,
    /// Size declared by the `fmt ` chunk
    pub fmt_size: u32,
}

impl RiffHeader {
    /// Read and validate the 20-byte header
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut raw = [0u8; RIFF_HEADER_SIZE];
        reader.read_exact(&mut raw)?;

        let id = fourcc(&raw[0..4]);
        let form = fourcc(&raw[8..12]);
        let chunk = fourcc(&raw[12..16]);

        if &id != b"RIFF" {
            return Err(ContainerError::bad_magic("RIFF", id).into());
        }
        if &form != b"WAVE" {
            return Err(ContainerError::bad_magic("WAVE", form).into());
        }
        if &chunk != b"fmt " {
            return Err(ContainerError::bad_magic("fmt ", chunk).into());
        }

        let riff_size = u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]);
        let fmt_size = u32::from_le_bytes([raw[16], raw[17], raw[18], raw[19]]);

        if u64::from(riff_size) < u64::from(fmt_size) + CHUNK_HEADER_SIZE
            || fmt_size < WAVE_FMT_SIZE
        {
            return Err(ContainerError::InconsistentSizes {
                riff_size,
                fmt_size,
            }
            .into());
        }

        Ok(Self {
            riff_size,
            fmt_size,
        })
    }

    /// Read the minimal format record and skip any extension bytes
    pub fn read_format<R: Read>(&self, reader: &mut R) -> Result<WaveFormat> {
        let mut raw = [0u8; WAVE_FMT_SIZE as usize];
        reader.read_exact(&mut raw)?;
        skip(reader, u64::from(self.fmt_size - WAVE_FMT_SIZE))?;
        Ok(WaveFormat::from_le_bytes(&raw))
    }

    /// Walker over the chunks following `fmt `
    pub fn chunks(&self) -> ChunkWalker {
        ChunkWalker {
            // form type + fmt chunk header + fmt body
            pos: 4 + CHUNK_HEADER_SIZE + u64::from(self.fmt_size),
            end: u64::from(self.riff_size),
        }
    }
}

/// Header of a chunk inside the RIFF body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: [u8; 4],
    pub size: u32,
}

impl ChunkHeader {
    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut raw = [0u8; CHUNK_HEADER_SIZE as usize];
        reader.read_exact(&mut raw)?;
        Ok(Self {
            id: fourcc(&raw[0..4]),
            size: u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]),
        })
    }

    pub fn is_data(&self) -> bool {
        &self.id == b"data"
    }

    /// Printable chunk id
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.id).into_owned()
    }
}

/// Sequential walk over `(id, size)` chunks bounded by the RIFF size
#[derive(Debug, Clone)]
pub struct ChunkWalker {
    pos: u64,
    end: u64,
}

impl ChunkWalker {
    /// Skip chunks until `data`, returning its declared byte length
    ///
    /// `Ok(None)` means the RIFF body ended without a data chunk.
    pub fn find_data<R: Read>(&mut self, reader: &mut R) -> Result<Option<u32>> {
        while self.pos < self.end {
            let header = ChunkHeader::read(reader)?;
            if header.is_data() {
                debug!(size = header.size, "found data chunk");
                return Ok(Some(header.size));
            }

            debug!(id = %header.name(), size = header.size, "skipping chunk");
            skip(reader, u64::from(header.size))?;
            self.pos += CHUNK_HEADER_SIZE + u64::from(header.size);
        }
        Ok(None)
    }
}

/// Consume exactly `len` bytes
pub fn skip<R: Read>(reader: &mut R, len: u64) -> io::Result<()> {
    if len == 0 {
        return Ok(());
    }
    let copied = io::copy(&mut reader.by_ref().take(len), &mut io::sink())?;
    if copied < len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("stream ended after {} of {} bytes", copied, len),
        ));
    }
    Ok(())
}

fn fourcc(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}
