//! Common test utilities and fixtures
#![allow(dead_code)]

use ripcheck_core::{ScanSettings, TimeValue};
use std::fs;
use std::path::{Path, PathBuf};

/// Mono 16-bit PCM at 1 kHz, so sample numbers equal milliseconds
pub fn mono16_wav(samples: &[i16], trailing: &[u8]) -> Vec<u8> {
    let data_size = (samples.len() * 2 + trailing.len()) as u32;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_size).to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1000u32.to_le_bytes());
    bytes.extend_from_slice(&2000u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_size.to_le_bytes());
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes.extend_from_slice(trailing);
    bytes
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("Failed to write test file");
    path
}

/// Silence with one spike
pub fn spike_at(len: usize, position: usize, value: i16) -> Vec<i16> {
    let mut samples = vec![0; len];
    samples[position] = value;
    samples
}

/// Settings for short synthetic files
pub fn short_settings() -> ScanSettings {
    ScanSettings {
        intro_length: TimeValue::Samples(10),
        outro_length: TimeValue::Samples(10),
        dupe_dist: Some(TimeValue::Samples(10)),
        min_dupes: 20,
        ..Default::default()
    }
}
