//! Rip defect detection for PCM WAVE audio
//!
//! This crate provides:
//! - A streaming RIFF/WAVE reader that works on any [`std::io::Read`], pipes included
//! - Decoding of integer PCM at any bit depth up to 32 bits
//! - Detectors for pops, dropped samples and runs of duplicated samples
//! - A [`Reporter`] trait receiving every finding in stream order
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ WAVE stream │ ──► │ ChunkWalker  │ ──► │ SampleDecoder │
//! └─────────────┘     └──────────────┘     └───────────────┘
//!                                                  │
//!                                                  ▼
//! ┌─────────────┐     ┌──────────────┐     ┌───────────────┐
//! │  Reporter   │ ◄── │  Detectors   │ ◄── │ SampleWindow  │
//! └─────────────┘     └──────────────┘     └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ripcheck_core::{scan, RecordingReporter, ScanSettings};
//!
//! let mut file = std::fs::File::open("track01.wav")?;
//! let mut reporter = RecordingReporter::new();
//! let summary = scan(&mut file, "track01.wav", &ScanSettings::default(), &mut reporter)?;
//!
//! for event in reporter.events() {
//!     println!("{} on channel {} at {:?}", event.kind(), event.channel(), event.span());
//! }
//! println!("{} bad areas", summary.bad_areas);
//! ```

pub mod container;
mod context;
mod decoder;
mod detectors;
mod error;
mod format;
mod report;
mod scan;
mod units;
mod window;

pub use context::{Limits, RunContext, ScanSettings};
pub use decoder::SampleDecoder;
pub use detectors::{ChannelState, Detectors, Event, EventKind, Taps};
pub use error::{ContainerError, ErrorKind, Result, ScanError};
pub use format::{WaveFormat, PCM, WAVE_FMT_SIZE, WORKING_BITS};
pub use report::{Recorded, RecordingReporter, Reporter};
pub use scan::{scan, ScanSummary};
pub use units::{max_value, TimeValue, UnitError, Volume};
pub use window::{SampleWindow, MIN_WINDOW_SIZE};
