//! Scanning a list of inputs one after another
use ripcheck_core::{scan, ErrorKind, Reporter, RunContext, ScanSettings};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::{info, warn};

/// Name reported for standard input
pub const STDIN_NAME: &str = "<stdin>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// Files as given, or standard input when there are none
    pub fn from_args(files: &[PathBuf]) -> Vec<Source> {
        if files.is_empty() {
            vec![Source::Stdin]
        } else {
            files.iter().cloned().map(Source::File).collect()
        }
    }

    pub fn name(&self) -> String {
        match self {
            Source::Stdin => STDIN_NAME.to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

/// Totals over all inputs of one invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Inputs scanned to completion
    pub scanned: usize,
    /// Inputs that could not be opened or failed mid-scan
    pub failed: usize,
    pub bad_areas: u64,
}

impl RunSummary {
    /// 0 when every input was scanned, 1 otherwise
    ///
    /// Bad areas do not affect the exit code.
    pub fn exit_code(&self) -> u8 {
        u8::from(self.failed > 0)
    }
}

/// Scan every source in order; a failure never stops the remaining ones
pub fn run<P: Reporter + ?Sized>(
    sources: &[Source],
    settings: &ScanSettings,
    reporter: &mut P,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for source in sources {
        let name = source.name();
        let result = match source {
            Source::Stdin => scan(&mut io::stdin().lock(), &name, settings, reporter),
            Source::File(path) => match File::open(path) {
                Ok(file) => scan(&mut BufReader::new(file), &name, settings, reporter),
                Err(err) => {
                    warn!(file = %name, error = %err, "cannot open file");
                    let ctx = RunContext::new(&name);
                    reporter.error(&ctx, ErrorKind::Io, &format!("Cannot open file: {}", err));
                    summary.failed += 1;
                    continue;
                }
            },
        };

        match result {
            Ok(file_summary) => {
                summary.scanned += 1;
                summary.bad_areas += file_summary.bad_areas;
            }
            Err(_) => summary.failed += 1,
        }
    }

    info!(
        scanned = summary.scanned,
        failed = summary.failed,
        bad_areas = summary.bad_areas,
        "run finished"
    );
    summary
}
