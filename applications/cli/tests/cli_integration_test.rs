//! Runner and text reporter tests against files on disk

mod common;

use clap::Parser;
use common::{mono16_wav, short_settings, spike_at, write_file};
use ripcheck_cli::{run, Cli, RunSummary, Source, TextReporter};
use ripcheck_core::ScanSettings;
use std::path::PathBuf;
use tempfile::TempDir;

/// Run `sources` and return the summary with captured stdout and stderr
fn run_captured(sources: &[Source], settings: &ScanSettings) -> (RunSummary, String, String) {
    let mut reporter = TextReporter::new(Vec::new(), Vec::new());
    let summary = run(sources, settings, &mut reporter);
    assert!(reporter.take_write_error().is_none());

    let (out, err) = reporter.into_inner();
    (
        summary,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn test_clean_file_report() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "clean.wav", &mono16_wav(&[0; 500], &[]));

    let (summary, out, err) = run_captured(&[Source::File(path.clone())], &short_settings());

    assert_eq!(summary.exit_code(), 0);
    assert_eq!(summary.scanned, 1);
    assert!(out.starts_with(&format!("File: {}\n", path.display())));
    assert!(out.contains("[RIFF WAVE] 1036 bytes\n"));
    assert!(out.contains("[fmt ] 16 bytes\n"));
    assert!(out.contains("  Number of channels = 1 (1 = mono, 2 = stereo)\n"));
    assert!(out.contains("  Sample rate = 1000Hz\n"));
    assert!(out.contains("[data] 1000 bytes\n"));
    assert!(out.contains("  Duration = 0.500 sec\n"));
    assert!(out.ends_with("done: all ok\n"));
    assert!(err.is_empty());
}

#[test]
fn test_pop_line_shows_window() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "pop.wav", &mono16_wav(&spike_at(500, 100, 20000), &[]));

    let (summary, out, _) = run_captured(&[Source::File(path)], &short_settings());

    assert_eq!(summary.bad_areas, 1);
    assert!(out.contains(
        "pop: sample = 100, time = 100.000 ms, channel = 0, \
         samples[96 ... 102] = {0, 0, 0, 0, 20000, 0, 0}\n"
    ));
    assert!(out.ends_with("done: 1 bad area found\n"));
}

#[test]
fn test_wider_window_shows_more_context() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "pop.wav", &mono16_wav(&spike_at(500, 100, 20000), &[]));
    let settings = ScanSettings {
        window_size: 10,
        ..short_settings()
    };

    let (_, out, _) = run_captured(&[Source::File(path)], &settings);
    assert!(out.contains("samples[93 ... 102] = {0, 0, 0, 0, 0, 0, 0, 20000, 0, 0}\n"));
}

#[test]
fn test_drop_and_dupes_lines() {
    let mut samples: Vec<i16> = (0..50).map(|i| 1000 + i).collect();
    samples.extend(std::iter::repeat(5000).take(20));
    samples.extend((0..100).map(|i| if i % 2 == 0 { 25000 } else { 26000 }));
    samples[120] = 0;
    samples.extend(std::iter::repeat(100).take(30));

    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "defects.wav", &mono16_wav(&samples, &[]));
    let (summary, out, _) = run_captured(&[Source::File(path)], &short_settings());

    assert!(out.contains(
        "dupes: samples = 50 ... 69 (20 samples, time = 50.000 ms ... 69.000 ms), channel = 0, \
         samples[64 ... 70] = {5000, 5000, 5000, 5000, 5000, 5000, 25000}\n"
    ));
    assert!(out.contains(
        "drop: sample = 120, time = 120.000 ms, channel = 0, \
         samples[115 ... 121] = {26000, 25000, 26000, 25000, 26000, 0, 26000}\n"
    ));
    assert_eq!(summary.bad_areas, 2);
    assert!(out.ends_with("done: 2 bad areas found\n"));
}

#[test]
fn test_every_file_is_attempted() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.wav");
    let bogus = write_file(dir.path(), "bogus.wav", b"RIFX\x00\x00\x00\x00WAVEfmt \x10\x00\x00\x00");
    let good = write_file(dir.path(), "good.wav", &mono16_wav(&[0; 100], &[]));

    let sources = Source::from_args(&[missing.clone(), bogus.clone(), good.clone()]);
    let (summary, out, err) = run_captured(&sources, &short_settings());

    assert_eq!(summary.failed, 2);
    assert_eq!(summary.scanned, 1);
    assert_eq!(summary.exit_code(), 1);

    assert!(err.contains(&format!("error: {}: Cannot open file", missing.display())));
    assert!(err.contains(&format!(
        "error: {}: Expected 'RIFF' but found 'RIFX'",
        bogus.display()
    )));
    assert!(out.contains(&format!("File: {}\n", good.display())));
    assert!(out.ends_with("done: all ok\n"));
}

#[test]
fn test_odd_data_size_warning() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "odd.wav", &mono16_wav(&[0; 100], &[0]));

    let (summary, out, err) = run_captured(&[Source::File(path.clone())], &short_settings());

    assert_eq!(summary.exit_code(), 0);
    assert_eq!(err.matches("warning: ").count(), 1);
    assert!(err.contains(&format!("warning: {}: ", path.display())));
    assert!(out.contains("[data] 201 bytes\n"));
}

#[test]
fn test_flags_reach_the_scan() {
    let dir = TempDir::new().unwrap();
    let mut samples = vec![0i16; 400];
    for position in [50, 100, 150] {
        samples[position] = 20000;
    }
    let path = write_file(dir.path(), "pops.wav", &mono16_wav(&samples, &[]));

    let cli = Cli::try_parse_from([
        PathBuf::from("ripcheck"),
        PathBuf::from("-i"),
        PathBuf::from("10"),
        PathBuf::from("-o"),
        PathBuf::from("10"),
        PathBuf::from("-b"),
        PathBuf::from("2"),
        path,
    ])
    .unwrap();
    let mut settings = ScanSettings::default();
    cli.apply(&mut settings);

    let (summary, out, _) = run_captured(&Source::from_args(&cli.files), &settings);
    assert_eq!(summary.bad_areas, 2);
    assert_eq!(out.matches("pop: ").count(), 2);
}
