//! Image reporter tests writing PNG files into temp directories

mod common;

use common::{mono16_wav, short_settings, spike_at, write_file};
use ripcheck_cli::image::Rgb;
use ripcheck_cli::{run, FilenameTemplate, ImageOptions, ImageReporter, RunSummary, Source, TextReporter};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SMALL: &str = "samp-width=2,samp-height=10";

struct ImageRun {
    summary: RunSummary,
    written: Vec<PathBuf>,
    out: String,
    err: String,
}

fn run_images(path: &Path, options: &str, template: &str) -> ImageRun {
    let options: ImageOptions = options.parse().unwrap();
    let template: FilenameTemplate = template.parse().unwrap();
    let mut reporter = ImageReporter::new(TextReporter::new(Vec::new(), Vec::new()), options, template);

    let summary = run(&[Source::File(path.to_path_buf())], &short_settings(), &mut reporter);
    assert!(reporter.take_write_error().is_none());

    let written = reporter.written().to_vec();
    let (out, err) = reporter.into_inner();
    ImageRun {
        summary,
        written,
        out: String::from_utf8(out).unwrap(),
        err: String::from_utf8(err).unwrap(),
    }
}

/// Decode an RGB PNG into `(width, height, pixels)`
fn read_png(path: &Path) -> (u32, u32, Vec<u8>) {
    let decoder = png::Decoder::new(File::open(path).unwrap());
    let mut reader = decoder.read_info().unwrap();
    let mut pixels = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut pixels).unwrap();
    assert_eq!(info.color_type, png::ColorType::Rgb);
    assert_eq!(info.bit_depth, png::BitDepth::Eight);
    pixels.truncate(info.buffer_size());
    (info.width, info.height, pixels)
}

fn pixel(image: &(u32, u32, Vec<u8>), x: u32, y: u32) -> Rgb {
    let i = ((y * image.0 + x) * 3) as usize;
    Rgb([image.2[i], image.2[i + 1], image.2[i + 2]])
}

fn template_in(dir: &Path, name: &str) -> String {
    format!("{}/{}", dir.display(), name)
}

#[test]
fn test_pop_snapshot() {
    let dir = TempDir::new().unwrap();
    let wav = write_file(dir.path(), "pop.wav", &mono16_wav(&spike_at(500, 100, 20000), &[]));
    let template = template_in(dir.path(), "{basename}_{errorname}_{first_error_sample}_ch{channel}.png");

    let result = run_images(&wav, SMALL, &template);

    let expected = dir.path().join("pop_pop_100_ch0.png");
    assert_eq!(result.summary.bad_areas, 1);
    assert_eq!(result.written, vec![expected.clone()]);
    assert!(result.out.contains(&format!(
        "samples[96 ... 102] = {{0, 0, 0, 0, 20000, 0, 0}}\nwritten image: {}\n",
        expected.display()
    )));

    // 7 samples of 2 px, 10 px above and below the zero row
    let image = read_png(&expected);
    assert_eq!((image.0, image.1), (14, 21));

    let defaults = ImageOptions::default();
    // sample 100 is column 4; 20000 / 32767 of 10 px is 6 px
    assert_eq!(pixel(&image, 8, 4), defaults.error_color);
    assert_eq!(pixel(&image, 9, 9), defaults.error_color);
    assert_eq!(pixel(&image, 8, 3), defaults.error_bg_color);
    assert_eq!(pixel(&image, 8, 20), defaults.error_bg_color);
    assert_eq!(pixel(&image, 0, 4), defaults.bg_color);
    assert_eq!(pixel(&image, 13, 20), defaults.bg_color);
    for x in 0..14 {
        assert_eq!(pixel(&image, x, 10), defaults.zero_color);
    }
}

#[test]
fn test_negative_values_grow_downwards() {
    let dir = TempDir::new().unwrap();
    let wav = write_file(dir.path(), "neg.wav", &mono16_wav(&spike_at(500, 100, -32767), &[]));
    let template = template_in(dir.path(), "{errorname}.png");

    let result = run_images(&wav, "samp-width=1,samp-height=10,error-color=lime", &template);
    assert_eq!(result.written.len(), 1);

    let image = read_png(&result.written[0]);
    assert_eq!((image.0, image.1), (7, 21));
    assert_eq!(pixel(&image, 4, 20), Rgb::hex(0x00FF00));
    assert_eq!(pixel(&image, 4, 11), Rgb::hex(0x00FF00));
    assert_eq!(pixel(&image, 4, 9), ImageOptions::default().error_bg_color);
}

#[test]
fn test_drop_and_dupes_snapshots() {
    let mut samples: Vec<i16> = (0..50).map(|i| 1000 + i).collect();
    samples.extend(std::iter::repeat(5000).take(20));
    samples.extend((0..100).map(|i| if i % 2 == 0 { 25000 } else { 26000 }));
    samples[120] = 0;
    samples.extend(std::iter::repeat(100).take(30));

    let dir = TempDir::new().unwrap();
    let wav = write_file(dir.path(), "defects.wav", &mono16_wav(&samples, &[]));
    let template = template_in(
        dir.path(),
        "{errorname}_{first_error_sample}-{last_error_sample}_{error_samples}_w{first_window_sample}-{last_window_sample}.png",
    );

    let result = run_images(&wav, SMALL, &template);

    assert_eq!(result.summary.bad_areas, 2);
    assert_eq!(
        result.written,
        vec![
            dir.path().join("dupes_50-69_20_w64-70.png"),
            dir.path().join("drop_120-120_1_w115-121.png"),
        ]
    );
    for path in &result.written {
        assert!(path.is_file());
    }
}

#[test]
fn test_clean_file_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let wav = write_file(dir.path(), "clean.wav", &mono16_wav(&[0; 300], &[]));

    let result = run_images(&wav, SMALL, &template_in(dir.path(), "{errorname}.png"));

    assert!(result.written.is_empty());
    assert!(result.out.ends_with("done: all ok\n"));
    assert!(!result.out.contains("written image"));
}

#[test]
fn test_unwritable_image_is_a_warning() {
    let dir = TempDir::new().unwrap();
    let wav = write_file(dir.path(), "pop.wav", &mono16_wav(&spike_at(500, 100, 20000), &[]));
    let template = template_in(dir.path(), "no-such-dir/{errorname}.png");

    let result = run_images(&wav, SMALL, &template);

    assert!(result.written.is_empty());
    assert_eq!(result.summary.exit_code(), 0);
    assert_eq!(result.summary.bad_areas, 1);
    assert!(result
        .err
        .contains(&format!("warning: {}: Cannot write image", wav.display())));
    assert!(result.out.ends_with("done: 1 bad area found\n"));
}
