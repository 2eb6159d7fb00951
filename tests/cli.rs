//! End-to-end tests driving the `qq-resize` binary on synthetic images.

use image::{RgbImage, RgbaImage};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn qq_resize(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qq-resize"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run qq-resize")
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn write_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    })
    .save_with_format(path, image::ImageFormat::Jpeg)
    .unwrap();
}

fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, 40, (y % 256) as u8, 255])
    })
    .save_with_format(path, image::ImageFormat::Png)
    .unwrap();
}

fn dims(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn resizes_single_jpeg_in_place() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("photo.jpg");
    write_jpeg(&photo, 800, 600);

    let out = qq_resize(&[arg(&photo)]);

    assert!(out.status.success());
    assert_eq!(dims(&photo), (542, 407));
    assert!(stdout(&out).contains("✓ resized: 1"));
}

#[test]
fn small_image_is_left_untouched() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("small.png");
    write_png(&photo, 400, 300);
    let before = fs::read(&photo).unwrap();

    let out = qq_resize(&[arg(&photo)]);

    assert!(out.status.success());
    assert_eq!(fs::read(&photo).unwrap(), before);
    assert!(stdout(&out).contains("○ skipped: 1"));
}

#[test]
fn second_run_is_a_no_op() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("tall.png");
    write_png(&photo, 700, 1400);

    assert!(qq_resize(&[arg(&photo)]).status.success());
    assert_eq!(dims(&photo), (271, 542));
    let after_first = fs::read(&photo).unwrap();

    let out = qq_resize(&[arg(&photo)]);
    assert!(stdout(&out).contains("○ skipped: 1"));
    assert_eq!(fs::read(&photo).unwrap(), after_first);
}

#[test]
fn corrupt_file_does_not_stop_the_batch() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("a.jpg"), 1000, 800);
    fs::write(tmp.path().join("b.jpg"), b"\xFF\xD8\xFF\xE0 not really").unwrap();
    write_png(&tmp.path().join("c.png"), 900, 900);
    write_jpeg(&tmp.path().join("d.JPEG"), 600, 2000);

    let out = qq_resize(&[arg(tmp.path())]);

    assert!(out.status.success(), "batch must exit cleanly");
    let text = stdout(&out);
    assert!(text.contains("✓ resized: 3"), "{text}");
    assert!(text.contains("✗ failed: 1"), "{text}");
    assert_eq!(dims(&tmp.path().join("a.jpg")), (542, 434));
    assert_eq!(dims(&tmp.path().join("c.png")), (542, 542));
    assert_eq!(dims(&tmp.path().join("d.JPEG")), (163, 542));
}

#[test]
fn output_dir_leaves_originals_alone() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("in");
    let output = tmp.path().join("out");
    write_jpeg(&input.join("big.jpg"), 1600, 1200);
    write_jpeg(&input.join("small.jpg"), 100, 100);

    let out = qq_resize(&[arg(&input), "-o", arg(&output)]);

    assert!(out.status.success());
    assert_eq!(dims(&input.join("big.jpg")), (1600, 1200));
    assert_eq!(dims(&output.join("big.jpg")), (542, 407));
    // Files within bounds are not copied
    assert!(!output.join("small.jpg").exists());
}

#[test]
fn recursive_flag_controls_descent() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("album/deep.jpg");
    write_jpeg(&nested, 1200, 600);

    qq_resize(&[arg(tmp.path())]);
    assert_eq!(dims(&nested), (1200, 600));

    qq_resize(&[arg(tmp.path()), "--recursive"]);
    assert_eq!(dims(&nested), (542, 271));
}

#[test]
fn recursive_output_mirrors_subdirectories() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("in");
    let output = tmp.path().join("out");
    write_png(&input.join("trip/day1/sea.png"), 2000, 1000);

    let out = qq_resize(&[arg(&input), "-r", "-o", arg(&output)]);

    assert!(out.status.success());
    assert_eq!(dims(&output.join("trip/day1/sea.png")), (542, 271));
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("photo.jpg");
    write_jpeg(&photo, 800, 600);
    let before = fs::read(&photo).unwrap();

    let out = qq_resize(&[arg(tmp.path()), "--dry-run"]);

    assert!(out.status.success());
    assert_eq!(fs::read(&photo).unwrap(), before);
    let text = stdout(&out);
    assert!(text.contains("[dry run] resized"), "{text}");
    assert!(text.contains("(800x600) → (542x407)"), "{text}");
    assert!(text.contains("✓ would resize: 1"), "{text}");
}

#[test]
fn rename_numbers_files_in_place() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("b-big.JPG"), 1000, 1000);
    write_png(&tmp.path().join("a-small.png"), 50, 50);

    let out = qq_resize(&[arg(tmp.path()), "--rename"]);

    assert!(out.status.success());
    assert_eq!(names_in(tmp.path()), vec!["00001.png", "00002.jpg"]);
    assert_eq!(dims(&tmp.path().join("00001.png")), (50, 50));
    assert_eq!(dims(&tmp.path().join("00002.jpg")), (542, 542));
}

#[test]
fn rename_into_output_copies_small_files() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("in");
    let output = tmp.path().join("out");
    write_png(&input.join("small.png"), 50, 50);

    let out = qq_resize(&[arg(&input), "--rename", "-o", arg(&output)]);

    assert!(out.status.success());
    assert!(input.join("small.png").exists());
    assert_eq!(dims(&output.join("00001.png")), (50, 50));
}

#[test]
fn rename_reuses_a_number_freed_earlier_in_the_run() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("00002.jpg"), 50, 50);
    write_jpeg(&tmp.path().join("b.jpg"), 50, 50);

    let out = qq_resize(&[arg(tmp.path()), "--rename"]);

    assert!(out.status.success());
    assert_eq!(names_in(tmp.path()), vec!["00001.jpg", "00002.jpg"]);
}

#[test]
fn rename_with_output_equal_to_input_moves_files() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("a.jpg"), 50, 50);

    let out = qq_resize(&[arg(tmp.path()), "--rename", "-o", arg(tmp.path())]);

    assert!(out.status.success());
    assert_eq!(names_in(tmp.path()), vec!["00001.jpg"]);
}

#[test]
fn unsupported_files_are_counted_separately() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("notes.txt"), "hello").unwrap();
    write_jpeg(&tmp.path().join("a.jpg"), 10, 10);

    let out = qq_resize(&[arg(tmp.path()), "-v"]);

    let text = stdout(&out);
    assert!(text.contains("unsupported  "), "{text}");
    assert!(text.contains("- unsupported: 1"), "{text}");
    assert!(text.contains("✗ failed: 0"), "{text}");
}

#[test]
fn json_report_lists_every_file() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("a.jpg"), 800, 600);
    write_jpeg(&tmp.path().join("b.jpg"), 20, 20);

    let out = qq_resize(&[arg(tmp.path()), "--json", "--dry-run"]);

    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["config"]["max_edge"], 542);
    assert_eq!(report["summary"]["resized"], 1);
    assert_eq!(report["summary"]["skipped"], 1);
    assert_eq!(report["files"][0]["status"], "resized");
    assert_eq!(report["files"][0]["to"]["height"], 407);
    assert_eq!(report["files"][1]["status"], "skipped");
}

#[test]
fn config_file_sets_defaults_and_flags_override() {
    let tmp = TempDir::new().unwrap();
    let settings = tmp.path().join("settings.toml");
    fs::write(&settings, "max_size = 300\n").unwrap();
    let a = tmp.path().join("a.jpg");
    let b = tmp.path().join("b.jpg");
    write_jpeg(&a, 600, 600);
    write_jpeg(&b, 600, 600);

    qq_resize(&[arg(&a), "-c", arg(&settings)]);
    assert_eq!(dims(&a), (300, 300));

    qq_resize(&[arg(&b), "-c", arg(&settings), "-s", "200"]);
    assert_eq!(dims(&b), (200, 200));
}

#[test]
fn invalid_quality_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("photo.jpg");
    write_jpeg(&photo, 800, 600);

    let out = qq_resize(&[arg(&photo), "-q", "0"]);

    assert!(!out.status.success());
    assert_eq!(dims(&photo), (800, 600));
}

#[test]
fn tiny_max_size_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let out = qq_resize(&[arg(tmp.path()), "-s", "5"]);
    assert!(!out.status.success());
}

#[test]
fn missing_input_fails() {
    let out = qq_resize(&["/nonexistent/qq-resize/input"]);
    assert!(!out.status.success());
}

#[test]
fn gen_config_prints_stock_settings() {
    let out = qq_resize(&["--gen-config"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("max_size = 542"));
    assert!(text.contains("quality = 100"));
}
