use std::path::Path;

use assert_cmd::Command;
use image::{GrayImage, Luma, Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::tempdir;

/// Light page with dark horizontal "text lines" and a left-to-right shading gradient.
fn write_page(path: &Path, w: u32, h: u32) {
    let img = RgbImage::from_fn(w, h, |x, y| {
        let paper = 170 + (x * 70 / w) as u8;
        if y % 10 < 2 && x % 16 < 12 {
            Rgb([30, 30, 40])
        } else {
            Rgb([paper, paper, paper.saturating_sub(10)])
        }
    });
    img.save(path).expect("write input page");
}

fn cmd() -> Command {
    Command::cargo_bin("doc-binarize").expect("binary built")
}

fn assert_binary(img: &GrayImage) {
    assert!(
        img.pixels().all(|Luma([v])| *v == 0 || *v == 255),
        "output contains non-binary values"
    );
}

#[test]
fn writes_binary_png_with_defaults() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("page.png");
    write_page(&input, 64, 40);

    cmd().arg(&input).assert().success();

    let output = dir.path().join("page_bin.png");
    let out = image::open(&output).expect("open output").to_luma8();
    assert_eq!(out.dimensions(), (64, 40));
    assert_binary(&out);
    // Text rows are background, blank paper rows are foreground.
    assert_eq!(out.get_pixel(4, 0)[0], 0);
    assert_eq!(out.get_pixel(4, 5)[0], 255);
}

#[test]
fn flags_override_config_and_report_is_json() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("page.png");
    let output = dir.path().join("out.png");
    let config = dir.path().join("cfg.json");
    write_page(&input, 48, 30);
    std::fs::write(
        &config,
        r#"{ "threshold": { "block_size": 31, "sensitivity": 4 }, "pre_blur": null }"#,
    )
    .expect("write config");

    cmd()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--config")
        .arg(&config)
        .args(["--block-size", "8", "--weighting", "uniform", "-s", "-3"])
        .arg("--report")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"block_size\": 8"))
        .stdout(predicate::str::contains("\"weighting\": \"uniform\""))
        .stdout(predicate::str::contains("\"sensitivity\": -3.0"))
        .stdout(predicate::str::contains("\"pre_blur\": null"))
        .stdout(predicate::str::contains("\"foreground_ratio\""));

    let out = image::open(&output).expect("open output").to_luma8();
    assert_eq!(out.dimensions(), (48, 30));
    assert_binary(&out);
}

#[test]
fn large_input_is_downscaled() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("big.png");
    let output = dir.path().join("big_out.png");
    write_page(&input, 300, 120);

    cmd()
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--max-side", "100"])
        .assert()
        .success();

    let out = image::open(&output).expect("open output").to_luma8();
    assert_eq!(out.dimensions(), (100, 40));

    cmd()
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--max-side", "100", "--no-max-side"])
        .assert()
        .failure();
}

#[test]
fn bad_block_size_is_reported() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("page.png");
    write_page(&input, 20, 20);

    cmd()
        .arg(&input)
        .args(["--block-size", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("block size 1 is too small"));

    assert!(!dir.path().join("page_bin.png").exists());
}

#[test]
fn missing_input_is_reported() {
    let dir = tempdir().expect("tempdir");
    cmd()
        .env_remove("RUST_LOG")
        .arg(dir.path().join("nope.png"))
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));
}

#[test]
fn quiet_run_prints_only_the_error() {
    let dir = tempdir().expect("tempdir");
    let output = cmd()
        .env_remove("RUST_LOG")
        .arg(dir.path().join("scan-404.png"))
        .args(["--log-level", "off"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf-8 stderr");
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "unexpected stderr: {stderr:?}");
    assert!(lines[0].starts_with("error: cannot load"), "{stderr:?}");
    assert!(lines[0].contains("scan-404.png"), "{stderr:?}");
}

#[test]
fn broken_config_is_reported() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("page.png");
    let config = dir.path().join("cfg.json");
    write_page(&input, 20, 20);
    std::fs::write(&config, r#"{ "grayscale": "sepia" }"#).expect("write config");

    cmd()
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}
