extern crate fisheye8k;

use std::fs;
use std::path::Path;

use fisheye8k::dataset::{build_fake, flatten_images, FakeBuildOptions};

fn write_png(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::new(width, height).save(path).unwrap();
}

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn flatten_collects_train_and_val() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    write_png(&data.join("train/camera1/images/camera1_A_1.png"), 16, 16);
    write_png(&data.join("train/camera1/images/camera1_A_2.png"), 16, 16);
    write_png(&data.join("val/camera2/images/camera2_M_3.png"), 16, 16);

    let copied = flatten_images(data).unwrap();
    assert_eq!(copied, 3);
    assert!(data.join("images/camera1_A_1.png").is_file());
    assert!(data.join("images/camera2_M_3.png").is_file());

    // Second run sees a fully populated target and copies nothing.
    let copied = flatten_images(data).unwrap();
    assert_eq!(copied, 0);
}

#[test]
fn flatten_without_images_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(flatten_images(dir.path()).is_err());
}

#[test]
fn fake_build_mirrors_the_source_tree() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("fisheye8k");
    let results = dir.path().join("results");

    write_png(&src.join("train/camera1/images/camera1_A_1.png"), 16, 16);
    write_file(&src.join("train/camera1/labels/camera1_A_1.txt"), "0 0.5 0.5 0.5 0.5\n");
    write_file(&src.join("train/camera1/annotations/camera1_A_1.xml"), "<annotation/>");
    write_png(&src.join("val/camera2/images/camera2_M_3.png"), 16, 16);
    write_file(&src.join("val/camera2/labels/camera2_M_3.txt"), "1 0.5 0.5 0.5 0.5\n");

    write_png(&results.join("a2e/test_latest/images/camera1_A_1_fake.png"), 16, 16);
    write_png(&results.join("a2e/test_latest/images/camera2_M_3_fake.png"), 16, 16);

    let opts = FakeBuildOptions::new("a2e", &src, &results);
    let stats = build_fake(&opts).unwrap();
    assert_eq!(stats.images, 2);
    assert_eq!(stats.labels, 2);
    assert_eq!(stats.annotations, 1);
    assert_eq!(stats.missing, 0);

    let dest = opts.dest_dir();
    assert_eq!(dest, results.join("fisheye8k_a2e"));
    assert!(dest.join("train/camera1/images/camera1_A_1_fake.png").is_file());
    assert!(dest.join("train/camera1/labels/camera1_A_1_fake.txt").is_file());
    assert!(dest.join("train/camera1/annotations/camera1_A_1_fake.xml").is_file());
    assert!(dest.join("val/camera2/images/camera2_M_3_fake.png").is_file());
}

#[test]
fn fake_build_counts_missing_results() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("fisheye8k");
    let results = dir.path().join("results");

    write_png(&src.join("train/camera1/images/camera1_A_1.png"), 16, 16);
    write_png(&src.join("train/camera1/images/camera1_A_2.png"), 16, 16);
    // Only one of the two frames has a synthesized counterpart.
    write_png(&results.join("a2n/test_latest/images/camera1_A_1_fake.png"), 16, 16);

    let opts = FakeBuildOptions::new("a2n", &src, &results);
    let stats = build_fake(&opts).unwrap();
    assert_eq!(stats.images, 1);
    assert_eq!(stats.missing, 1);
}

#[test]
fn fake_build_requires_results() {
    let dir = tempfile::tempdir().unwrap();
    let opts = FakeBuildOptions::new("a2e", dir.path(), &dir.path().join("results"));
    assert!(build_fake(&opts).is_err());
}
