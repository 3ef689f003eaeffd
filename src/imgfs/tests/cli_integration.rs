//! Exercises `imgfscmd` as a subprocess against a scratch store, covering
//! the create/insert/read/delete/list round trip from spec.md §6.

use assert_cmd::Command;
use std::fs;

fn jpeg_bytes(w: u32, h: u32, fill: u8) -> Vec<u8> {
    let image = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        w,
        h,
        image::Rgb([fill, fill, fill]),
    ));
    let mut buf = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

#[test]
fn create_insert_read_delete_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("test.imgfs");
    let source_path = dir.path().join("cat.jpg");
    fs::write(&source_path, jpeg_bytes(32, 32, 9)).unwrap();

    Command::cargo_bin("imgfscmd")
        .unwrap()
        .args(["create", store_path.to_str().unwrap(), "-max_files", "4"])
        .assert()
        .success();

    Command::cargo_bin("imgfscmd")
        .unwrap()
        .args([
            "insert",
            store_path.to_str().unwrap(),
            "cat.jpg",
            source_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    Command::cargo_bin("imgfscmd")
        .unwrap()
        .args(["list", store_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("cat.jpg"));

    Command::cargo_bin("imgfscmd")
        .unwrap()
        .current_dir(dir.path())
        .args(["read", store_path.to_str().unwrap(), "cat.jpg", "orig"])
        .assert()
        .success();
    assert!(dir.path().join("cat.jpg_orig.jpg").exists());

    Command::cargo_bin("imgfscmd")
        .unwrap()
        .args(["delete", store_path.to_str().unwrap(), "cat.jpg"])
        .assert()
        .success();

    Command::cargo_bin("imgfscmd")
        .unwrap()
        .args(["list", store_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("<< empty imgFS >>"));
}

#[test]
fn insert_duplicate_id_fails_with_the_stable_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("test.imgfs");
    let source_a = dir.path().join("a.jpg");
    let source_b = dir.path().join("b.jpg");
    fs::write(&source_a, jpeg_bytes(16, 16, 1)).unwrap();
    fs::write(&source_b, jpeg_bytes(16, 16, 2)).unwrap();

    Command::cargo_bin("imgfscmd")
        .unwrap()
        .args(["create", store_path.to_str().unwrap()])
        .assert()
        .success();

    Command::cargo_bin("imgfscmd")
        .unwrap()
        .args([
            "insert",
            store_path.to_str().unwrap(),
            "dup",
            source_a.to_str().unwrap(),
        ])
        .assert()
        .success();

    Command::cargo_bin("imgfscmd")
        .unwrap()
        .args([
            "insert",
            store_path.to_str().unwrap(),
            "dup",
            source_b.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicates::str::contains("duplicate image id"));
}
