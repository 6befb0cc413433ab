use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("npf"))
}

#[test]
fn encrypt_creates_container() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("photo.jpg");
    std::fs::write(&image, b"image bytes").unwrap();

    bin()
        .env("NPF_PASSWORD", "pw")
        .arg("encrypt")
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("encrypted to"));

    let container = std::fs::read(dir.path().join("photo.jpg.npf")).unwrap();
    assert!(container.starts_with(b"NPF_ENCRYPTED_IMAGE"));
}

#[test]
fn encrypt_decrypt_roundtrip() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("photo.jpg");
    std::fs::write(&image, b"image bytes").unwrap();

    bin()
        .env("NPF_PASSWORD", "pw")
        .arg("encrypt")
        .arg(&image)
        .assert()
        .success();

    std::fs::remove_file(&image).unwrap();

    bin()
        .env("NPF_PASSWORD", "pw")
        .arg("decrypt")
        .arg(dir.path().join("photo.jpg.npf"))
        .assert()
        .success()
        .stdout(predicate::str::contains("decrypted to"));

    assert_eq!(std::fs::read(&image).unwrap(), b"image bytes");
}

#[test]
fn decrypt_with_wrong_password_fails() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("photo.jpg");
    std::fs::write(&image, b"image bytes").unwrap();

    bin()
        .env("NPF_PASSWORD", "pw")
        .arg("encrypt")
        .arg(&image)
        .assert()
        .success();

    bin()
        .env("NPF_PASSWORD", "wrong")
        .arg("decrypt")
        .arg(dir.path().join("photo.jpg.npf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("incorrect password or corrupted file"));
}

#[test]
fn decrypt_honors_output_flag() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("photo.jpg");
    std::fs::write(&image, b"image bytes").unwrap();

    bin()
        .env("NPF_PASSWORD", "pw")
        .arg("encrypt")
        .arg(&image)
        .arg("--output")
        .arg(dir.path().join("hidden.npf"))
        .assert()
        .success();

    bin()
        .env("NPF_PASSWORD", "pw")
        .arg("decrypt")
        .arg(dir.path().join("hidden.npf"))
        .arg("--output")
        .arg(dir.path().join("restored.jpg"))
        .assert()
        .success();

    assert_eq!(
        std::fs::read(dir.path().join("restored.jpg")).unwrap(),
        b"image bytes"
    );
}

#[test]
fn info_prints_metadata_without_password() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("photo.jpg");
    std::fs::write(&image, b"image bytes").unwrap();

    bin()
        .env("NPF_PASSWORD", "pw")
        .arg("encrypt")
        .arg(&image)
        .assert()
        .success();

    bin()
        .arg("info")
        .arg(dir.path().join("photo.jpg.npf"))
        .assert()
        .success()
        .stdout(predicate::str::contains("original_filename: photo.jpg"))
        .stdout(predicate::str::contains("original_size: 11"))
        .stdout(predicate::str::contains("format_version: 1"));
}

#[test]
fn info_rejects_plain_image() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("photo.jpg");
    std::fs::write(&image, b"\xFF\xD8\xFF\xE0 not a container").unwrap();

    bin()
        .arg("info")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an NPF container"));
}

#[test]
fn check_distinguishes_containers_from_plain_files() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("photo.jpg");
    std::fs::write(&image, b"image bytes").unwrap();

    bin()
        .arg("check")
        .arg(&image)
        .assert()
        .failure()
        .stdout(predicate::str::contains("not an NPF container"));

    bin()
        .env("NPF_PASSWORD", "pw")
        .arg("encrypt")
        .arg(&image)
        .assert()
        .success();

    bin()
        .arg("check")
        .arg(dir.path().join("photo.jpg.npf"))
        .assert()
        .success()
        .stdout(predicate::str::contains("is an NPF container"));
}

#[test]
fn encrypt_requires_matching_password_confirmation() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("photo.jpg");
    std::fs::write(&image, b"image bytes").unwrap();

    bin()
        .arg("encrypt")
        .arg(&image)
        .write_stdin("one\ntwo\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("passwords do not match"));
}
