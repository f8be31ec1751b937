//! Integration tests for the hrenamer CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Binary running inside `dir`, isolated from the user's config and environment
fn hrenamer(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hrenamer").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .env_remove("EXIFTOOL_BIN")
        .env_remove("HRENAMER_HASH__ALGORITHM")
        .env_remove("HRENAMER_HASH__LENGTH")
        .arg("--no-color");
    cmd
}

fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn cat_and_dog() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("cat.jpg"), "X").unwrap();
    fs::write(temp.path().join("dog.jpg"), "Y").unwrap();
    temp
}

#[test]
fn test_cli_help() {
    let temp = TempDir::new().unwrap();
    hrenamer(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hash"))
        .stdout(predicate::str::contains("exif"));
}

#[test]
fn test_cli_version() {
    let temp = TempDir::new().unwrap();
    hrenamer(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hrenamer"));
}

#[test]
fn test_invalid_subcommand() {
    let temp = TempDir::new().unwrap();
    hrenamer(temp.path())
        .arg("invalid-command")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_cat_and_dog_md5_len_7() {
    let temp = cat_and_dog();
    hrenamer(temp.path())
        .args(["hash", "--md5", "--len", "7", "--ext", "cat.jpg", "dog.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cat.jpg was renamed 02129bb.jpg"))
        .stdout(predicate::str::contains("dog.jpg was renamed 57cec41.jpg"))
        .stdout(predicate::str::contains("2 files renamed"));

    assert_eq!(names(temp.path()), vec!["02129bb.jpg", "57cec41.jpg"]);
}

#[test]
fn test_second_run_reports_already_named() {
    let temp = cat_and_dog();
    hrenamer(temp.path())
        .args(["hash", "-r", "-e", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files renamed"));
    let after_first = names(temp.path());

    hrenamer(temp.path())
        .args(["hash", "-v", "-r", "-e", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("is already renamed"))
        .stdout(predicate::str::contains("2 files already named"))
        .stdout(predicate::str::contains("was renamed").not());
    assert_eq!(names(temp.path()), after_first);
}

#[test]
fn test_dry_run_leaves_files_alone() {
    let temp = cat_and_dog();
    hrenamer(temp.path())
        .args(["hash", "-n", "-l", "7", "-e", "cat.jpg", "dog.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cat.jpg would be renamed 02129bb.jpg (dryrun)"))
        .stdout(predicate::str::contains("2 files would be renamed"));

    assert_eq!(names(temp.path()), vec!["cat.jpg", "dog.jpg"]);
}

#[test]
fn test_existing_destination_is_never_overwritten() {
    let temp = cat_and_dog();
    fs::write(temp.path().join("02129bb.jpg"), "unrelated").unwrap();

    hrenamer(temp.path())
        .args(["hash", "-l", "7", "-e", "cat.jpg", "dog.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "cat.jpg cannot be renamed 02129bb.jpg: destination already exists",
        ))
        .stdout(predicate::str::contains("1 file renamed"))
        .stdout(predicate::str::contains("1 error"));

    assert_eq!(fs::read_to_string(temp.path().join("02129bb.jpg")).unwrap(), "unrelated");
    assert!(temp.path().join("cat.jpg").exists());
}

#[test]
fn test_directory_needs_recursive() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("parent")).unwrap();
    fs::write(temp.path().join("parent/a.txt"), "a").unwrap();

    hrenamer(temp.path())
        .args(["hash", "parent"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    hrenamer(temp.path())
        .args(["hash", "-v", "parent"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "parent is ignored, use --recursive to process directory",
        ));
    assert_eq!(names(&temp.path().join("parent")), vec!["a.txt"]);

    hrenamer(temp.path())
        .args(["hash", "-r", "parent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file renamed"));
    assert_eq!(
        names(&temp.path().join("parent")),
        vec!["0cc175b9c0f1b6a831c399e269772661"]
    );
}

#[test]
fn test_missing_path_is_reported() {
    let temp = TempDir::new().unwrap();
    hrenamer(temp.path())
        .args(["hash", "nope.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nope.txt is ignored, not a file nor a directory"));
}

#[test]
fn test_every_pool_size_processes_every_file() {
    for jobs in ["1", "3", "10"] {
        let temp = TempDir::new().unwrap();
        for i in 0..10 {
            fs::write(temp.path().join(format!("f{i}.txt")), format!("content {i}")).unwrap();
        }
        hrenamer(temp.path())
            .args(["hash", "-r", "-j", jobs, "--sha1", "."])
            .assert()
            .success()
            .stdout(predicate::str::contains("10 files renamed"));
        assert!(names(temp.path()).iter().all(|n| n.len() == 40));
    }
}

#[test]
fn test_output_folder() {
    let temp = cat_and_dog();
    hrenamer(temp.path())
        .args(["hash", "-l", "7", "-e", "-o", "sorted/md5", "cat.jpg", "dog.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files renamed"));

    assert_eq!(
        names(&temp.path().join("sorted/md5")),
        vec!["02129bb.jpg", "57cec41.jpg"]
    );
}

#[test]
fn test_invalid_flags_exit_with_usage_error() {
    let temp = cat_and_dog();
    hrenamer(temp.path())
        .args(["hash", "--prefix", "a/b", "cat.jpg"])
        .assert()
        .code(2);
    hrenamer(temp.path())
        .args(["hash", "--md5", "--sha256", "cat.jpg"])
        .assert()
        .code(2);
    hrenamer(temp.path())
        .args(["hash", "-j", "0", "cat.jpg"])
        .assert()
        .code(2);
    assert_eq!(names(temp.path()), vec!["cat.jpg", "dog.jpg"]);
}

#[test]
fn test_project_config_and_environment() {
    let temp = cat_and_dog();
    fs::write(
        temp.path().join("hrenamer.toml"),
        "[hash]\nalgorithm = \"sha256\"\nextension = true\n",
    )
    .unwrap();

    hrenamer(temp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("algorithm = \"sha256\""));

    hrenamer(temp.path())
        .env("HRENAMER_HASH__LENGTH", "5")
        .args(["hash", "cat.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file renamed"));

    // sha256("X") starts with 4b68ab
    assert!(temp.path().join("4b68a.jpg").exists());
}

#[test]
fn test_missing_custom_config_is_a_startup_error() {
    let temp = cat_and_dog();
    hrenamer(temp.path())
        .args(["--config", "missing.toml", "hash", "cat.jpg"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("missing.toml"));
    assert!(temp.path().join("cat.jpg").exists());
}

#[test]
fn test_config_path_lists_sources() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("hrenamer.yaml"), "output:\n  color: false\n").unwrap();

    hrenamer(temp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<embedded defaults>"))
        .stdout(predicate::str::contains("hrenamer.yaml (found)"))
        .stdout(predicate::str::contains("hrenamer.toml (missing)"))
        .stdout(predicate::str::contains("$HRENAMER_*"));
}

#[test]
fn test_exif_without_exiftool_fails_at_startup() {
    let temp = cat_and_dog();
    hrenamer(temp.path())
        .args(["exif", "--exiftool", "hrenamer-no-such-exiftool", "cat.jpg"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("EXIFTOOL_BIN"));
}

#[cfg(unix)]
mod exif {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Fake exiftool printing the content of the file it is asked about
    fn fake_exiftool(dir: &Path) -> std::path::PathBuf {
        let script = dir.join("fake-exiftool");
        fs::write(&script, "#!/bin/sh\nfor last; do :; done\ncat \"$last\"\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    fn photo(dir: &Path, name: &str, date: &str) {
        fs::write(
            dir.join(name),
            format!(r#"[{{"File:MIMEType": "image/jpeg", "EXIF:DateTimeOriginal": "{date}"}}]"#),
        )
        .unwrap();
    }

    #[test]
    fn test_photos_are_renamed_after_capture_date() {
        let tools = TempDir::new().unwrap();
        let script = fake_exiftool(tools.path());
        let temp = TempDir::new().unwrap();
        photo(temp.path(), "IMG_0001.JPG", "2023:04:05 06:07:08");
        photo(temp.path(), "IMG_0002.JPG", "2023:04:05 06:07:08");
        photo(temp.path(), "IMG_0003.JPG", "2024:01:02 03:04:05.123+01:00");
        fs::write(temp.path().join("notes.txt"), "[{\"File:MIMEType\": \"text/plain\"}]").unwrap();

        hrenamer(temp.path())
            .env("EXIFTOOL_BIN", &script)
            .args(["exif", "-j", "1", "-r", "."])
            .assert()
            .success()
            .stdout(predicate::str::contains("3 files renamed"))
            .stdout(predicate::str::contains("notes.txt cannot be renamed: unsupported file type text/plain"))
            .stdout(predicate::str::contains("1 error"));

        assert_eq!(
            names(temp.path()),
            vec![
                "2023-04-05_06h07m08s_001.jpg",
                "2023-04-05_06h07m08s_002.jpg",
                "2024-01-02_03h04m05s_001.jpg",
                "notes.txt",
            ]
        );

        hrenamer(temp.path())
            .args(["exif", "--exiftool"])
            .arg(&script)
            .args(["-r", "."])
            .assert()
            .success()
            .stdout(predicate::str::contains("is already renamed"))
            .stdout(predicate::str::contains("3 files already named"));
    }

    #[test]
    fn test_exif_dry_run_reserves_indices() {
        let tools = TempDir::new().unwrap();
        let script = fake_exiftool(tools.path());
        let temp = TempDir::new().unwrap();
        photo(temp.path(), "a.jpg", "2020:02:02 02:02:02");
        photo(temp.path(), "b.jpg", "2020:02:02 02:02:02");

        hrenamer(temp.path())
            .args(["exif", "-n", "-j", "1", "--exiftool"])
            .arg(&script)
            .args(["a.jpg", "b.jpg"])
            .assert()
            .success()
            .stdout(predicate::str::contains("a.jpg would be renamed 2020-02-02_02h02m02s_001.jpg"))
            .stdout(predicate::str::contains("b.jpg would be renamed 2020-02-02_02h02m02s_002.jpg"))
            .stdout(predicate::str::contains("2 files would be renamed"));

        assert_eq!(names(temp.path()), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_interrupt_exits_with_code_1_without_summary() {
        let tools = TempDir::new().unwrap();
        let script = tools.path().join("slow-exiftool");
        fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        let temp = TempDir::new().unwrap();
        for name in ["p1.jpg", "p2.jpg", "p3.jpg", "p4.jpg"] {
            photo(temp.path(), name, "2020:02:02 02:02:02");
        }

        let child = std::process::Command::new(env!("CARGO_BIN_EXE_hrenamer"))
            .current_dir(temp.path())
            .env("HOME", temp.path())
            .env_remove("RUST_LOG")
            .env_remove("EXIFTOOL_BIN")
            .args(["--no-color", "exif", "--exiftool"])
            .arg(&script)
            .arg(".")
            .arg("-r")
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(1500));
        let status = std::process::Command::new("kill")
            .args(["-INT", &child.id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let output = child.wait_with_output().unwrap();
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert_eq!(output.status.code(), Some(1), "stderr: {stderr}");
        assert!(stderr.contains("Interrupted"));
        assert!(!stdout.contains("renamed"), "stdout: {stdout}");
        assert!(!stdout.contains("error"), "stdout: {stdout}");
        assert_eq!(names(temp.path()), vec!["p1.jpg", "p2.jpg", "p3.jpg", "p4.jpg"]);
    }
}
