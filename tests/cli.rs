use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

mod common;

use common::Entry;

fn regionlab() -> Command {
    let mut cmd = Command::cargo_bin("regionlab").unwrap();
    cmd.env_remove("REGIONLAB_SCHEMA")
        .env_remove("REGIONLAB_ROOT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn runs() {
    regionlab().assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = regionlab();
    cmd.arg("-V");
    cmd.assert().success().stdout("regionlab 0.1.0\n");
}

#[test]
fn review_help_lists_key_bindings() {
    let mut cmd = regionlab();
    cmd.args(["review", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Press 'p' to purge"));
}

#[test]
fn classes_prints_legend() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let classes = common::write_classes(temp.path(), &["Car", "Van"]);

    let mut cmd = regionlab();
    cmd.arg("classes").arg(&classes);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(0) :Car").and(predicate::str::contains("(1) :Van")));
}

#[test]
fn review_replays_events_and_saves() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images_dir, labels_dir) = common::write_review_dataset(
        temp.path(),
        &[Entry {
            stem: "frame",
            width: 640,
            height: 480,
            labels: "",
        }],
    );
    let classes = common::write_classes(temp.path(), &["person"]);
    let events = temp.path().join("events.txt");
    common::write_text(
        &events,
        "# draw and save\ndown 10 10\nmove 30 30\nup 50 40\nkey 0\nkey s\nkey esc\nkey d\n",
    );

    let mut cmd = regionlab();
    cmd.arg("review")
        .arg(&images_dir)
        .arg(&labels_dir)
        .arg(&classes)
        .args(["--schema", "yolo", "--output", "json"])
        .arg("--events")
        .arg(&events);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"stopped_by\": \"exit\""))
        .stdout(predicate::str::contains("\"events_processed\": 6"));

    assert_eq!(
        fs::read_to_string(labels_dir.join("frame.txt")).expect("read labels"),
        "0 0.046875 0.052083 0.0625 0.0625\n"
    );
}

#[test]
fn review_schema_from_env() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images_dir, labels_dir) = common::write_review_dataset(
        temp.path(),
        &[Entry {
            stem: "a",
            width: 100,
            height: 100,
            labels: "0 0.5 0.5 0.2 0.2\n",
        }],
    );
    let classes = common::write_classes(temp.path(), &["dog"]);

    let mut cmd = regionlab();
    cmd.env("REGIONLAB_SCHEMA", "normalized")
        .arg("review")
        .arg(&images_dir)
        .arg(&labels_dir)
        .arg(&classes);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("regions: 1 (0 selected)"));
}

#[test]
fn malformed_event_script_fails_with_line_number() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images_dir, labels_dir) = common::write_review_dataset(
        temp.path(),
        &[Entry {
            stem: "a",
            width: 10,
            height: 10,
            labels: "",
        }],
    );
    let classes = common::write_classes(temp.path(), &["Car"]);
    let events = temp.path().join("events.txt");
    common::write_text(&events, "tick\nwiggle 1 2\n");

    let mut cmd = regionlab();
    cmd.arg("review")
        .arg(&images_dir)
        .arg(&labels_dir)
        .arg(&classes)
        .arg("--events")
        .arg(&events);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid event script line 2"));
}

#[test]
fn review_of_empty_dataset_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images_dir, labels_dir) = common::write_review_dataset(temp.path(), &[]);
    let classes = common::write_classes(temp.path(), &["Car"]);

    let mut cmd = regionlab();
    cmd.arg("review")
        .arg(&images_dir)
        .arg(&labels_dir)
        .arg(&classes);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No dataset entries found"));
}

#[test]
fn capture_exports_numbered_pairs() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let frames = temp.path().join("frames");
    common::write_frames(&frames, 4, 32, 32);
    let classes = common::write_classes(temp.path(), &["cat"]);
    let root = temp.path().join("dataset");
    let events = temp.path().join("events.txt");
    common::write_text(
        &events,
        "down 4 4\nup 12 12\nkey 0\nkey space\ntick\ntick\nkey space\n",
    );

    let mut cmd = regionlab();
    cmd.arg("capture")
        .arg(&frames)
        .arg(&classes)
        .arg("shot_")
        .arg("--root")
        .arg(&root)
        .arg("--events")
        .arg(&events);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("exported: 3"));

    for n in 0..3 {
        assert!(root.join(format!("images/shot_{n:06}.jpg")).is_file());
        assert_eq!(
            fs::read_to_string(root.join(format!("labels/shot_{n:06}.txt"))).expect("read label"),
            "cat 0.00 0 0.00 4.00 4.00 12.00 12.00 0.00 0.00 0.00 0.00 0.00 0.00 0.00\n"
        );
    }
    assert!(!root.join("images/shot_000003.jpg").exists());
}

#[test]
fn capture_without_events_runs_to_end_of_stream() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let frames = temp.path().join("frames");
    common::write_frames(&frames, 2, 8, 8);
    let classes = common::write_classes(temp.path(), &["cat"]);
    let root = temp.path().join("dataset");

    let mut cmd = regionlab();
    cmd.arg("capture")
        .arg(&frames)
        .arg(&classes)
        .arg("f_")
        .arg("--root")
        .arg(&root);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("stopped: EndOfStream"));
}

#[test]
fn capture_from_missing_source_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let classes = common::write_classes(temp.path(), &["cat"]);

    let mut cmd = regionlab();
    cmd.arg("capture")
        .arg(temp.path().join("no_frames"))
        .arg(&classes)
        .arg("f_")
        .arg("--root")
        .arg(temp.path().join("dataset"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("is unavailable"));
}

#[test]
fn review_reads_events_from_stdin() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images_dir, labels_dir) = common::write_review_dataset(
        temp.path(),
        &[
            Entry {
                stem: "a",
                width: 10,
                height: 10,
                labels: "",
            },
            Entry {
                stem: "b",
                width: 10,
                height: 10,
                labels: "",
            },
        ],
    );
    let classes = common::write_classes(temp.path(), &["Car"]);

    let mut cmd = regionlab();
    cmd.arg("review")
        .arg(&images_dir)
        .arg(&labels_dir)
        .arg(&classes)
        .args(["--events", "-"])
        .write_stdin("key d\nkey d\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("position: 3"))
        .stdout(predicate::str::contains("b.bmp"));
}

#[test]
fn review_survives_extreme_pointer_coordinates() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images_dir, labels_dir) = common::write_review_dataset(
        temp.path(),
        &[Entry {
            stem: "a",
            width: 10,
            height: 10,
            labels: "Car 0.00 0 0.00 -3e9 0.00 3e9 10.00 0 0 0 0 0 0 0\n",
        }],
    );
    let classes = common::write_classes(temp.path(), &["Car"]);

    let mut cmd = regionlab();
    cmd.arg("review")
        .arg(&images_dir)
        .arg(&labels_dir)
        .arg(&classes)
        .args(["--events", "-"])
        .write_stdin(
            "down 2147483647 0\nup -2147483648 0\nrdown -5 5\nmove -2147483648 2147483647\nrup 0 0\n",
        );
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("regions: 1 (1 selected)"));
}
