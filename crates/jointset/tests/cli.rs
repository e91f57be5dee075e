use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const JOINTS: &str = "Dip Direction,Dip Angle,Note\n\
90,45,a\n\
92,44,b\n\
270,46,c\n\
268,45,d\n\
n/a,30,e\n";

#[test]
fn test_classifies_csv_and_writes_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("joints.csv");
    fs::write(&input, JOINTS).unwrap();
    let out = dir.path().join("out");

    Command::cargo_bin("jointset")
        .unwrap()
        .arg(&input)
        .args(["-k", "2", "--seed", "42", "--json"])
        .arg("--output-dir")
        .arg(&out)
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Joint sets (K=2)"))
        .stdout(predicate::str::contains("4 kept, 1 dropped of 5"));

    let csv = fs::read_to_string(out.join("joints_joint_sets.csv")).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows[0], "dip direction,dip angle,joint_set");
    assert_eq!(rows.len(), 5);

    let label = |row: &str| row.rsplit(',').next().unwrap().to_string();
    assert_eq!(label(rows[1]), label(rows[2]));
    assert_eq!(label(rows[3]), label(rows[4]));
    assert_ne!(label(rows[1]), label(rows[3]));

    assert!(out.join("joints_stereonet.svg").exists());
    assert!(out.join("joints_report.json").exists());
}

#[test]
fn test_same_seed_same_labels() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("joints.csv");
    let mut body = String::from("dip direction,dip angle\n");
    for i in 0..50 {
        body.push_str(&format!("{},{}\n", (i * 47) % 360, (i * 11) % 90));
    }
    fs::write(&input, body).unwrap();

    let mut outputs = Vec::new();
    for run in ["a", "b"] {
        let out = dir.path().join(run);
        Command::cargo_bin("jointset")
            .unwrap()
            .arg(&input)
            .args(["-k", "4", "--seed", "7", "--no-plot"])
            .arg("--output-dir")
            .arg(&out)
            .assert()
            .success();
        outputs.push(fs::read_to_string(out.join("joints_joint_sets.csv")).unwrap());
        assert!(!out.join("joints_stereonet.svg").exists());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn test_missing_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(&input, "azimuth,dip angle\n10,20\n").unwrap();

    Command::cargo_bin("jointset")
        .unwrap()
        .arg(&input)
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("dip direction"));
}

#[test]
fn test_k_out_of_range_rejected_by_cli() {
    Command::cargo_bin("jointset")
        .unwrap()
        .args(["whatever.csv", "-k", "11"])
        .assert()
        .failure();
}

#[test]
fn test_k_above_rows_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("two.csv");
    fs::write(&input, "dip direction,dip angle\n10,20\n200,60\n").unwrap();

    Command::cargo_bin("jointset")
        .unwrap()
        .arg(&input)
        .args(["-k", "5"])
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}
