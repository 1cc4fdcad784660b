//! Report directory: round trips preserve the digest; edits are detected.

use starpath_harness::report_dir::{read_report_dir, write_report_dir, ReportDirError};
use starpath_harness::runner::run_solve_world;
use starpath_harness::worlds::fixture;
use starpath_search::SearchPolicyV1;

fn written(name: &str) -> (tempfile::TempDir, starpath_harness::runner::SolveReportV1) {
    let world = fixture(name).unwrap().build().unwrap();
    let report = run_solve_world(&world, &SearchPolicyV1::default()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_report_dir(&report, dir.path()).unwrap();
    (dir, report)
}

#[test]
fn round_trip_every_fixture_kind() {
    for name in ["open_grid", "sealed_destination", "gauntlet"] {
        let (dir, report) = written(name);
        let stored = read_report_dir(dir.path()).unwrap();
        assert_eq!(&stored.digest, report.digest(), "{name}");
        assert_eq!(stored.is_solved(), report.is_solved(), "{name}");
        let digest_file = std::fs::read_to_string(dir.path().join("report_digest.txt")).unwrap();
        assert_eq!(digest_file, report.digest().as_str());
    }
}

#[test]
fn rewrite_overwrites_previous_report() {
    let (dir, _) = written("open_grid");
    let world = fixture("wormhole_shortcut").unwrap().build().unwrap();
    let second = run_solve_world(&world, &SearchPolicyV1::default()).unwrap();
    write_report_dir(&second, dir.path()).unwrap();
    assert_eq!(&read_report_dir(dir.path()).unwrap().digest, second.digest());
}

#[test]
fn single_byte_flip_is_detected() {
    let (dir, _) = written("gauntlet");
    let path = dir.path().join("report.json");
    let mut bytes = std::fs::read(&path).unwrap();
    let at = bytes
        .windows(b"\"energy_after\":".len())
        .position(|w| w == b"\"energy_after\":")
        .unwrap()
        + b"\"energy_after\":".len();
    bytes[at] = if bytes[at] == b'1' { b'2' } else { b'1' };
    std::fs::write(&path, bytes).unwrap();

    let err = read_report_dir(dir.path()).unwrap_err();
    assert!(
        matches!(err, ReportDirError::DigestMismatch { .. }),
        "{err}"
    );
}

#[test]
fn swapped_digest_is_detected() {
    let (a, _) = written("open_grid");
    let (b, _) = written("wormhole_shortcut");
    std::fs::copy(
        b.path().join("report_digest.txt"),
        a.path().join("report_digest.txt"),
    )
    .unwrap();
    assert!(matches!(
        read_report_dir(a.path()),
        Err(ReportDirError::DigestMismatch { .. })
    ));
}

#[test]
fn missing_report_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_report_dir(dir.path()),
        Err(ReportDirError::Missing { .. })
    ));
}
