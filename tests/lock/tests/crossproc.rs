//! Cross-process determinism: the `solve_fixture` binary prints identical
//! digests under different working directories and environments.

use std::path::Path;
use std::process::Command;

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

/// Run the binary with the given cwd and environment overrides.
fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = env!("CARGO_BIN_EXE_solve_fixture");

    let mut command = Command::new(bin);
    command
        .current_dir(work_dir)
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RUST_LOG");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });
    assert!(
        output.status.success(),
        "solve_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_four_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    assert!(
        baseline.contains("fixture=gauntlet policy=default world=sha256:"),
        "baseline output missing gauntlet line:\n{baseline}"
    );
    assert!(
        baseline.contains("fixture=sealed_destination policy=default")
            && baseline.contains("solutions=0"),
        "baseline output missing the unsolvable fixture"
    );

    let alt_cwd = std::env::temp_dir();
    let alt_cwd = alt_cwd.to_string_lossy();
    let variant_cwd = run_variant(&alt_cwd, &[]);
    assert_eq!(baseline, variant_cwd, "output differs when cwd changes to {alt_cwd}");

    let variant_locale = run_variant(&root, &[("LC_ALL", "C"), ("LANG", "C")]);
    assert_eq!(baseline, variant_locale, "output differs when LC_ALL=C LANG=C");

    let variant_noise = run_variant(
        &root,
        &[
            ("STARPATH_NOISE", "should_not_matter"),
            ("TZ", "America/New_York"),
            ("RUST_LOG", "trace"),
        ],
    );
    assert_eq!(
        baseline, variant_noise,
        "output differs with spurious env vars (STARPATH_NOISE, TZ, RUST_LOG)"
    );
}

#[test]
fn crossproc_matches_in_process_digest() {
    use starpath_harness::runner::run_solve_world;
    use starpath_harness::worlds::fixture;
    use starpath_search::SearchPolicyV1;

    let world = fixture("wormhole_shortcut").unwrap().build().unwrap();
    let report = run_solve_world(&world, &SearchPolicyV1::default()).unwrap();
    let expected = format!(
        "fixture=wormhole_shortcut policy=default world={} report={} solutions=1",
        report.world_digest,
        report.digest()
    );

    let output = run_variant(&workspace_root(), &[]);
    assert!(
        output.lines().any(|line| line == expected),
        "missing line {expected:?} in:\n{output}"
    );
}
