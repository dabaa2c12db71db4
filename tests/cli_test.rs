//! Headless traffic light runs
//!
//! Runs the built binary and checks the summary it logs to stderr.

use std::process::{Command, Output};

fn run_headless(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_traffic_light"))
        .args(args)
        .env("RUST_LOG", "warn,traffic_light=info")
        .output()
        .expect("Failed to execute traffic light")
}

/// Fast run: 5ms time units, two vehicles crossing once each
const FAST_ARGS: &[&str] = &[
    "--time-unit-ms",
    "5",
    "--vehicles",
    "2",
    "--crossings",
    "1",
    "--seed",
    "3",
];

/// Test that the headless run completes and logs its summary
#[test]
fn test_headless_run_completes() {
    let output = run_headless(FAST_ARGS);

    assert!(
        output.status.success(),
        "Traffic light run failed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Run did not complete properly. stderr: {}",
        stderr
    );
    assert!(stderr.contains("Light cycles completed:"));
    assert!(stderr.contains("Final phase:"));
}

/// Test that every vehicle crossing is counted
#[test]
fn test_all_crossings_counted() {
    let output = run_headless(FAST_ARGS);
    assert!(output.status.success(), "Traffic light run failed");

    let stderr = String::from_utf8_lossy(&output.stderr);
    let crossings_line = stderr
        .lines()
        .find(|line| line.contains("Total crossings:"))
        .expect("Could not find 'Total crossings' line");

    let parts: Vec<&str> = crossings_line.split("Total crossings:").collect();
    let crossings: usize = parts
        .get(1)
        .and_then(|s| s.trim().parse().ok())
        .expect("Could not parse crossings count");
    assert_eq!(crossings, 2);

    assert_eq!(stderr.matches("crossed on green").count(), 2);
}

/// Test that an inverted cycle range is rejected before anything starts
#[test]
fn test_invalid_cycle_range_fails() {
    let output = run_headless(&["--min-cycle", "6", "--max-cycle", "4"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid traffic light configuration"),
        "Missing configuration error. stderr: {}",
        stderr
    );
}

/// Test that a time unit too long to schedule is a configuration error, not a panic
#[test]
fn test_oversized_time_unit_fails() {
    let output = run_headless(&["--time-unit-ms", "18446744073709551615"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid traffic light configuration"),
        "Missing configuration error. stderr: {}",
        stderr
    );
    assert!(!stderr.contains("panicked"), "Binary panicked. stderr: {}", stderr);
}
