//! Integration tests for the CLI application
//!
//! These tests run the compiled binary on small LibSVM files.

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

/// Helper to create test data files
struct TestDataFiles {
    pub binary_file: NamedTempFile,
    pub multiclass_file: NamedTempFile,
    pub test_file: NamedTempFile,
}

impl TestDataFiles {
    fn new() -> std::io::Result<Self> {
        let mut binary_file = NamedTempFile::new()?;
        writeln!(binary_file, "+1 1:1 2:2 3:3 4:4")?;
        writeln!(binary_file, "+1 1:-8 2:-6 3:-4 4:-2")?;
        writeln!(binary_file, "-1 1:4 2:3 3:2 4:1")?;
        writeln!(binary_file, "-1 1:-2 2:-4 3:-6 4:-8")?;
        binary_file.flush()?;

        let mut multiclass_file = NamedTempFile::new()?;
        writeln!(multiclass_file, "1 1:0.0 2:4.0")?;
        writeln!(multiclass_file, "2 1:4.0 2:0.0")?;
        writeln!(multiclass_file, "3 1:-4.0 2:-4.0")?;
        writeln!(multiclass_file, "1 1:0.5 2:4.5")?;
        writeln!(multiclass_file, "2 1:4.5 2:0.5")?;
        writeln!(multiclass_file, "3 1:-4.5 2:-3.5")?;
        multiclass_file.flush()?;

        let mut test_file = NamedTempFile::new()?;
        writeln!(test_file, "1 1:0.2 2:3.8")?;
        writeln!(test_file, "2 1:3.9 2:0.1")?;
        writeln!(test_file, "3 1:-4.2 2:-3.9")?;
        test_file.flush()?;

        Ok(TestDataFiles {
            binary_file,
            multiclass_file,
            test_file,
        })
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_svm-introspect"))
        .args(args)
        .output()
        .expect("Failed to run CLI")
}

fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("predict"));
    assert!(stdout.contains("inspect"));
    assert!(stdout.contains("tensor"));
}

#[test]
fn test_cli_version() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_predict_multiclass() {
    let files = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "predict",
        "--train",
        path(&files.multiclass_file),
        "--data",
        path(&files.test_file),
        "--kernel",
        "linear",
        "--decision-values",
    ]);

    assert!(
        output.status.success(),
        "Predict command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Predictions for 3 samples"));
    assert!(stdout.contains("Accuracy: 100.00%"));

    // index, label and three pairwise decision values
    let first = stdout.lines().nth(1).expect("missing prediction line");
    let fields: Vec<&str> = first.split_whitespace().collect();
    assert_eq!(fields.len(), 5);
    assert_eq!(fields[1], "1");
}

#[test]
fn test_cli_inspect() {
    let files = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "inspect",
        "--train",
        path(&files.multiclass_file),
        "--kernel",
        "linear",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Labels: [1.0, 2.0, 3.0]"));
    assert!(stdout.contains("Classifier 1 vs 2"));
    assert!(stdout.contains("Classifier 1 vs 3"));
    assert!(stdout.contains("Classifier 2 vs 3"));
}

#[test]
fn test_cli_tensor_json() {
    let files = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "tensor",
        "--train",
        path(&files.binary_file),
        "--order",
        "2",
        "--gamma",
        "1",
        "--coef0",
        "0.5",
        "--json",
    ]);

    assert!(
        output.status.success(),
        "Tensor command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be JSON");
    assert_eq!(report["order"], 2);
    assert_eq!(report["dim"], 4);
    assert_eq!(report["entries"].as_array().map(Vec::len), Some(16));
    assert_eq!(report["prefactor"].as_f64(), Some(1.0));
}

#[test]
fn test_cli_tensor_single_entry() {
    let files = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "tensor",
        "--train",
        path(&files.binary_file),
        "--order",
        "1",
        "--index",
        "2",
        "--gamma",
        "1",
        "--coef0",
        "0.5",
        "--labels",
        "-1,1",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Classifier 1 vs -1, order 1"));
    assert!(stdout.contains("T[2] = "));
}

#[test]
fn test_cli_tensor_order_above_degree_fails() {
    let files = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "tensor",
        "--train",
        path(&files.binary_file),
        "--order",
        "3",
        "--degree",
        "2",
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Domain error"));
}

#[test]
fn test_cli_tensor_needs_labels_for_multiclass() {
    let files = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "tensor",
        "--train",
        path(&files.multiclass_file),
        "--order",
        "1",
    ]);
    assert!(!output.status.success());

    let output = run(&[
        "tensor",
        "--train",
        path(&files.multiclass_file),
        "--order",
        "1",
        "--labels",
        "3,1",
    ]);
    assert!(output.status.success());
}

#[test]
fn test_cli_expected_labels_mismatch() {
    let files = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "inspect",
        "--train",
        path(&files.multiclass_file),
        "--expected-labels",
        "2",
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Inconsistent model"));
}

#[test]
fn test_cli_config_file() {
    let files = TestDataFiles::new().expect("Failed to create test data");

    let mut config = NamedTempFile::new().expect("Failed to create config file");
    writeln!(config, r#"{{"c": 0.0}}"#).expect("Failed to write");
    config.flush().expect("Failed to flush");

    let output = run(&[
        "inspect",
        "--train",
        path(&files.binary_file),
        "--config",
        path(&config),
    ]);

    // C = 0 is rejected by the solver
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Training failed"));
}

#[test]
fn test_cli_precomputed_matches_raw() {
    let files = TestDataFiles::new().expect("Failed to create test data");
    let base = [
        "tensor",
        "--train",
        path(&files.binary_file),
        "--order",
        "1",
        "--gamma",
        "1",
        "--coef0",
        "0.5",
        "--json",
    ];

    let raw = run(&base);
    let mut with_flag = base.to_vec();
    with_flag.push("--precomputed");
    let precomputed = run(&with_flag);

    assert!(raw.status.success() && precomputed.status.success());
    let raw: serde_json::Value = serde_json::from_slice(&raw.stdout).unwrap();
    let precomputed: serde_json::Value = serde_json::from_slice(&precomputed.stdout).unwrap();

    let raw_entries = raw["entries"].as_array().unwrap();
    let pre_entries = precomputed["entries"].as_array().unwrap();
    for (a, b) in raw_entries.iter().zip(pre_entries) {
        let (a, b) = (a.as_f64().unwrap(), b.as_f64().unwrap());
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }
}

#[test]
fn test_cli_missing_file() {
    let output = run(&["inspect", "--train", "/non/existent/file.libsvm"]);
    assert!(!output.status.success());
}
