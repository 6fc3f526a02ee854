//! End-to-end tests for the `scalar_product` binary (derived from a signature).

use std::process::{Command, Output};

fn scalar_product(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scalar_product"))
        .args(args)
        .env_remove("SIGCMD_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Asserts that `needles` occur in `haystack` one after another.
fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut rest = haystack;
    for needle in needles {
        let idx = rest
            .find(needle)
            .unwrap_or_else(|| panic!("Expected {needle:?} in order in:\n{haystack}"));
        rest = &rest[idx + needle.len()..];
    }
}

#[test]
fn test_help() {
    let output = scalar_product(&["--help"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stderr(&output), "");
    let help = stdout(&output);

    assert!(help.contains("Computes a+(v|w)/b"));
    assert!(help.contains("<Epilog text>"));
    assert!(!help.contains("Options:"));
    assert!(!help.contains("optional arguments"));

    // Sections and arguments appear in declaration order.
    let help_body = &help[help.find("positional arguments:").unwrap()..];
    assert_in_order(
        help_body,
        &[
            "positional arguments:",
            "<a>",
            "[b]",
            "[lcoord]...",
            "keyword arguments:",
            "-h, --help",
            "-r, --rcoord <RCOORD>...",
            "-n, --name <NAME>",
            "-p, --polar",
            "<Epilog text>",
        ],
    );

    assert!(help.contains("show this help message and exit"));
    assert!(help.contains("float. Default: 1.0"));
    assert!(help.contains("str. Default: result. Give this name to the result"));
    assert!(help.contains("Return in polar form. <Extra help for the CLI>"));
}

#[test]
fn test_help_is_stable_across_runs() {
    let first = scalar_product(&["--help"]);
    let second = scalar_product(&["--help"]);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_ok() {
    let output = scalar_product(&[
        "1", "1", "3", "4", "-r", "3", "-4", "--polar", "--name", "R",
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stderr(&output), "");
    assert_eq!(
        stdout(&output),
        "R = 1.0 + [3+0j, 4+0j]x[3+0j, -4+0j]/1.0 = (6.0, 3.141592653589793)\n"
    );
}

#[test]
fn test_ok_cartesian_with_defaults() {
    let output = scalar_product(&["2", "--rcoord", "1+1j"]);

    // No lcoord, so the dimensions mismatch (0 vs 1).
    assert_eq!(output.status.code(), Some(3));

    let output = scalar_product(&["2", "2", "1j", "--rcoord", "1j"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "result = 2.0 + [0+1j]x[0+1j]/2.0 = 2.5+0j\n");
}

#[test]
fn test_raises_unhandled() {
    let output = scalar_product(&["nan", "-9", "3", "4", "-r", "3", "-4"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("Error: "), "Expected error report, got: {err}");
    assert!(err.contains("cannot offset by NaN"));
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_raises_parser_error() {
    let output = scalar_product(&["1", "0", "3", "4i", "-r", "3", "-4"]);

    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("invalid complex value: '4i'"), "got: {err}");
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_missing_required_keyword() {
    let output = scalar_product(&["1"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--rcoord <RCOORD>..."));
}

#[test]
fn test_raises_dimension_mismatch() {
    let output = scalar_product(&["1", "0", "-r", "3"]);

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(
        stderr(&output),
        "DimensionMismatchError: Vectors should have the same dimension\n"
    );
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_raises_zero_division() {
    let output = scalar_product(&["1", "0", "3", "4", "-r", "3", "-4"]);

    assert_eq!(output.status.code(), Some(4));
    assert_eq!(stderr(&output), "ZeroDivisionError: complex division by zero\n");
    assert_eq!(stdout(&output), "");
}
