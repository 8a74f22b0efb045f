//! Integration tests for the ACH encoder CLI.
//!
//! These tests run the actual binary and verify output against expected ACH files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

const ENTRY_COLUMNS: &str = "service_class,sec_code,company_name,company_data,company_id,description,descriptive_date,effective_date,origin_dfi,transaction_code,routing_number,account_number,amount,id_number,name,discretionary_data,addenda";

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given input files and return stdout
fn run_encoder(header_file: &str, entries_file: &str) -> String {
    let mut cmd = Command::cargo_bin("ach-encoder").unwrap();
    let assert = cmd.arg(header_file).arg(entries_file).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

fn temp_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_two_batches_match_expected_file() {
    let output = run_encoder(
        &test_data_path("header.csv"),
        &test_data_path("two_batches.csv"),
    );
    let expected = fs::read_to_string(test_data_path("expected_two_batches.ach")).unwrap();

    assert_eq!(output, expected);
}

#[test]
fn test_whitespace_handling() {
    let output = run_encoder(
        &test_data_path("header.csv"),
        &test_data_path("whitespace.csv"),
    );
    let expected = fs::read_to_string(test_data_path("expected_two_batches.ach")).unwrap();

    assert_eq!(output, expected);
}

#[test]
fn test_output_lines_are_fixed_width_blocks() {
    let output = run_encoder(
        &test_data_path("header.csv"),
        &test_data_path("two_batches.csv"),
    );

    let lines: Vec<&str> = output.split('\n').collect();
    assert_eq!(lines.len() % 10, 0);
    for line in &lines {
        assert_eq!(line.len(), 94, "Line has wrong width: {:?}", line);
    }
    assert!(!output.ends_with('\n'));
}

#[test]
fn test_single_entry_is_padded_with_filler() {
    let entries = temp_csv(&format!(
        "{}\n220,PPD,Acme Corp,,1234567890,Refund,,2024-02-29,09100001,32,011401533,555,0.01,,Jane Doe,,\n",
        ENTRY_COLUMNS
    ));

    let output = run_encoder(
        &test_data_path("header.csv"),
        entries.path().to_str().unwrap(),
    );
    let lines: Vec<&str> = output.split('\n').collect();

    assert_eq!(lines.len(), 10);
    assert!(lines[1].starts_with("5220Acme Corp"));
    assert!(lines[2].starts_with("632011401533555"));
    assert!(lines[3].starts_with("8220000001"));
    assert!(lines[4].starts_with("9000001000001"));
    for filler in &lines[5..] {
        assert_eq!(*filler, "9".repeat(94));
    }
}

#[test]
fn test_invalid_row_fails_with_row_number() {
    let entries = temp_csv(&format!(
        "{}\n220,CCD,A company name that is too long,,ID,Desc,,2023-01-01,01140153,22,091000019,123,1.00,,Name,,\n",
        ENTRY_COLUMNS
    ));

    let mut cmd = Command::cargo_bin("ach-encoder").unwrap();
    cmd.arg(test_data_path("header.csv"))
        .arg(entries.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 2").and(predicate::str::contains("company name")));
}

#[test]
fn test_unknown_service_class_fails() {
    let entries = temp_csv(&format!(
        "{}\n280,CCD,Co,,ID,Desc,,2023-01-01,01140153,22,091000019,123,1.00,,Name,,\n",
        ENTRY_COLUMNS
    ));

    let mut cmd = Command::cargo_bin("ach-encoder").unwrap();
    cmd.arg(test_data_path("header.csv"))
        .arg(entries.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown code '280'"));
}

#[test]
fn test_invalid_header_fails() {
    let header = temp_csv(
        "origin_routing,origin_name,destination_routing,destination_name,creation,file_id_modifier,reference_code\n0114015,,091000019,,2023-01-01 00:00,A,\n",
    );

    let mut cmd = Command::cargo_bin("ach-encoder").unwrap();
    cmd.arg(header.path())
        .arg(test_data_path("two_batches.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("immediate origin"));
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("ach-encoder").unwrap();
    cmd.arg("nonexistent.csv")
        .arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("Error")));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("ach-encoder").unwrap();
    cmd.arg(test_data_path("header.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}
