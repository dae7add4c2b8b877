//! Integration tests for the billing engine.
//!
//! This test suite drives complete billing runs against the fixture
//! configuration in `config/` and covers:
//! - Recurring billing of a mixed attendance table
//! - Annexure layout, totals rows and tax column suppression
//! - Master summary with PO numbers
//! - Bill template filling
//! - Error report contents
//! - One-time (new joiner) billing
//! - Configuration and input errors

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use billing_engine::config::{BillingMode, ConfigLoader};
use billing_engine::error::EngineError;
use billing_engine::runner::{run, RunReport};
use billing_engine::tabular::{ERROR_REPORT_FILE, MASTER_SUMMARY_FILE, RUN_REPORT_FILE};

// =============================================================================
// Test Helpers
// =============================================================================

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn invoice_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 27).unwrap()
}

/// A unique output directory under the system temp directory.
fn temp_output_dir() -> PathBuf {
    std::env::temp_dir().join(format!("billing-engine-it-{}", uuid::Uuid::new_v4()))
}

/// The fixture configuration, writing to `output_dir` in the given mode.
fn create_loader(output_dir: &Path, mode: BillingMode) -> ConfigLoader {
    let fixture = ConfigLoader::load("./config/billing.yaml").expect("Failed to load config");
    let mut config = fixture.config().clone();
    config.output.directory = output_dir.to_path_buf();
    config.billing.mode = mode;
    ConfigLoader::from_config(config, Path::new("")).unwrap()
}

fn run_fixture(mode: BillingMode) -> (RunReport, PathBuf) {
    let output_dir = temp_output_dir();
    let report = run(&create_loader(&output_dir, mode), invoice_date()).unwrap();
    (report, output_dir)
}

/// Reads a CSV output as rows of trimmed cells, header included.
fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect()
}

/// The cell under `header` in `row`.
fn column<'a>(rows: &'a [Vec<String>], row: usize, header: &str) -> &'a str {
    let index = rows[0]
        .iter()
        .position(|h| h == header)
        .unwrap_or_else(|| panic!("no column {header} in {:?}", rows[0]));
    &rows[row][index]
}

fn cleanup(output_dir: &Path) {
    let _ = fs::remove_dir_all(output_dir);
}

// =============================================================================
// Recurring Billing
// =============================================================================

/// IT-001: every record is either billed or reported
#[test]
fn test_recurring_run_counts() {
    let (report, output_dir) = run_fixture(BillingMode::Recurring);

    assert_eq!(report.processed, 6);
    assert_eq!(report.billed, 4);
    assert_eq!(report.errored, 2);
    assert_eq!(report.billed + report.errored, report.processed);
    assert_eq!(report.groups, 3);
    assert_eq!(report.annexures.len(), 3);
    assert!(report.master_summary.is_some());
    assert!(report.error_report.is_some());

    cleanup(&output_dir);
}

/// IT-002: annexure of an intra-state group with a percent and a flat charge
#[test]
fn test_annexure_intra_state_group() {
    let (_, output_dir) = run_fixture(BillingMode::Recurring);
    let rows = read_csv(&output_dir.join("Ravi_Kumar_Globex_Ltd.csv"));

    // Header, two employees, totals row.
    assert_eq!(rows.len(), 4);
    assert!(rows[0].contains(&"CGST @9%".to_string()));
    assert!(!rows[0].contains(&"IGST @18%".to_string()));

    assert_eq!(column(&rows, 1, "Employee Code"), "E001");
    assert_eq!(decimal(column(&rows, 1, "No of Saturdays")), decimal("4"));
    assert_eq!(decimal(column(&rows, 1, "Total Payable Days")), decimal("31"));
    assert_eq!(decimal(column(&rows, 1, "Charges")), decimal("6200"));
    assert_eq!(decimal(column(&rows, 1, "Grand Total")), decimal("80476"));

    assert_eq!(column(&rows, 2, "Employee Code"), "E002");
    assert_eq!(decimal(column(&rows, 2, "No of Saturdays")), Decimal::ZERO);
    assert_eq!(decimal(column(&rows, 2, "Charges")), decimal("1500"));

    assert_eq!(column(&rows, 3, "Kind Attention Person"), "TOTAL");
    assert_eq!(decimal(column(&rows, 3, "Total")), decimal("97700"));
    assert_eq!(decimal(column(&rows, 3, "CGST @9%")), decimal("8793"));
    assert_eq!(decimal(column(&rows, 3, "Grand Total")), decimal("115286"));

    cleanup(&output_dir);
}

/// IT-003: annexure of an inter-state group drops CGST and SGST
#[test]
fn test_annexure_inter_state_group() {
    let (_, output_dir) = run_fixture(BillingMode::Recurring);
    let rows = read_csv(&output_dir.join("Meera_Iyer_Initech.csv"));

    assert_eq!(rows.len(), 3);
    assert!(rows[0].contains(&"IGST @18%".to_string()));
    assert!(!rows[0].iter().any(|h| h.starts_with("CGST") || h.starts_with("SGST")));

    assert_eq!(decimal(column(&rows, 1, "Eligible Days")), decimal("23"));
    assert_eq!(decimal(column(&rows, 1, "Total Payable Billing")), decimal("23000"));
    assert_eq!(decimal(column(&rows, 1, "Charges")), decimal("1840"));
    assert_eq!(decimal(column(&rows, 1, "IGST @18%")), decimal("4561.20"));

    assert_eq!(decimal(column(&rows, 2, "IGST @18%")), decimal("4561"));
    assert_eq!(decimal(column(&rows, 2, "Grand Total")), decimal("29901"));

    cleanup(&output_dir);
}

/// IT-004: differential records bill their base amount without charge
#[test]
fn test_differential_group() {
    let (_, output_dir) = run_fixture(BillingMode::Recurring);
    let rows = read_csv(&output_dir.join("Anita_Desai_Umbrella_Corp.csv"));

    assert_eq!(decimal(column(&rows, 1, "Total Payable Billing")), decimal("5000"));
    assert_eq!(decimal(column(&rows, 1, "Charges")), Decimal::ZERO);
    assert_eq!(decimal(column(&rows, 1, "No of days")), Decimal::ZERO);
    assert_eq!(decimal(column(&rows, 1, "Total")), decimal("5250"));
    assert_eq!(column(&rows, 1, "Remark"), "Rate revision");

    // 472.50 rounds up to 473 on both halves.
    assert_eq!(decimal(column(&rows, 2, "SGST @9%")), decimal("473"));
    assert_eq!(decimal(column(&rows, 2, "Grand Total")), decimal("6196"));

    cleanup(&output_dir);
}

// =============================================================================
// Master Summary
// =============================================================================

/// IT-005: one row per group in key order, PO details, grand total
#[test]
fn test_master_summary() {
    let (_, output_dir) = run_fixture(BillingMode::Recurring);
    let rows = read_csv(&output_dir.join(MASTER_SUMMARY_FILE));

    assert_eq!(rows.len(), 5);
    assert_eq!(column(&rows, 1, "Kind Attention Person"), "Anita Desai");
    assert_eq!(column(&rows, 1, "PO Number"), "");
    assert_eq!(column(&rows, 2, "Kind Attention Person"), "Meera Iyer");
    assert_eq!(column(&rows, 2, "PO Number"), "PO-5120");
    assert_eq!(column(&rows, 3, "PO Number"), "PO-4471");
    assert_eq!(column(&rows, 3, "Validity"), "31-03-2026");
    assert_eq!(decimal(column(&rows, 3, "No of Employees")), decimal("2"));

    assert_eq!(column(&rows, 4, "Kind Attention Person"), "GRAND TOTAL");
    assert_eq!(decimal(column(&rows, 4, "No of Employees")), decimal("4"));
    assert_eq!(decimal(column(&rows, 4, "Total Amount")), decimal("128290"));
    assert_eq!(decimal(column(&rows, 4, "IGST")), decimal("4561"));
    assert_eq!(decimal(column(&rows, 4, "Grand Total")), decimal("151383"));

    cleanup(&output_dir);
}

// =============================================================================
// Bills
// =============================================================================

/// IT-006: a bill is written only for groups with a template
#[test]
fn test_bill_from_template() {
    let (report, output_dir) = run_fixture(BillingMode::Recurring);

    assert_eq!(report.bills.len(), 1);
    let bill = fs::read_to_string(output_dir.join("Ravi_Kumar_Globex_Ltd_bill.txt")).unwrap();

    assert!(bill.contains("Invoice Date: 27-02-2026"));
    assert!(bill.contains("Due Date:     02-03-2026"));
    assert!(bill.contains("PO Number:    PO-4471 (valid till 31-03-2026)"));
    assert!(bill.contains("for the period 21 Jan 2026 to 20 Feb 2026"));
    assert!(bill.contains("Contract Value        97700"));
    assert!(bill.contains("CGST @9%              8793"));
    assert!(bill.contains("IGST @18%             0"));
    assert!(bill.contains("Grand Total           115286"));
    assert!(bill.contains("One Lakh Fifteen Thousand Two Hundred Eighty Six Only"));
    assert!(!bill.contains("{{"));

    assert!(!output_dir.join("Meera_Iyer_Initech_bill.txt").exists());

    cleanup(&output_dir);
}

// =============================================================================
// Error Report
// =============================================================================

/// IT-007: excluded records and their reasons
#[test]
fn test_error_report() {
    let (_, output_dir) = run_fixture(BillingMode::Recurring);
    let rows = read_csv(&output_dir.join(ERROR_REPORT_FILE));

    assert_eq!(rows.len(), 3);
    assert_eq!(column(&rows, 1, "Employee Code"), "E004");
    assert_eq!(column(&rows, 1, "LDW"), "31-12-2025");
    assert_eq!(column(&rows, 1, "System Error Reason"), "DOL before Billing Cycle");
    assert_eq!(column(&rows, 2, "Employee Code"), "E005");
    assert_eq!(
        column(&rows, 2, "System Error Reason"),
        "Eligible Days (31) not matching Payable Days (28)"
    );

    cleanup(&output_dir);
}

/// IT-008: the run report mirrors the returned report
#[test]
fn test_run_report_json() {
    let (report, output_dir) = run_fixture(BillingMode::Recurring);
    let json: Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join(RUN_REPORT_FILE)).unwrap())
            .unwrap();

    assert_eq!(json["run_id"], report.run_id.to_string());
    assert_eq!(json["mode"], "recurring");
    assert_eq!(json["processed"], 6);
    assert_eq!(json["errored"], 2);
    assert_eq!(json["annexures"].as_array().unwrap().len(), 3);

    cleanup(&output_dir);
}

// =============================================================================
// One-Time Billing
// =============================================================================

/// IT-009: only employees who joined in the month are billed, unscaled
#[test]
fn test_one_time_run() {
    let (report, output_dir) = run_fixture(BillingMode::OneTime);

    assert_eq!(report.processed, 1);
    assert_eq!(report.billed, 1);
    assert_eq!(report.errored, 0);
    assert_eq!(report.skipped, 0);
    assert!(report.error_report.is_none());
    assert!(!output_dir.join(ERROR_REPORT_FILE).exists());

    let rows = read_csv(&output_dir.join("Meera_Iyer_Initech.csv"));
    assert_eq!(column(&rows, 1, "Employee Name"), "Kiran Das");
    assert_eq!(column(&rows, 1, "Reporting Person"), "Arun Pillai");
    assert_eq!(column(&rows, 1, "Date of Joining"), "02-02-2026");
    assert_eq!(decimal(column(&rows, 1, "Charges")), decimal("2480"));
    assert_eq!(decimal(column(&rows, 1, "IGST @18%")), decimal("446.40"));
    assert_eq!(decimal(column(&rows, 2, "Grand Total")), decimal("2926"));

    cleanup(&output_dir);
}

// =============================================================================
// Error Cases
// =============================================================================

/// IT-010: a missing attendance table fails the run
#[test]
fn test_missing_attendance_table() {
    let output_dir = temp_output_dir();
    let fixture = create_loader(&output_dir, BillingMode::Recurring);
    let mut config = fixture.config().clone();
    config.inputs.attendance = PathBuf::from("/nonexistent/attendance.csv");
    let loader = ConfigLoader::from_config(config, Path::new("")).unwrap();

    match run(&loader, invoice_date()) {
        Err(EngineError::InputNotFound { path }) => assert!(path.contains("attendance.csv")),
        other => panic!("Expected InputNotFound error, got {:?}", other),
    }
    assert!(!output_dir.exists());
}

/// IT-011: a missing PO table is tolerated
#[test]
fn test_missing_po_table_leaves_po_blank() {
    let output_dir = temp_output_dir();
    let fixture = create_loader(&output_dir, BillingMode::Recurring);
    let mut config = fixture.config().clone();
    config.inputs.po_numbers = Some(PathBuf::from("/nonexistent/po_numbers.csv"));
    let loader = ConfigLoader::from_config(config, Path::new("")).unwrap();

    let report = run(&loader, invoice_date()).unwrap();
    let rows = read_csv(report.master_summary.as_ref().unwrap());
    assert!((1..rows.len()).all(|row| column(&rows, row, "PO Number").is_empty()));

    cleanup(&output_dir);
}

/// IT-012: an invalid month is rejected at load time
#[test]
fn test_invalid_month_rejected() {
    let fixture = ConfigLoader::load("./config/billing.yaml").unwrap();
    let mut config = fixture.config().clone();
    config.billing.month = 0;

    let result = ConfigLoader::from_config(config, Path::new(""));
    assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
}

// =============================================================================
// File Naming
// =============================================================================

/// IT-013: one file per split key, even for names with spaces, underscores or slashes
#[test]
fn test_groups_sharing_a_split_key_write_one_annexure() {
    let output_dir = temp_output_dir();
    let input_dir = temp_output_dir();
    fs::create_dir_all(&input_dir).unwrap();
    let attendance = input_dir.join("attendance.csv");
    let header = fs::read_to_string("./config/data/attendance.csv").unwrap();
    let header = header.lines().next().unwrap();
    let rows = [
        "Ravi Kumar,Pune,Globex Ltd,E101,Asha Rao,Analyst,Neha Joshi,Monthly,6 days,28000,23,1,0,0,0,0,,,,,",
        "Ravi_Kumar,Pune,Globex Ltd,E102,Vikram Shah,Analyst,Neha Joshi,Monthly,6 days,28000,23,1,0,0,0,0,,,,,",
        "R/D Team,Pune,Globex Ltd,E103,Kiran Das,Analyst,Neha Joshi,Monthly,6 days,28000,23,1,0,0,0,0,,,,,",
    ];
    fs::write(&attendance, format!("{}\n{}\n", header, rows.join("\n"))).unwrap();

    let fixture = create_loader(&output_dir, BillingMode::Recurring);
    let mut config = fixture.config().clone();
    config.inputs.attendance = attendance;
    let loader = ConfigLoader::from_config(config, Path::new("")).unwrap();

    let report = run(&loader, invoice_date()).unwrap();
    assert_eq!(report.billed, 3);
    assert_eq!(report.groups, 2);
    assert_eq!(report.annexures.len(), 2);
    assert_ne!(report.annexures[0], report.annexures[1]);
    assert!(report.annexures.contains(&output_dir.join("R_D_Team_Globex_Ltd.csv")));
    assert_eq!(report.bills.len(), 1);

    let rows = read_csv(&output_dir.join("Ravi_Kumar_Globex_Ltd.csv"));
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3][0], "TOTAL");

    cleanup(&output_dir);
    cleanup(&input_dir);
}
