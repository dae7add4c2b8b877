//! CSV boundary of the engine.
//!
//! Reads the attendance, charge-rate and PO tables into typed models and
//! writes annexures, the master summary, the error report, bills and the run
//! report. Nothing in here computes amounts.

mod reader;
mod writer;

pub use reader::{
    clean_numeric, parse_attendance, parse_charge_rules, parse_date, parse_po_directory,
    read_attendance, read_charge_rules, read_po_directory,
};
pub use writer::{
    ERROR_REASON_HEADER, ERROR_REPORT_FILE, MASTER_SUMMARY_FILE, OutputWriter, RUN_REPORT_FILE,
    write_annexure_csv, write_error_report_csv, write_summary_csv,
};
