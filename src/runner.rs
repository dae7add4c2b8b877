//! End-to-end billing runs.
//!
//! [`run`] drives one batch from a loaded configuration: it reads the input
//! tables, bills every record, lays out the annexures and the master summary,
//! fills bills from templates and writes everything to the output directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::annexure::{
    build_annexures, fill_bill_template, AnnexureSheet, BillValues, MasterSummary, PoDirectory,
};
use crate::calculation::{run_billing, run_one_time, BillingContext, ChargeDefaults, ChargeResolver};
use crate::config::{BillingMode, ConfigLoader};
use crate::error::{EngineError, EngineResult};
use crate::models::{BillingMonth, ErrorRecord};
use crate::tabular::{read_attendance, read_charge_rules, read_po_directory, OutputWriter};

/// What a run did and where it wrote it.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique id of the calculation batch.
    pub run_id: Uuid,
    /// Billing mode.
    pub mode: BillingMode,
    /// The month billed.
    pub billing_month: BillingMonth,
    /// Records considered: every attendance row for recurring billing, every
    /// new joiner for one-time billing.
    pub processed: usize,
    /// Records that produced a line item.
    pub billed: usize,
    /// Records excluded with an error reason.
    pub errored: usize,
    /// New joiners skipped for want of a charge.
    pub skipped: usize,
    /// Number of client groups billed.
    pub groups: usize,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Annexure files, one per group.
    pub annexures: Vec<PathBuf>,
    /// Filled bills.
    pub bills: Vec<PathBuf>,
    /// Master summary file, when any group was billed.
    pub master_summary: Option<PathBuf>,
    /// Error report file, when any record was excluded.
    pub error_report: Option<PathBuf>,
}

struct Calculated {
    run_id: Uuid,
    processed: usize,
    skipped: usize,
    sheets: Vec<AnnexureSheet>,
    errors: Vec<ErrorRecord>,
}

/// Runs one billing batch as configured. `invoice_date` is printed on bills.
///
/// # Errors
///
/// Fails if a required input table is missing or malformed, or an output file
/// cannot be written. Problems with individual records never fail the run.
///
/// # Example
///
/// ```no_run
/// use billing_engine::config::ConfigLoader;
/// use billing_engine::runner::run;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/billing.yaml")?;
/// let report = run(&loader, NaiveDate::from_ymd_opt(2026, 2, 27).unwrap())?;
/// println!("{} billed, {} errors", report.billed, report.errored);
/// # Ok::<(), billing_engine::error::EngineError>(())
/// ```
pub fn run(loader: &ConfigLoader, invoice_date: NaiveDate) -> EngineResult<RunReport> {
    let start_time = Instant::now();
    let mode = loader.mode();
    let billing_month = loader.billing_month();

    let records = read_attendance(loader.attendance_path())?;
    let defaults = match mode {
        BillingMode::Recurring => ChargeDefaults::recurring(),
        BillingMode::OneTime => ChargeDefaults::one_time(),
    };
    let charges = ChargeResolver::new(read_charge_rules(loader.charges_path())?, defaults);
    let po_directory = load_po_directory(loader.po_numbers_path())?;

    let ctx = BillingContext::new(billing_month, &charges).with_tax_rates(loader.tax_rates());
    let calculated = match mode {
        BillingMode::Recurring => {
            let run = run_billing(&records, &ctx);
            Calculated {
                run_id: run.run_id,
                processed: run.processed(),
                skipped: 0,
                sheets: build_annexures(&run.line_items),
                errors: run.errors,
            }
        }
        BillingMode::OneTime => {
            let run = run_one_time(&records, &ctx);
            Calculated {
                run_id: run.run_id,
                processed: run.new_joiners,
                skipped: run.skipped,
                sheets: build_annexures(&run.line_items),
                errors: run.errors,
            }
        }
    };

    let writer = OutputWriter::create(loader.output_dir())?;
    let report = write_outputs(&writer, loader, &calculated, &po_directory, invoice_date)?;
    writer.write_run_report(&report)?;

    info!(
        run_id = %report.run_id,
        mode = %mode,
        processed = report.processed,
        billed = report.billed,
        errored = report.errored,
        groups = report.groups,
        duration_us = start_time.elapsed().as_micros(),
        "Billing outputs written"
    );

    Ok(report)
}

fn load_po_directory(path: Option<&Path>) -> EngineResult<PoDirectory> {
    match path {
        None => {
            debug!("No PO number table configured");
            Ok(PoDirectory::new())
        }
        Some(path) => match read_po_directory(path) {
            Err(EngineError::InputNotFound { path }) => {
                warn!(path = %path, "PO number table not found, summary PO columns left blank");
                Ok(PoDirectory::new())
            }
            other => other,
        },
    }
}

fn write_outputs(
    writer: &OutputWriter,
    loader: &ConfigLoader,
    calculated: &Calculated,
    po_directory: &PoDirectory,
    invoice_date: NaiveDate,
) -> EngineResult<RunReport> {
    let run_id = calculated.run_id;
    let billing_month = loader.billing_month();
    let rates = loader.tax_rates();

    let mut annexures = Vec::with_capacity(calculated.sheets.len());
    let mut bills = Vec::new();
    for sheet in &calculated.sheets {
        annexures.push(writer.write_annexure(sheet, &rates)?);

        let Some(template) = read_template(loader.templates_dir(), &sheet.file_stem())? else {
            continue;
        };
        let values = BillValues::new(
            sheet,
            billing_month,
            invoice_date,
            po_directory.lookup(&sheet.key),
        );
        bills.push(writer.write_bill(&sheet.file_stem(), &fill_bill_template(&template, &values))?);
    }

    let master_summary = if calculated.sheets.is_empty() {
        warn!(run_id = %run_id, "No line items produced, master summary not written");
        None
    } else {
        let summary = MasterSummary::build(&calculated.sheets, po_directory);
        Some(writer.write_master_summary(&summary)?)
    };

    let error_report = if calculated.errors.is_empty() {
        None
    } else {
        Some(writer.write_error_report(&calculated.errors)?)
    };

    Ok(RunReport {
        run_id,
        mode: loader.mode(),
        billing_month,
        processed: calculated.processed,
        billed: calculated.sheets.iter().map(|sheet| sheet.rows.len()).sum(),
        errored: calculated.errors.len(),
        skipped: calculated.skipped,
        groups: calculated.sheets.len(),
        output_dir: writer.directory().to_path_buf(),
        annexures,
        bills,
        master_summary,
        error_report,
    })
}

/// Reads `<templates_dir>/<file_stem>.txt`, if both exist.
fn read_template(templates_dir: Option<&Path>, file_stem: &str) -> EngineResult<Option<String>> {
    let Some(dir) = templates_dir else {
        return Ok(None);
    };
    let path = dir.join(format!("{}.txt", file_stem));
    if !path.is_file() {
        warn!(path = %path.display(), "No bill template for group, bill not generated");
        return Ok(None);
    }
    fs::read_to_string(&path)
        .map(Some)
        .map_err(|e| EngineError::InputParseError {
            path: path.display().to_string(),
            line: 0,
            message: e.to_string(),
        })
}
