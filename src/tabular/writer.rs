//! Output file writers.
//!
//! Every output of a run lands in one directory:
//!
//! ```text
//! out/
//! ├── <party>_<company>.csv        # one annexure per group
//! ├── <party>_<company>_bill.txt   # filled bill, when a template exists
//! ├── Master_Summary.csv
//! ├── System_Error.csv             # only when records were excluded
//! └── run_report.json
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::annexure::{AnnexureSheet, Cell, MasterSummary, SUMMARY_HEADERS};
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, ErrorRecord, TaxRates};

/// File name of the error report.
pub const ERROR_REPORT_FILE: &str = "System_Error.csv";

/// File name of the master summary.
pub const MASTER_SUMMARY_FILE: &str = "Master_Summary.csv";

/// File name of the machine-readable run report.
pub const RUN_REPORT_FILE: &str = "run_report.json";

/// Header of the error report's reason column.
pub const ERROR_REASON_HEADER: &str = "System Error Reason";

const DATE_FORMAT: &str = "%d-%m-%Y";

/// Error report columns preceding the reason, in input-table naming.
const RECORD_HEADERS: [&str; 20] = [
    "Kind Attention Person",
    "Working At",
    "Company Name",
    "Employee Code",
    "Employee Name",
    "Position",
    "Billing Cycle",
    "Workweek",
    "Billing",
    "Total Present",
    "No of Holidays",
    "Absents this Month",
    "Adjustment of Days",
    "Out of Pocket Exp",
    "Arrears",
    "Date of Joining",
    "LDW",
    "GST",
    "Employee Type",
    "Remark",
];

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer)
}

fn cell_texts(cells: &[Cell]) -> Vec<String> {
    cells.iter().map(ToString::to_string).collect()
}

/// Writes an annexure sheet: header row, one row per line item, then the
/// totals row.
pub fn write_annexure_csv<W: Write>(
    sheet: &AnnexureSheet,
    rates: &TaxRates,
    writer: W,
) -> csv::Result<()> {
    let mut csv = csv_writer(writer);
    csv.write_record(sheet.headers(rates))?;
    for row in &sheet.rows {
        csv.write_record(cell_texts(row))?;
    }
    csv.write_record(cell_texts(&sheet.totals_row))?;
    csv.flush()?;
    Ok(())
}

/// Writes the master summary: one row per group, then the grand total row.
pub fn write_summary_csv<W: Write>(summary: &MasterSummary, writer: W) -> csv::Result<()> {
    let mut csv = csv_writer(writer);
    csv.write_record(SUMMARY_HEADERS)?;
    for row in &summary.rows {
        csv.write_record(cell_texts(&row.cells()))?;
    }
    csv.write_record(cell_texts(&summary.grand_total_cells()))?;
    csv.flush()?;
    Ok(())
}

fn record_fields(record: &AttendanceRecord) -> Vec<String> {
    let date = |value: Option<chrono::NaiveDate>| {
        value
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    };
    vec![
        record.responsible_party.clone(),
        record.working_at.clone(),
        record.company_name.clone(),
        record.employee_code.clone(),
        record.employee_name.clone(),
        record.position.clone().unwrap_or_default(),
        record.billing_cycle.clone(),
        record.workweek.clone(),
        record.billing.to_string(),
        record.present_days.to_string(),
        record.holidays.to_string(),
        record.absent_days.to_string(),
        record.day_adjustment.to_string(),
        record.out_of_pocket.to_string(),
        record.arrears.to_string(),
        date(record.date_of_joining),
        date(record.last_working_date),
        record.tax_jurisdiction.clone().unwrap_or_default(),
        record.employee_type.clone().unwrap_or_default(),
        record.remark.clone(),
    ]
}

/// Writes the error report: every excluded record with its reasons joined by `" | "`.
pub fn write_error_report_csv<W: Write>(errors: &[ErrorRecord], writer: W) -> csv::Result<()> {
    let mut csv = csv_writer(writer);
    let mut headers: Vec<&str> = RECORD_HEADERS.to_vec();
    headers.push(ERROR_REASON_HEADER);
    csv.write_record(&headers)?;
    for error in errors {
        let mut fields = record_fields(&error.record);
        fields.push(error.reason_text());
        csv.write_record(&fields)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes run outputs into one directory, creating it if needed.
///
/// # Example
///
/// ```no_run
/// use billing_engine::tabular::OutputWriter;
///
/// let writer = OutputWriter::create("./out")?;
/// let bill = writer.write_bill("Acme_Globex", "Grand total: 1180")?;
/// println!("Bill written to {}", bill.display());
/// # Ok::<(), billing_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct OutputWriter {
    directory: PathBuf,
}

impl OutputWriter {
    /// Creates the output directory (and its parents) if it does not exist.
    pub fn create<P: AsRef<Path>>(directory: P) -> EngineResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory).map_err(|e| EngineError::OutputError {
            path: directory.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { directory })
    }

    /// The output directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn output_error(path: &Path, message: impl ToString) -> EngineError {
        EngineError::OutputError {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    fn write_csv(
        &self,
        file_name: &str,
        write: impl FnOnce(File) -> csv::Result<()>,
    ) -> EngineResult<PathBuf> {
        let path = self.directory.join(file_name);
        let file = File::create(&path).map_err(|e| Self::output_error(&path, e))?;
        write(file).map_err(|e| Self::output_error(&path, e))?;
        Ok(path)
    }

    /// Writes `<split key>.csv` for one annexure sheet.
    pub fn write_annexure(&self, sheet: &AnnexureSheet, rates: &TaxRates) -> EngineResult<PathBuf> {
        let file_name = format!("{}.csv", sheet.file_stem());
        self.write_csv(&file_name, |file| write_annexure_csv(sheet, rates, file))
    }

    /// Writes the master summary.
    pub fn write_master_summary(&self, summary: &MasterSummary) -> EngineResult<PathBuf> {
        self.write_csv(MASTER_SUMMARY_FILE, |file| write_summary_csv(summary, file))
    }

    /// Writes the error report.
    pub fn write_error_report(&self, errors: &[ErrorRecord]) -> EngineResult<PathBuf> {
        self.write_csv(ERROR_REPORT_FILE, |file| write_error_report_csv(errors, file))
    }

    /// Writes `<split key>_bill.txt`.
    pub fn write_bill(&self, file_stem: &str, text: &str) -> EngineResult<PathBuf> {
        let path = self.directory.join(format!("{}_bill.txt", file_stem));
        fs::write(&path, text).map_err(|e| Self::output_error(&path, e))?;
        Ok(path)
    }

    /// Writes any serializable report as pretty JSON.
    pub fn write_run_report<T: Serialize>(&self, report: &T) -> EngineResult<PathBuf> {
        let path = self.directory.join(RUN_REPORT_FILE);
        let json = serde_json::to_string_pretty(report).map_err(|e| Self::output_error(&path, e))?;
        fs::write(&path, json).map_err(|e| Self::output_error(&path, e))?;
        Ok(path)
    }
}
