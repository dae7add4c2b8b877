//! Input table readers.
//!
//! Attendance, charge-rate and PO tables are CSV exports of the billing
//! spreadsheets. Cells are cleaned once here so that the calculation layer
//! only ever sees strongly-typed records:
//!
//! - header and data cells are trimmed
//! - numeric cells that are blank, "-" or not a number read as zero, as does
//!   a numeric column that is absent altogether
//! - dates are read day-first or ISO; an unparsable date is treated as absent
//! - blank text cells of optional columns read as `None`

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use rust_decimal::Decimal;
use tracing::debug;

use crate::annexure::{PoDetails, PoDirectory};
use crate::calculation::parse_charge_value;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, ChargeRule};

const DATE_FORMATS: [&str; 6] = [
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%Y-%m-%d",
];

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Reads a numeric cell, treating blank, "-" and non-numeric text as zero.
///
/// ```
/// use billing_engine::tabular::clean_numeric;
/// use rust_decimal::Decimal;
///
/// assert_eq!(clean_numeric("25.5"), Decimal::new(255, 1));
/// assert_eq!(clean_numeric(" - "), Decimal::ZERO);
/// assert_eq!(clean_numeric("n/a"), Decimal::ZERO);
/// ```
pub fn clean_numeric(raw: &str) -> Decimal {
    let text = raw.trim();
    if text.is_empty() || text == "-" {
        return Decimal::ZERO;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .unwrap_or(Decimal::ZERO)
}

/// Reads a date cell day-first (`dd-mm-yyyy`, `dd/mm/yyyy`, `dd.mm.yyyy`,
/// `dd-Mon-yyyy`) or ISO, with or without a time part.
///
/// ```
/// use billing_engine::tabular::parse_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2026, 2, 3);
/// assert_eq!(parse_date("03-02-2026"), expected);
/// assert_eq!(parse_date("03-Feb-2026"), expected);
/// assert_eq!(parse_date("2026-02-03 00:00:00"), expected);
/// assert_eq!(parse_date("soon"), None);
/// ```
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|dt| dt.date())
        })
}

/// Header positions of one table.
struct Columns {
    source: String,
    index: HashMap<String, usize>,
}

impl Columns {
    fn new(source: &str, headers: &StringRecord) -> Self {
        let mut index = HashMap::new();
        for (position, header) in headers.iter().enumerate() {
            index.entry(header.trim().to_string()).or_insert(position);
        }
        Self {
            source: source.to_string(),
            index,
        }
    }

    fn require(&self, name: &str) -> EngineResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::MissingColumn {
                path: self.source.clone(),
                column: name.to_string(),
            })
    }

    /// The first of `names` present in the table.
    fn optional(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| self.index.get(*name).copied())
    }
}

fn cell(row: &StringRecord, column: Option<usize>) -> &str {
    column.and_then(|index| row.get(index)).unwrap_or("").trim()
}

fn text(row: &StringRecord, column: Option<usize>) -> String {
    cell(row, column).to_string()
}

fn optional_text(row: &StringRecord, column: Option<usize>) -> Option<String> {
    Some(cell(row, column))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn number(row: &StringRecord, column: Option<usize>) -> Decimal {
    clean_numeric(cell(row, column))
}

fn date(row: &StringRecord, column: Option<usize>) -> Option<NaiveDate> {
    parse_date(cell(row, column))
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(|value| value.trim().is_empty())
}

fn open(path: &Path) -> EngineResult<File> {
    File::open(path).map_err(|_| EngineError::InputNotFound {
        path: path.display().to_string(),
    })
}

/// Reads every non-blank row of a CSV table.
///
/// `locate` finds the table's columns once, from the header row, before any
/// data row is read; `parse_row` turns each row into a value or drops it.
fn read_rows<R, L, T>(
    reader: R,
    source: &str,
    locate: impl FnOnce(&Columns) -> EngineResult<L>,
    mut parse_row: impl FnMut(&L, &StringRecord) -> Option<T>,
) -> EngineResult<Vec<T>>
where
    R: Read,
{
    let parse_error = |e: csv::Error| EngineError::InputParseError {
        path: source.to_string(),
        line: e.position().map(|p| p.line()).unwrap_or(0),
        message: e.to_string(),
    };

    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers().map_err(parse_error)?.clone();
    let layout = locate(&Columns::new(source, &headers))?;

    let mut rows = Vec::new();
    for result in csv.records() {
        let row = result.map_err(parse_error)?;
        if is_blank(&row) {
            continue;
        }
        if let Some(parsed) = parse_row(&layout, &row) {
            rows.push(parsed);
        }
    }
    Ok(rows)
}

/// Attendance table column positions.
struct AttendanceColumns {
    responsible_party: usize,
    company_name: usize,
    employee_code: usize,
    employee_name: usize,
    billing_cycle: usize,
    workweek: usize,
    working_at: Option<usize>,
    position: Option<usize>,
    reporting_person: Option<usize>,
    billing: Option<usize>,
    present_days: Option<usize>,
    holidays: Option<usize>,
    absent_days: Option<usize>,
    day_adjustment: Option<usize>,
    out_of_pocket: Option<usize>,
    arrears: Option<usize>,
    date_of_joining: Option<usize>,
    last_working_date: Option<usize>,
    tax_jurisdiction: Option<usize>,
    employee_type: Option<usize>,
    remark: Option<usize>,
}

impl AttendanceColumns {
    fn locate(columns: &Columns) -> EngineResult<Self> {
        Ok(Self {
            responsible_party: columns.require("Kind Attention Person")?,
            company_name: columns.require("Company Name")?,
            employee_code: columns.require("Employee Code")?,
            employee_name: columns.require("Employee Name")?,
            billing_cycle: columns.require("Billing Cycle")?,
            workweek: columns.require("Workweek")?,
            working_at: columns.optional(&["Working At"]),
            position: columns.optional(&["Position"]),
            reporting_person: columns.optional(&["Reporting Person"]),
            billing: columns.optional(&["Billing"]),
            present_days: columns.optional(&["Total Present"]),
            holidays: columns.optional(&["No of Holidays"]),
            absent_days: columns.optional(&["Absents this Month"]),
            day_adjustment: columns.optional(&["Adjustment of Days"]),
            out_of_pocket: columns.optional(&["Out of Pocket Exp"]),
            arrears: columns.optional(&["Arrears"]),
            date_of_joining: columns.optional(&["Date of Joining"]),
            last_working_date: columns.optional(&["LDW", "LWD", "Last Working Date"]),
            tax_jurisdiction: columns.optional(&["GST"]),
            employee_type: columns.optional(&["Employee Type"]),
            remark: columns.optional(&["Remark"]),
        })
    }

    fn record(&self, row: &StringRecord) -> AttendanceRecord {
        AttendanceRecord {
            responsible_party: text(row, Some(self.responsible_party)),
            working_at: text(row, self.working_at),
            company_name: text(row, Some(self.company_name)),
            employee_code: text(row, Some(self.employee_code)),
            employee_name: text(row, Some(self.employee_name)),
            position: optional_text(row, self.position),
            reporting_person: text(row, self.reporting_person),
            billing_cycle: text(row, Some(self.billing_cycle)),
            workweek: text(row, Some(self.workweek)),
            billing: number(row, self.billing),
            present_days: number(row, self.present_days),
            holidays: number(row, self.holidays),
            absent_days: number(row, self.absent_days),
            day_adjustment: number(row, self.day_adjustment),
            out_of_pocket: number(row, self.out_of_pocket),
            arrears: number(row, self.arrears),
            date_of_joining: date(row, self.date_of_joining),
            last_working_date: date(row, self.last_working_date),
            tax_jurisdiction: optional_text(row, self.tax_jurisdiction),
            employee_type: optional_text(row, self.employee_type),
            remark: text(row, self.remark),
        }
    }
}

/// Parses an attendance table from any reader. `source` names the table in errors.
pub fn parse_attendance<R: Read>(reader: R, source: &str) -> EngineResult<Vec<AttendanceRecord>> {
    read_rows(reader, source, AttendanceColumns::locate, |layout, row| {
        Some(layout.record(row))
    })
}

/// Reads the attendance table at `path`.
///
/// # Errors
///
/// `InputNotFound` if the file cannot be opened, `InputParseError` if it is
/// not valid CSV, `MissingColumn` if an identifying column is absent.
pub fn read_attendance(path: &Path) -> EngineResult<Vec<AttendanceRecord>> {
    let records = parse_attendance(open(path)?, &path.display().to_string())?;
    debug!(path = %path.display(), records = records.len(), "Attendance table loaded");
    Ok(records)
}

/// Parses a charge-rate table from any reader. Rows without a responsible
/// party are dropped.
pub fn parse_charge_rules<R: Read>(reader: R, source: &str) -> EngineResult<Vec<ChargeRule>> {
    let locate = |columns: &Columns| -> EngineResult<[Option<usize>; 5]> {
        Ok([
            Some(columns.require("Kind Attention Person")?),
            columns.optional(&["Position"]),
            columns.optional(&["Charge Type"]),
            columns.optional(&["Charge Value"]),
            columns.optional(&["Application Mode"]),
        ])
    };

    read_rows(
        reader,
        source,
        locate,
        |&[party, position, charge_type, charge_value, application_mode], row| {
            let responsible_party = text(row, party);
            if responsible_party.is_empty() {
                debug!(source, "Skipping charge rule without a responsible party");
                return None;
            }
            Some(ChargeRule {
                responsible_party,
                position: text(row, position),
                charge_type: optional_text(row, charge_type),
                charge_value: parse_charge_value(cell(row, charge_value)),
                application_mode: optional_text(row, application_mode),
            })
        },
    )
}

/// Reads the charge-rate table at `path`.
pub fn read_charge_rules(path: &Path) -> EngineResult<Vec<ChargeRule>> {
    let rules = parse_charge_rules(open(path)?, &path.display().to_string())?;
    debug!(path = %path.display(), rules = rules.len(), "Charge table loaded");
    Ok(rules)
}

/// Parses a PO number table from any reader. Later rows for the same group win.
pub fn parse_po_directory<R: Read>(reader: R, source: &str) -> EngineResult<PoDirectory> {
    let locate = |columns: &Columns| -> EngineResult<[Option<usize>; 4]> {
        let company = match columns.optional(&["Company", "Company Name"]) {
            Some(company) => company,
            None => columns.require("Company")?,
        };
        Ok([
            Some(columns.require("Kind Attention Person")?),
            Some(company),
            columns.optional(&["PO Number"]),
            columns.optional(&["Validity"]),
        ])
    };

    let entries = read_rows(
        reader,
        source,
        locate,
        |&[party, company, po_number, validity], row| {
            let details = PoDetails {
                po_number: text(row, po_number),
                validity: text(row, validity),
            };
            Some((text(row, party), text(row, company), details))
        },
    )?;

    let mut directory = PoDirectory::new();
    for (party, company, details) in entries {
        directory.insert(&party, &company, details);
    }
    Ok(directory)
}

/// Reads the PO number table at `path`.
pub fn read_po_directory(path: &Path) -> EngineResult<PoDirectory> {
    let directory = parse_po_directory(open(path)?, &path.display().to_string())?;
    debug!(path = %path.display(), groups = directory.len(), "PO table loaded");
    Ok(directory)
}
