//! Annexure column model.
//!
//! An annexure sheet is a table whose columns are drawn from the fixed
//! [`Column`] vocabulary. Each line item type declares its column layout and
//! how to render each column through the [`AnnexureLine`] trait.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceRecord, ComputedLineItem, OneTimeLineItem, TaxBreakdown, TaxRates};

/// A column of an annexure sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Responsible party ("Kind Attention Person").
    ResponsibleParty,
    /// Site the employee works at.
    WorkingAt,
    /// Employee code.
    EmployeeCode,
    /// Employee name.
    EmployeeName,
    /// Person the employee reports to.
    ReportingPerson,
    /// Joining date, dd-mm-yyyy.
    DateOfJoining,
    /// Employee position.
    Position,
    /// Base billing amount.
    Billing,
    /// Cycle length in days.
    TotalDays,
    /// Days the employee was eligible.
    EligibleDays,
    /// Billable Saturdays.
    Saturdays,
    /// Sundays.
    Sundays,
    /// Holidays.
    Holidays,
    /// Days present.
    Present,
    /// Present days plus weekends plus holidays.
    TotalWorkingDays,
    /// Days absent.
    Absents,
    /// Signed day adjustment.
    Adjustment,
    /// Final billable days.
    PayableDays,
    /// Prorated billing.
    PayableBilling,
    /// Service charge.
    Charges,
    /// Out-of-pocket expense.
    OutOfPocket,
    /// Arrears.
    Arrears,
    /// Taxable total.
    Total,
    /// Central GST.
    Cgst,
    /// State GST.
    Sgst,
    /// Integrated GST.
    Igst,
    /// Total plus tax.
    GrandTotal,
    /// Free-text remark.
    Remark,
}

/// How a column contributes to the totals row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text; blank in the totals row.
    Text,
    /// Summed and rounded to the nearest whole unit.
    Sum,
    /// Summed and rounded up to the next whole unit (CGST, SGST).
    CeilingSum,
    /// Rounded total plus the rounded applicable tax.
    GrandTotal,
}

/// Renders a tax rate fraction as a percentage label, e.g. 0.09 as "9".
fn percent_label(rate: Decimal) -> String {
    (rate * Decimal::ONE_HUNDRED).normalize().to_string()
}

impl Column {
    /// The column header. Tax headers carry the configured rate.
    ///
    /// ```
    /// use billing_engine::annexure::Column;
    /// use billing_engine::models::TaxRates;
    ///
    /// let rates = TaxRates::default();
    /// assert_eq!(Column::Cgst.header(&rates), "CGST @9%");
    /// assert_eq!(Column::Igst.header(&rates), "IGST @18%");
    /// assert_eq!(Column::ResponsibleParty.header(&rates), "Kind Attention Person");
    /// ```
    pub fn header(&self, rates: &TaxRates) -> String {
        let text = match self {
            Column::ResponsibleParty => "Kind Attention Person",
            Column::WorkingAt => "Working At",
            Column::EmployeeCode => "Employee Code",
            Column::EmployeeName => "Employee Name",
            Column::ReportingPerson => "Reporting Person",
            Column::DateOfJoining => "Date of Joining",
            Column::Position => "Position",
            Column::Billing => "Billing",
            Column::TotalDays => "No of days",
            Column::EligibleDays => "Eligible Days",
            Column::Saturdays => "No of Saturdays",
            Column::Sundays => "No of Sundays",
            Column::Holidays => "No of Holidays",
            Column::Present => "Total Present",
            Column::TotalWorkingDays => "Total Working Days",
            Column::Absents => "Absents this Month",
            Column::Adjustment => "Adjustment of Days",
            Column::PayableDays => "Total Payable Days",
            Column::PayableBilling => "Total Payable Billing",
            Column::Charges => "Charges",
            Column::OutOfPocket => "Out of Pocket Exp",
            Column::Arrears => "Arrears",
            Column::Total => "Total",
            Column::Cgst => return format!("CGST @{}%", percent_label(rates.cgst)),
            Column::Sgst => return format!("SGST @{}%", percent_label(rates.sgst)),
            Column::Igst => return format!("IGST @{}%", percent_label(rates.igst)),
            Column::GrandTotal => "Grand Total",
            Column::Remark => "Remark",
        };
        text.to_string()
    }

    /// How the column is totalled.
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::ResponsibleParty
            | Column::WorkingAt
            | Column::EmployeeCode
            | Column::EmployeeName
            | Column::ReportingPerson
            | Column::DateOfJoining
            | Column::Position
            | Column::Remark => ColumnKind::Text,
            Column::Cgst | Column::Sgst => ColumnKind::CeilingSum,
            Column::GrandTotal => ColumnKind::GrandTotal,
            _ => ColumnKind::Sum,
        }
    }
}

/// One annexure cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Free text.
    Text(String),
    /// A numeric amount or day count.
    Number(Decimal),
}

impl Cell {
    /// The numeric value, or zero for text cells.
    pub fn number(&self) -> Decimal {
        match self {
            Cell::Number(value) => *value,
            Cell::Text(_) => Decimal::ZERO,
        }
    }

    /// An empty text cell.
    pub fn blank() -> Self {
        Cell::Text(String::new())
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(text) => write!(f, "{}", text),
            Cell::Number(value) => write!(f, "{}", value),
        }
    }
}

/// The amounts of a line item that roll up into group totals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineAmounts {
    /// Base billing (zero for one-time lines).
    pub billing: Decimal,
    /// Prorated billing (zero for one-time lines).
    pub payable_billing: Decimal,
    /// Service charge.
    pub charges: Decimal,
    /// Out-of-pocket expense.
    pub out_of_pocket: Decimal,
    /// Arrears.
    pub arrears: Decimal,
    /// Taxable total.
    pub total: Decimal,
    /// Tax on the total.
    pub tax: TaxBreakdown,
    /// Total plus tax.
    pub grand_total: Decimal,
}

/// A line item that can be laid out on an annexure sheet.
pub trait AnnexureLine {
    /// The columns of this line type, in sheet order, before tax suppression.
    const COLUMNS: &'static [Column];

    /// The source attendance record.
    fn record(&self) -> &AttendanceRecord;

    /// The amounts this line contributes to its group's totals.
    fn amounts(&self) -> LineAmounts;

    /// The value of one column for this line.
    fn cell(&self, column: Column) -> Cell;
}

/// Text columns shared by every line type. `None` for numeric columns.
fn record_text(record: &AttendanceRecord, column: Column) -> Option<Cell> {
    let text = match column {
        Column::ResponsibleParty => record.responsible_party.clone(),
        Column::WorkingAt => record.working_at.clone(),
        Column::EmployeeCode => record.employee_code.clone(),
        Column::EmployeeName => record.employee_name.clone(),
        Column::ReportingPerson => record.reporting_person.clone(),
        Column::Position => record.position.clone().unwrap_or_default(),
        Column::Remark => record.remark.clone(),
        _ => return None,
    };
    Some(Cell::Text(text))
}

impl AnnexureLine for ComputedLineItem {
    const COLUMNS: &'static [Column] = &[
        Column::ResponsibleParty,
        Column::WorkingAt,
        Column::EmployeeCode,
        Column::EmployeeName,
        Column::Position,
        Column::Billing,
        Column::TotalDays,
        Column::EligibleDays,
        Column::Saturdays,
        Column::Sundays,
        Column::Holidays,
        Column::Present,
        Column::TotalWorkingDays,
        Column::Absents,
        Column::Adjustment,
        Column::PayableDays,
        Column::PayableBilling,
        Column::Charges,
        Column::OutOfPocket,
        Column::Arrears,
        Column::Total,
        Column::Cgst,
        Column::Sgst,
        Column::Igst,
        Column::GrandTotal,
        Column::Remark,
    ];

    fn record(&self) -> &AttendanceRecord {
        &self.record
    }

    fn amounts(&self) -> LineAmounts {
        LineAmounts {
            billing: self.record.billing,
            payable_billing: self.payable_billing,
            charges: self.charges,
            out_of_pocket: self.record.out_of_pocket,
            arrears: self.record.arrears,
            total: self.total,
            tax: self.tax,
            grand_total: self.grand_total,
        }
    }

    fn cell(&self, column: Column) -> Cell {
        if let Some(text) = record_text(&self.record, column) {
            return text;
        }
        let value = match column {
            Column::Billing => self.record.billing,
            Column::TotalDays => self.total_days,
            Column::EligibleDays => self.eligible_days,
            Column::Saturdays => self.saturdays,
            Column::Sundays => self.sundays,
            Column::Holidays => self.record.holidays,
            Column::Present => self.record.present_days,
            Column::TotalWorkingDays => self.total_billable_days,
            Column::Absents => self.record.absent_days,
            Column::Adjustment => self.record.day_adjustment,
            Column::PayableDays => self.final_billable_days,
            Column::PayableBilling => self.payable_billing,
            Column::Charges => self.charges,
            Column::OutOfPocket => self.record.out_of_pocket,
            Column::Arrears => self.record.arrears,
            Column::Total => self.total,
            Column::Cgst => self.tax.cgst,
            Column::Sgst => self.tax.sgst,
            Column::Igst => self.tax.igst,
            Column::GrandTotal => self.grand_total,
            _ => return Cell::blank(),
        };
        Cell::Number(value)
    }
}

impl AnnexureLine for OneTimeLineItem {
    const COLUMNS: &'static [Column] = &[
        Column::ResponsibleParty,
        Column::WorkingAt,
        Column::EmployeeCode,
        Column::EmployeeName,
        Column::ReportingPerson,
        Column::DateOfJoining,
        Column::Position,
        Column::Charges,
        Column::Total,
        Column::Cgst,
        Column::Sgst,
        Column::Igst,
        Column::GrandTotal,
        Column::Remark,
    ];

    fn record(&self) -> &AttendanceRecord {
        &self.record
    }

    fn amounts(&self) -> LineAmounts {
        LineAmounts {
            charges: self.charges,
            total: self.total,
            tax: self.tax,
            grand_total: self.grand_total,
            ..LineAmounts::default()
        }
    }

    fn cell(&self, column: Column) -> Cell {
        if let Some(text) = record_text(&self.record, column) {
            return text;
        }
        match column {
            Column::DateOfJoining => Cell::Text(self.joining_date_text()),
            Column::Charges => Cell::Number(self.charges),
            Column::Total => Cell::Number(self.total),
            Column::Cgst => Cell::Number(self.tax.cgst),
            Column::Sgst => Cell::Number(self.tax.sgst),
            Column::Igst => Cell::Number(self.tax.igst),
            Column::GrandTotal => Cell::Number(self.grand_total),
            _ => Cell::blank(),
        }
    }
}
