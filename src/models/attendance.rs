//! Attendance record model and related types.
//!
//! This module defines the [`AttendanceRecord`] struct, one row of the
//! attendance table resolved into strong types at load time, and the
//! [`GroupKey`] used to split billed records into per-client annexures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxJurisdiction;

/// Classification markers that route a record through differential billing.
///
/// The second spelling is found in legacy attendance sheets.
const DIFFERENTIAL_MARKERS: [&str; 2] = ["differential", "diffrential"];

/// One employee's attendance for a billing run.
///
/// Optional spreadsheet columns are resolved once at load time: missing
/// numeric cells become zero, missing text cells become empty strings, and
/// unparsable dates become `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The client-side person responsible for the employee ("Kind Attention Person").
    pub responsible_party: String,
    /// The site or office the employee works at.
    #[serde(default)]
    pub working_at: String,
    /// The client company being billed.
    pub company_name: String,
    /// The employee's code.
    pub employee_code: String,
    /// The employee's name.
    pub employee_name: String,
    /// The employee's position, used to refine charge lookup.
    #[serde(default)]
    pub position: Option<String>,
    /// The person the employee reports to (shown on one-time annexures).
    #[serde(default)]
    pub reporting_person: String,
    /// Free-text billing cycle label (e.g. "21-20").
    pub billing_cycle: String,
    /// Workweek descriptor (e.g. "5 days", "6").
    pub workweek: String,
    /// Base billing amount for a full cycle.
    pub billing: Decimal,
    /// Days present.
    #[serde(default)]
    pub present_days: Decimal,
    /// Holidays in the cycle.
    #[serde(default)]
    pub holidays: Decimal,
    /// Days absent (informational).
    #[serde(default)]
    pub absent_days: Decimal,
    /// Signed adjustment to billable days.
    #[serde(default)]
    pub day_adjustment: Decimal,
    /// Out-of-pocket expense passed through to the bill.
    #[serde(default)]
    pub out_of_pocket: Decimal,
    /// Arrears passed through to the bill.
    #[serde(default)]
    pub arrears: Decimal,
    /// Date of joining, if known.
    #[serde(default)]
    pub date_of_joining: Option<NaiveDate>,
    /// Last working day, if the employee has left.
    #[serde(default)]
    pub last_working_date: Option<NaiveDate>,
    /// Tax jurisdiction text ("IGST" for inter-state).
    #[serde(default)]
    pub tax_jurisdiction: Option<String>,
    /// Employee classification text ("differential" for differential billing).
    #[serde(default)]
    pub employee_type: Option<String>,
    /// Free-text remark carried through to the annexure.
    #[serde(default)]
    pub remark: String,
}

impl AttendanceRecord {
    /// Returns true if the classification flag marks this record for differential billing.
    ///
    /// # Examples
    ///
    /// ```
    /// # use billing_engine::models::AttendanceRecord;
    /// # use rust_decimal::Decimal;
    /// let mut record = AttendanceRecord::new("Acme", "Globex", "E001", "Asha", Decimal::new(50000, 0));
    /// assert!(!record.is_differential());
    /// record.employee_type = Some("Differential Billing".to_string());
    /// assert!(record.is_differential());
    /// ```
    pub fn is_differential(&self) -> bool {
        self.employee_type.as_deref().is_some_and(|flag| {
            let flag = flag.trim().to_lowercase();
            DIFFERENTIAL_MARKERS.iter().any(|marker| flag.contains(marker))
        })
    }

    /// The tax regime this record is billed under.
    pub fn jurisdiction(&self) -> TaxJurisdiction {
        TaxJurisdiction::from_flag(self.tax_jurisdiction.as_deref())
    }

    /// The key this record is grouped under for annexures and bills.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            responsible_party: self.responsible_party.clone(),
            company_name: self.company_name.clone(),
        }
    }

    /// Creates a record with the identifying fields and base billing set and
    /// everything else empty or zero.
    pub fn new(
        responsible_party: &str,
        company_name: &str,
        employee_code: &str,
        employee_name: &str,
        billing: Decimal,
    ) -> Self {
        Self {
            responsible_party: responsible_party.to_string(),
            working_at: String::new(),
            company_name: company_name.to_string(),
            employee_code: employee_code.to_string(),
            employee_name: employee_name.to_string(),
            position: None,
            reporting_person: String::new(),
            billing_cycle: String::new(),
            workweek: String::new(),
            billing,
            present_days: Decimal::ZERO,
            holidays: Decimal::ZERO,
            absent_days: Decimal::ZERO,
            day_adjustment: Decimal::ZERO,
            out_of_pocket: Decimal::ZERO,
            arrears: Decimal::ZERO,
            date_of_joining: None,
            last_working_date: None,
            tax_jurisdiction: None,
            employee_type: None,
            remark: String::new(),
        }
    }
}

/// Grouping key for annexures: (responsible party, client company).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    /// The responsible party.
    pub responsible_party: String,
    /// The client company.
    pub company_name: String,
}

impl GroupKey {
    /// The split key used to name a group's output files and to find its bill template.
    ///
    /// Spaces and characters that are not allowed in file names become `_`.
    ///
    /// ```
    /// use billing_engine::models::GroupKey;
    ///
    /// let key = GroupKey {
    ///     responsible_party: "Ravi Kumar".to_string(),
    ///     company_name: "Globex Ltd".to_string(),
    /// };
    /// assert_eq!(key.file_stem(), "Ravi_Kumar_Globex_Ltd");
    /// ```
    pub fn file_stem(&self) -> String {
        format!("{}_{}", stem_part(&self.responsible_party), stem_part(&self.company_name))
    }
}

fn stem_part(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
