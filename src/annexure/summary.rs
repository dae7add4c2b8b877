//! Master summary across all groups, and the PO number directory.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::column::Cell;
use super::sheet::AnnexureSheet;
use crate::models::GroupKey;

/// Label written in the first column of the summary's totals row.
pub const GRAND_TOTAL_LABEL: &str = "GRAND TOTAL";

/// Master summary column headers, in order.
pub const SUMMARY_HEADERS: [&str; 15] = [
    "Kind Attention Person",
    "Company Name",
    "PO Number",
    "Validity",
    "No of Employees",
    "Total Billing",
    "Total Payable Billing",
    "Total Charges",
    "Total Out of Pocket",
    "Total Arrears",
    "Total Amount",
    "CGST",
    "SGST",
    "IGST",
    "Grand Total",
];

/// Purchase order details of one client group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoDetails {
    /// Purchase order number.
    pub po_number: String,
    /// Validity text, as given.
    pub validity: String,
}

/// PO details keyed case-insensitively by (responsible party, company).
///
/// # Example
///
/// ```
/// use billing_engine::annexure::{PoDetails, PoDirectory};
/// use billing_engine::models::GroupKey;
///
/// let mut directory = PoDirectory::new();
/// directory.insert("Ravi Kumar", "GLOBEX", PoDetails {
///     po_number: "PO-17".to_string(),
///     validity: "31-03-2026".to_string(),
/// });
///
/// let key = GroupKey { responsible_party: "ravi kumar ".to_string(), company_name: "Globex".to_string() };
/// assert_eq!(directory.lookup(&key).unwrap().po_number, "PO-17");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PoDirectory {
    entries: HashMap<(String, String), PoDetails>,
}

fn directory_key(party: &str, company: &str) -> (String, String) {
    (party.trim().to_lowercase(), company.trim().to_lowercase())
}

impl PoDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the details of a group. Later rows win.
    pub fn insert(&mut self, party: &str, company: &str, details: PoDetails) {
        self.entries.insert(directory_key(party, company), details);
    }

    /// The details of a group, if any.
    pub fn lookup(&self, key: &GroupKey) -> Option<&PoDetails> {
        self.entries
            .get(&directory_key(&key.responsible_party, &key.company_name))
    }

    /// Number of groups with details.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no details are loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Summable columns of the master summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryAmounts {
    /// Number of employees billed.
    pub employees: usize,
    /// Base billing.
    pub billing: Decimal,
    /// Prorated billing.
    pub payable_billing: Decimal,
    /// Service charges.
    pub charges: Decimal,
    /// Out-of-pocket expenses.
    pub out_of_pocket: Decimal,
    /// Arrears.
    pub arrears: Decimal,
    /// Total amount (2 dp).
    pub total: Decimal,
    /// CGST (whole units).
    pub cgst: Decimal,
    /// SGST (whole units).
    pub sgst: Decimal,
    /// IGST (whole units).
    pub igst: Decimal,
    /// Grand total (whole units).
    pub grand_total: Decimal,
}

impl SummaryAmounts {
    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Number(Decimal::from(self.employees)),
            Cell::Number(self.billing),
            Cell::Number(self.payable_billing),
            Cell::Number(self.charges),
            Cell::Number(self.out_of_pocket),
            Cell::Number(self.arrears),
            Cell::Number(self.total),
            Cell::Number(self.cgst),
            Cell::Number(self.sgst),
            Cell::Number(self.igst),
            Cell::Number(self.grand_total),
        ]
    }
}

impl std::ops::Add for SummaryAmounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            employees: self.employees + other.employees,
            billing: self.billing + other.billing,
            payable_billing: self.payable_billing + other.payable_billing,
            charges: self.charges + other.charges,
            out_of_pocket: self.out_of_pocket + other.out_of_pocket,
            arrears: self.arrears + other.arrears,
            total: self.total + other.total,
            cgst: self.cgst + other.cgst,
            sgst: self.sgst + other.sgst,
            igst: self.igst + other.igst,
            grand_total: self.grand_total + other.grand_total,
        }
    }
}

/// One group's line in the master summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    /// The group.
    pub key: GroupKey,
    /// PO details, blank when the group has none.
    pub po: PoDetails,
    /// The group's amounts.
    pub amounts: SummaryAmounts,
}

impl SummaryRow {
    /// The row's cells, in [`SUMMARY_HEADERS`] order.
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = vec![
            Cell::Text(self.key.responsible_party.clone()),
            Cell::Text(self.key.company_name.clone()),
            Cell::Text(self.po.po_number.clone()),
            Cell::Text(self.po.validity.clone()),
        ];
        cells.extend(self.amounts.cells());
        cells
    }
}

/// Totals of every annexure in a run, one row per group plus a grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterSummary {
    /// One row per group, in sheet order.
    pub rows: Vec<SummaryRow>,
    /// Column sums over all rows.
    pub grand_total: SummaryAmounts,
}

impl MasterSummary {
    /// Summarises the sheets of a run.
    pub fn build(sheets: &[AnnexureSheet], po_directory: &PoDirectory) -> Self {
        let rows: Vec<SummaryRow> = sheets
            .iter()
            .map(|sheet| {
                let totals = &sheet.totals;
                SummaryRow {
                    key: sheet.key.clone(),
                    po: po_directory.lookup(&sheet.key).cloned().unwrap_or_default(),
                    amounts: SummaryAmounts {
                        employees: totals.employees,
                        billing: totals.billing,
                        payable_billing: totals.payable_billing,
                        charges: totals.charges,
                        out_of_pocket: totals.out_of_pocket,
                        arrears: totals.arrears,
                        total: totals.total,
                        cgst: totals.cgst,
                        sgst: totals.sgst,
                        igst: totals.igst,
                        grand_total: totals.grand_total,
                    },
                }
            })
            .collect();

        let grand_total = rows
            .iter()
            .map(|row| row.amounts)
            .fold(SummaryAmounts::default(), |acc, amounts| acc + amounts);

        Self { rows, grand_total }
    }

    /// The "GRAND TOTAL" row's cells, in [`SUMMARY_HEADERS`] order.
    pub fn grand_total_cells(&self) -> Vec<Cell> {
        let mut cells = vec![
            Cell::Text(GRAND_TOTAL_LABEL.to_string()),
            Cell::blank(),
            Cell::blank(),
            Cell::blank(),
        ];
        cells.extend(self.grand_total.cells());
        cells
    }

    /// Returns true if no group was billed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annexure::build_annexures;
    use crate::models::{AttendanceRecord, OneTimeLineItem, TaxBreakdown};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_item(party: &str, company: &str, charges: &str, igst: bool) -> OneTimeLineItem {
        let total = dec(charges);
        let tax = if igst {
            TaxBreakdown {
                igst: total * dec("0.18"),
                ..TaxBreakdown::default()
            }
        } else {
            TaxBreakdown {
                cgst: total * dec("0.09"),
                sgst: total * dec("0.09"),
                igst: Decimal::ZERO,
            }
        };
        OneTimeLineItem {
            record: AttendanceRecord::new(party, company, "E001", "Asha", Decimal::ZERO),
            charges: total,
            total,
            tax,
            grand_total: total + tax.total(),
        }
    }

    #[test]
    fn test_summary_rows_and_grand_total() {
        let items = vec![
            create_item("Acme", "Globex", "10000", false),
            create_item("Acme", "Globex", "5000", false),
            create_item("Hooli", "Initech", "2000", true),
        ];
        let sheets = build_annexures(&items);

        let mut directory = PoDirectory::new();
        directory.insert(
            "ACME",
            "globex",
            PoDetails {
                po_number: "PO-1".to_string(),
                validity: "2026-03-31".to_string(),
            },
        );

        let summary = MasterSummary::build(&sheets, &directory);
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0].po.po_number, "PO-1");
        assert_eq!(summary.rows[1].po, PoDetails::default());

        assert_eq!(summary.rows[0].amounts.employees, 2);
        assert_eq!(summary.rows[0].amounts.cgst, dec("1350"));
        assert_eq!(summary.rows[0].amounts.igst, Decimal::ZERO);
        assert_eq!(summary.rows[1].amounts.igst, dec("360"));
        assert_eq!(summary.rows[1].amounts.cgst, Decimal::ZERO);

        assert_eq!(summary.grand_total.employees, 3);
        assert_eq!(summary.grand_total.total, dec("17000"));
        assert_eq!(summary.grand_total.grand_total, dec("20060"));
    }

    #[test]
    fn test_summary_cells_follow_headers() {
        let items = vec![create_item("Acme", "Globex", "100", false)];
        let summary = MasterSummary::build(&build_annexures(&items), &PoDirectory::new());

        assert_eq!(summary.rows[0].cells().len(), SUMMARY_HEADERS.len());
        let totals = summary.grand_total_cells();
        assert_eq!(totals.len(), SUMMARY_HEADERS.len());
        assert_eq!(totals[0], Cell::Text(GRAND_TOTAL_LABEL.to_string()));
        assert_eq!(totals[4], Cell::Number(dec("1")));
    }

    #[test]
    fn test_empty_summary() {
        let summary = MasterSummary::build(&[], &PoDirectory::new());
        assert!(summary.is_empty());
        assert_eq!(summary.grand_total, SummaryAmounts::default());
    }

    #[test]
    fn test_directory_later_rows_win() {
        let mut directory = PoDirectory::new();
        directory.insert("Acme", "Globex", PoDetails { po_number: "A".to_string(), validity: String::new() });
        directory.insert(" acme", "GLOBEX ", PoDetails { po_number: "B".to_string(), validity: String::new() });
        assert_eq!(directory.len(), 1);
        let key = GroupKey {
            responsible_party: "Acme".to_string(),
            company_name: "Globex".to_string(),
        };
        assert_eq!(directory.lookup(&key).unwrap().po_number, "B");
    }
}
