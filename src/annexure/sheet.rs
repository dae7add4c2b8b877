//! Per-group annexure sheets.
//!
//! Line items are grouped by split key, the (responsible party, company) pair
//! as it appears in file names. Each group becomes
//! one [`AnnexureSheet`]: a header, one row per line item, and a "TOTAL" row.
//!
//! # Totals rounding
//!
//! - CGST and SGST sums are rounded up to the next whole unit.
//! - Every other numeric sum is rounded to the nearest whole unit.
//! - Grand Total is the rounded Total plus the rounded applicable tax.
//!
//! A group with any IGST is inter-state: its CGST and SGST columns are
//! dropped and its grand total carries IGST only. Any other group drops IGST.
//! CGST and SGST on intra-state lines of an inter-state group are left out of
//! the group totals and logged.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use super::column::{AnnexureLine, Cell, Column, ColumnKind, LineAmounts};
use crate::calculation::{ceil_whole, round_currency, round_whole};
use crate::models::{GroupKey, TaxJurisdiction, TaxRates};

/// Label written in the first column of the totals row.
pub const TOTAL_LABEL: &str = "TOTAL";

/// Presentation totals of one group.
///
/// Currency sums are at 2 decimal places. Tax and grand total are whole units
/// and only the applicable regime is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupTotals {
    /// Number of line items in the group.
    pub employees: usize,
    /// Sum of base billing.
    pub billing: Decimal,
    /// Sum of prorated billing.
    pub payable_billing: Decimal,
    /// Sum of service charges.
    pub charges: Decimal,
    /// Sum of out-of-pocket expenses.
    pub out_of_pocket: Decimal,
    /// Sum of arrears.
    pub arrears: Decimal,
    /// Sum of line totals.
    pub total: Decimal,
    /// Regime of the group: inter-state if any line carries IGST.
    pub jurisdiction: TaxJurisdiction,
    /// CGST, rounded up.
    pub cgst: Decimal,
    /// SGST, rounded up.
    pub sgst: Decimal,
    /// IGST, rounded to nearest.
    pub igst: Decimal,
    /// Rounded total plus the applicable rounded tax.
    pub grand_total: Decimal,
    /// True when an inter-state group also has lines carrying CGST or SGST.
    pub mixed_jurisdictions: bool,
}

impl GroupTotals {
    /// Computes the totals of a group of lines.
    ///
    /// # Example
    ///
    /// ```
    /// use billing_engine::annexure::GroupTotals;
    /// use billing_engine::models::{AttendanceRecord, OneTimeLineItem, TaxBreakdown};
    /// use rust_decimal::Decimal;
    ///
    /// let line = |cgst: i64| OneTimeLineItem {
    ///     record: AttendanceRecord::new("Acme", "Globex", "E001", "Asha", Decimal::ZERO),
    ///     charges: Decimal::new(1000, 0),
    ///     total: Decimal::new(1000, 0),
    ///     tax: TaxBreakdown { cgst: Decimal::new(cgst, 2), sgst: Decimal::new(cgst, 2), igst: Decimal::ZERO },
    ///     grand_total: Decimal::new(1000, 0),
    /// };
    ///
    /// // 90.10 + 90.10 = 180.20 rounds up to 181.
    /// let totals = GroupTotals::from_lines(&[&line(9010), &line(9010)]);
    /// assert_eq!(totals.cgst, Decimal::new(181, 0));
    /// assert_eq!(totals.grand_total, Decimal::new(2362, 0));
    /// ```
    pub fn from_lines<L: AnnexureLine>(lines: &[&L]) -> Self {
        let sums = lines
            .iter()
            .map(|line| line.amounts())
            .fold(LineAmounts::default(), |mut acc, amounts| {
                acc.billing += amounts.billing;
                acc.payable_billing += amounts.payable_billing;
                acc.charges += amounts.charges;
                acc.out_of_pocket += amounts.out_of_pocket;
                acc.arrears += amounts.arrears;
                acc.total += amounts.total;
                acc.tax.cgst += amounts.tax.cgst;
                acc.tax.sgst += amounts.tax.sgst;
                acc.tax.igst += amounts.tax.igst;
                acc.grand_total += amounts.grand_total;
                acc
            });

        let total = round_currency(sums.total);
        let contract_total = round_whole(total);

        let inter_state = round_currency(sums.tax.igst) > Decimal::ZERO;
        let mixed_jurisdictions =
            inter_state && !(sums.tax.cgst.is_zero() && sums.tax.sgst.is_zero());

        let (jurisdiction, cgst, sgst, igst) = if inter_state {
            (
                TaxJurisdiction::InterState,
                Decimal::ZERO,
                Decimal::ZERO,
                round_whole(round_currency(sums.tax.igst)),
            )
        } else {
            (
                TaxJurisdiction::IntraState,
                ceil_whole(round_currency(sums.tax.cgst)),
                ceil_whole(round_currency(sums.tax.sgst)),
                Decimal::ZERO,
            )
        };

        Self {
            employees: lines.len(),
            billing: round_currency(sums.billing),
            payable_billing: round_currency(sums.payable_billing),
            charges: round_currency(sums.charges),
            out_of_pocket: round_currency(sums.out_of_pocket),
            arrears: round_currency(sums.arrears),
            total,
            jurisdiction,
            cgst,
            sgst,
            igst,
            grand_total: contract_total + cgst + sgst + igst,
            mixed_jurisdictions,
        }
    }

    /// The total rounded to whole units, as shown on the bill.
    pub fn contract_total(&self) -> Decimal {
        round_whole(self.total)
    }
}

/// One group's annexure: columns, data rows, totals row and group totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnexureSheet {
    /// The group this sheet belongs to.
    pub key: GroupKey,
    /// Billing cycle label of the group's first line.
    pub billing_cycle: String,
    /// Columns after tax suppression.
    pub columns: Vec<Column>,
    /// One row per line item, in input order.
    pub rows: Vec<Vec<Cell>>,
    /// The "TOTAL" row.
    pub totals_row: Vec<Cell>,
    /// Group totals for the summary and the bill.
    pub totals: GroupTotals,
}

impl AnnexureSheet {
    /// Lays out one group of lines.
    pub fn build<L: AnnexureLine>(key: GroupKey, lines: &[&L]) -> Self {
        let totals = GroupTotals::from_lines(lines);
        if totals.mixed_jurisdictions {
            warn!(
                responsible_party = %key.responsible_party,
                company = %key.company_name,
                "Group mixes IGST and CGST/SGST lines, CGST/SGST left out of group totals"
            );
        }

        let columns: Vec<Column> = L::COLUMNS
            .iter()
            .copied()
            .filter(|column| match totals.jurisdiction {
                TaxJurisdiction::InterState => !matches!(column, Column::Cgst | Column::Sgst),
                TaxJurisdiction::IntraState => *column != Column::Igst,
            })
            .collect();

        let rows: Vec<Vec<Cell>> = lines
            .iter()
            .map(|line| columns.iter().map(|column| line.cell(*column)).collect())
            .collect();

        let totals_row = totals_row(&columns, &rows, &totals);

        Self {
            billing_cycle: lines
                .first()
                .map(|line| line.record().billing_cycle.clone())
                .unwrap_or_default(),
            key,
            columns,
            rows,
            totals_row,
            totals,
        }
    }

    /// Column headers.
    pub fn headers(&self, rates: &TaxRates) -> Vec<String> {
        self.columns.iter().map(|column| column.header(rates)).collect()
    }

    /// The group's split key, used for its file names.
    pub fn file_stem(&self) -> String {
        self.key.file_stem()
    }
}

fn totals_row(columns: &[Column], rows: &[Vec<Cell>], totals: &GroupTotals) -> Vec<Cell> {
    columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let sum = || rows.iter().map(|row| row[index].number()).sum::<Decimal>();
            match column.kind() {
                ColumnKind::Text if index == 0 => Cell::Text(TOTAL_LABEL.to_string()),
                ColumnKind::Text => Cell::blank(),
                ColumnKind::Sum => Cell::Number(round_whole(sum())),
                ColumnKind::CeilingSum => Cell::Number(ceil_whole(sum())),
                ColumnKind::GrandTotal => Cell::Number(totals.grand_total),
            }
        })
        .collect()
}

/// Groups lines by split key, keeping input order within each group.
///
/// Pairs that differ only in characters the split key replaces share one
/// group, keyed by the first line seen.
pub fn group_lines<L: AnnexureLine>(lines: &[L]) -> BTreeMap<String, (GroupKey, Vec<&L>)> {
    let mut groups: BTreeMap<String, (GroupKey, Vec<&L>)> = BTreeMap::new();
    for line in lines {
        let key = line.record().group_key();
        groups
            .entry(key.file_stem())
            .or_insert_with(|| (key, Vec::new()))
            .1
            .push(line);
    }
    groups
}

/// Builds one annexure sheet per group, ordered by split key.
///
/// # Example
///
/// ```
/// use billing_engine::annexure::build_annexures;
/// use billing_engine::models::{AttendanceRecord, OneTimeLineItem, TaxBreakdown};
/// use rust_decimal::Decimal;
///
/// let line = |party: &str| OneTimeLineItem {
///     record: AttendanceRecord::new(party, "Globex", "E001", "Asha", Decimal::ZERO),
///     charges: Decimal::new(1000, 0),
///     total: Decimal::new(1000, 0),
///     tax: TaxBreakdown { cgst: Decimal::new(90, 0), sgst: Decimal::new(90, 0), igst: Decimal::ZERO },
///     grand_total: Decimal::new(1180, 0),
/// };
///
/// let sheets = build_annexures(&[line("Zed"), line("Acme"), line("Zed")]);
/// assert_eq!(sheets.len(), 2);
/// assert_eq!(sheets[0].file_stem(), "Acme_Globex");
/// assert_eq!(sheets[1].rows.len(), 2);
/// ```
pub fn build_annexures<L: AnnexureLine>(lines: &[L]) -> Vec<AnnexureSheet> {
    group_lines(lines)
        .into_iter()
        .map(|(_, (key, group))| AnnexureSheet::build(key, &group))
        .collect()
}
