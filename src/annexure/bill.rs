//! Bill document filling.
//!
//! A bill template is a text document with `{{placeholder}}` markers. Filling
//! a template substitutes the group's rounded totals, dates, billing period
//! and PO details.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::sheet::AnnexureSheet;
use super::summary::PoDetails;
use super::words::amount_in_words;
use crate::calculation::resolve_billing_cycle;
use crate::models::BillingMonth;

/// Days between invoice date and due date.
pub const PAYMENT_TERMS_DAYS: i64 = 3;

const DATE_FORMAT: &str = "%d-%m-%Y";

/// The values substituted into a bill template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillValues {
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Invoice date plus the payment terms.
    pub due_date: NaiveDate,
    /// Billing period text, e.g. "21 Jan 2026 to 20 Feb 2026".
    pub billing_period: String,
    /// Group total rounded to whole units.
    pub contract_total: Decimal,
    /// CGST, whole units.
    pub cgst: Decimal,
    /// SGST, whole units.
    pub sgst: Decimal,
    /// IGST, whole units.
    pub igst: Decimal,
    /// Grand total, whole units.
    pub grand_total: Decimal,
    /// Grand total in words.
    pub amount_in_words: String,
    /// Group PO details.
    pub po: PoDetails,
}

impl BillValues {
    /// Collects the bill values of one annexure sheet.
    ///
    /// The billing period is resolved from the cycle label of the group's
    /// first line.
    pub fn new(
        sheet: &AnnexureSheet,
        billing_month: BillingMonth,
        invoice_date: NaiveDate,
        po: Option<&PoDetails>,
    ) -> Self {
        let totals = &sheet.totals;
        Self {
            invoice_date,
            due_date: invoice_date + Duration::days(PAYMENT_TERMS_DAYS),
            billing_period: resolve_billing_cycle(&sheet.billing_cycle, billing_month).period_text(),
            contract_total: totals.contract_total(),
            cgst: totals.cgst,
            sgst: totals.sgst,
            igst: totals.igst,
            grand_total: totals.grand_total,
            amount_in_words: amount_in_words(totals.grand_total),
            po: po.cloned().unwrap_or_default(),
        }
    }

    fn placeholders(&self) -> [(&'static str, String); 11] {
        [
            ("invoice_date", self.invoice_date.format(DATE_FORMAT).to_string()),
            ("due_date", self.due_date.format(DATE_FORMAT).to_string()),
            ("billing_period", self.billing_period.clone()),
            ("contract_total", self.contract_total.to_string()),
            ("cgst", self.cgst.to_string()),
            ("sgst", self.sgst.to_string()),
            ("igst", self.igst.to_string()),
            ("grand_total", self.grand_total.to_string()),
            ("amount_in_words", self.amount_in_words.clone()),
            ("po_number", self.po.po_number.clone()),
            ("validity", self.po.validity.clone()),
        ]
    }
}

/// Substitutes every known `{{placeholder}}` in `template`.
///
/// Unknown placeholders are left as they are.
///
/// # Example
///
/// ```
/// use billing_engine::annexure::{fill_bill_template, BillValues, PoDetails};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let values = BillValues {
///     invoice_date: NaiveDate::from_ymd_opt(2026, 2, 25).unwrap(),
///     due_date: NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
///     billing_period: "01 Feb 2026 to 28 Feb 2026".to_string(),
///     contract_total: Decimal::new(1000, 0),
///     cgst: Decimal::new(90, 0),
///     sgst: Decimal::new(90, 0),
///     igst: Decimal::ZERO,
///     grand_total: Decimal::new(1180, 0),
///     amount_in_words: "One Thousand One Hundred Eighty Only".to_string(),
///     po: PoDetails::default(),
/// };
///
/// let bill = fill_bill_template("Due {{due_date}}: {{grand_total}} ({{amount_in_words}})", &values);
/// assert_eq!(bill, "Due 28-02-2026: 1180 (One Thousand One Hundred Eighty Only)");
/// ```
pub fn fill_bill_template(template: &str, values: &BillValues) -> String {
    values
        .placeholders()
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{{{}}}}}", name), value)
        })
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

    fn create_sheet(cycle: &str) -> AnnexureSheet {
        let mut record = AttendanceRecord::new("Acme", "Globex", "E001", "Asha", Decimal::ZERO);
        record.billing_cycle = cycle.to_string();
        let items = vec![OneTimeLineItem {
            record,
            charges: dec("100000.40"),
            total: dec("100000.40"),
            tax: TaxBreakdown {
                cgst: dec("9000.04"),
                sgst: dec("9000.04"),
                igst: Decimal::ZERO,
            },
            grand_total: dec("118000.48"),
        }];
        build_annexures(&items).remove(0)
    }

    #[test]
    fn test_bill_values_from_sheet() {
        let sheet = create_sheet("21-20");
        let invoice_date = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        let values = BillValues::new(&sheet, BillingMonth::new(2026, 2).unwrap(), invoice_date, None);

        assert_eq!(values.due_date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(values.billing_period, "21 Jan 2026 to 20 Feb 2026");
        assert_eq!(values.contract_total, dec("100000"));
        assert_eq!(values.cgst, dec("9001"));
        assert_eq!(values.sgst, dec("9001"));
        assert_eq!(values.grand_total, dec("118002"));
        assert_eq!(values.amount_in_words, "One Lakh Eighteen Thousand Two Only");
        assert_eq!(values.po, PoDetails::default());
    }

    #[test]
    fn test_fill_template_replaces_all_placeholders() {
        let sheet = create_sheet("Monthly");
        let po = PoDetails {
            po_number: "PO-9".to_string(),
            validity: "31-03-2026".to_string(),
        };
        let values = BillValues::new(
            &sheet,
            BillingMonth::new(2026, 2).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 27).unwrap(),
            Some(&po),
        );
        let template = "Date: {{invoice_date}}\nPeriod: {{billing_period}}\n\
                        Total {{contract_total}} CGST {{cgst}} SGST {{sgst}} IGST {{igst}}\n\
                        PO {{po_number}} valid {{validity}}\n{{unknown}}";

        let bill = fill_bill_template(template, &values);
        assert!(bill.contains("Date: 27-02-2026"));
        assert!(bill.contains("Period: 01 Feb 2026 to 28 Feb 2026"));
        assert!(bill.contains("Total 100000 CGST 9001 SGST 9001 IGST 0"));
        assert!(bill.contains("PO PO-9 valid 31-03-2026"));
        assert!(bill.contains("{{unknown}}"));
    }
}
