//! Presentation of billed line items.
//!
//! This module folds line items into per-group annexure sheets with their
//! totals rows, summarises every group in a master summary, and fills bill
//! documents with each group's rounded totals. Everything here is data; the
//! [`tabular`](crate::tabular) module writes it out.

mod bill;
mod column;
mod sheet;
mod summary;
mod words;

pub use bill::{BillValues, PAYMENT_TERMS_DAYS, fill_bill_template};
pub use column::{AnnexureLine, Cell, Column, ColumnKind, LineAmounts};
pub use sheet::{AnnexureSheet, GroupTotals, TOTAL_LABEL, build_annexures, group_lines};
pub use summary::{
    GRAND_TOTAL_LABEL, MasterSummary, PoDetails, PoDirectory, SUMMARY_HEADERS, SummaryAmounts,
    SummaryRow,
};
pub use words::amount_in_words;
