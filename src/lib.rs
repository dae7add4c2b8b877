//! Attendance-based client billing engine.
//!
//! This crate bills outsourced employees to client companies for a month:
//! it resolves each employee's billing cycle, prorates the base billing by
//! billable days, applies the client's service charge and goods and services
//! tax, and lays the results out as per-client annexures, a master summary and
//! filled bill documents. Records that fail validation are reported, never
//! billed, and never abort the batch.

#![warn(missing_docs)]

pub mod annexure;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod runner;
pub mod tabular;
