//! Configuration loading for a billing run.
//!
//! A run is described by one YAML file naming the billing month and mode,
//! the tax rates, the input tables and the output directory.
//!
//! # Example
//!
//! ```no_run
//! use billing_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/billing.yaml").unwrap();
//! println!("Billing {} in {} mode", config.billing_month(), config.mode());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BillingConfig, BillingMode, BillingSection, InputSection, OutputSection};
