//! Configuration loading for the payroll engine.
//!
//! The engine takes its unit price (and the exporter its currency scale and
//! report directory) from a single YAML file.
//!
//! # Example
//!
//! ```no_run
//! use sales_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! println!("Paying {} per unit sold", config.unit_price());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{MAX_CURRENCY_SCALE, PayrollConfig};
