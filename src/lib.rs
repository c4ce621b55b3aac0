//! Sales payroll engine
//!
//! This crate turns daily sales and attendance records into worker pay. Each
//! day's revenue (units sold times a fixed unit price) is split evenly among
//! the distinct workers present that day. Payroll runs either for a single
//! day, overwriting each present worker's pay figure, or over a date range,
//! accumulating per-worker income into a report that can be exported as
//! JSON.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod store;
