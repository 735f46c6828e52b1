//! Core domain layer of the inventory summary job.
//!
//! Models, row classification rules, unit and calendar helpers, the error
//! type and the CLI / file configuration shared by the other crates.

pub mod calendar;
pub mod classify;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod units;
