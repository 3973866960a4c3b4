//! Output writers for the VR engine.
//!
//! Persists the payout table and the validation report as `.xlsx`
//! workbooks.

mod xlsx;

pub use xlsx::{PAYOUT_SHEET, VALIDATION_SHEET, write_payout_table, write_validation_report};
