//! Report assembly.
//!
//! Runs the calculation stages over a loaded [`SourceStore`](crate::sources::SourceStore)
//! and produces the payout table rows and the validation report rows.

mod payout;
mod validation;

pub use payout::{PayoutInputs, compute_payout, compute_payouts};
pub use validation::{compute_validation, reasons_for, validation_report};
