//! Core data models for the VR engine.
//!
//! This module contains all the domain models used throughout the engine.

mod billing_period;
mod calculation_result;
mod employee;
mod validation;

pub use billing_period::BillingPeriod;
pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, PAYOUT_COLUMNS, PayoutComputation, PayoutRow,
    PayoutTotals,
};
pub use employee::{EmployeeId, EmployeeRecord};
pub use validation::{REASON_SEPARATOR, ReasonTag, VALIDATION_COLUMNS, ValidationRow};
