//! Meal-voucher (VR) payout reconciliation engine.
//!
//! This crate consolidates the monthly HR extracts (active roster,
//! admissions, terminations, vacations, exclusion lists, union calendars and
//! state rates), computes each eligible employee's voucher days and cost
//! split, and writes the payout table and a per-employee validation report.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod report;
pub mod service;
pub mod sources;
pub mod telemetry;
