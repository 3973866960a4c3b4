//! Configuration types for the VR engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML. Every section defaults, so a partial file (or
//! no file at all) yields the May/2025 competence settings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::BillingPeriod;
use crate::sources::SourceKind;

/// Daily voucher rate used when a union's state cannot be priced.
pub const DEFAULT_FALLBACK_DAILY_RATE: Decimal = Decimal::from_parts(3500, 0, 0, false, 2);

/// Share of the total paid by the company.
pub const DEFAULT_EMPLOYER_SHARE: Decimal = Decimal::from_parts(80, 0, 0, false, 2);

/// Share of the total discounted from the employee.
pub const DEFAULT_EMPLOYEE_SHARE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The billing window.
    #[serde(default)]
    pub period: BillingPeriod,
    /// Rate fallback and cost split.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Data directory and output files.
    #[serde(default)]
    pub paths: PathsConfig,
    /// File name of each source table.
    #[serde(default)]
    pub sources: SourceFileNames,
}

/// Pricing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Rate applied when the union's state does not resolve.
    pub fallback_daily_rate: Decimal,
    /// Company share of the total.
    pub employer_share: Decimal,
    /// Employee share of the total.
    pub employee_share: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            fallback_daily_rate: DEFAULT_FALLBACK_DAILY_RATE,
            employer_share: DEFAULT_EMPLOYER_SHARE,
            employee_share: DEFAULT_EMPLOYEE_SHARE,
        }
    }
}

/// Data directory and output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the extracts and receiving the outputs.
    pub data_dir: PathBuf,
    /// File name of the payout table.
    pub result_file: String,
    /// File name of the validation report.
    pub validation_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            result_file: "VR_MENSAL_05_2025_RESULTADO.xlsx".to_string(),
            validation_file: "VR_MENSAL_05_2025_VALIDACAO.xlsx".to_string(),
        }
    }
}

impl PathsConfig {
    /// Full path of the payout table.
    pub fn result_path(&self) -> PathBuf {
        self.data_dir.join(&self.result_file)
    }

    /// Full path of the validation report.
    pub fn validation_path(&self) -> PathBuf {
        self.data_dir.join(&self.validation_file)
    }
}

/// File name of each logical source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFileNames {
    /// Active roster.
    pub active: String,
    /// Admissions in the period.
    pub admissions: String,
    /// Terminations.
    pub terminations: String,
    /// Vacations.
    pub vacations: String,
    /// Leaves of absence.
    pub leaves_of_absence: String,
    /// Apprentices.
    pub apprentices: String,
    /// Interns.
    pub interns: String,
    /// Expatriates.
    pub expatriates: String,
    /// Business days per union.
    pub business_days: String,
    /// Daily rate per state.
    pub union_rates: String,
}

impl Default for SourceFileNames {
    fn default() -> Self {
        Self {
            active: "ATIVOS.xlsx".to_string(),
            admissions: "ADMISSÃO ABRIL.xlsx".to_string(),
            terminations: "DESLIGADOS.xlsx".to_string(),
            vacations: "FÉRIAS.xlsx".to_string(),
            leaves_of_absence: "AFASTAMENTOS.xlsx".to_string(),
            apprentices: "APRENDIZ.xlsx".to_string(),
            interns: "ESTÁGIO.xlsx".to_string(),
            expatriates: "EXTERIOR.xlsx".to_string(),
            business_days: "Base dias uteis.xlsx".to_string(),
            union_rates: "Base sindicato x valor.xlsx".to_string(),
        }
    }
}

impl SourceFileNames {
    /// The file name configured for `kind`.
    pub fn file_name(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Active => &self.active,
            SourceKind::Admissions => &self.admissions,
            SourceKind::Terminations => &self.terminations,
            SourceKind::Vacations => &self.vacations,
            SourceKind::LeavesOfAbsence => &self.leaves_of_absence,
            SourceKind::Apprentices => &self.apprentices,
            SourceKind::Interns => &self.interns,
            SourceKind::Expatriates => &self.expatriates,
            SourceKind::BusinessDays => &self.business_days,
            SourceKind::UnionRates => &self.union_rates,
        }
    }
}
