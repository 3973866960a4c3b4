//! The engine service.
//!
//! [`VrService`] owns the configuration and the [`SourceRegistry`] and
//! exposes the three engine operations: consolidate, calculate and validate.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{PayoutComputation, PayoutRow, ValidationRow};
use crate::output::{write_payout_table, write_validation_report};
use crate::report::{compute_payouts, compute_validation};
use crate::sources::{LoadSummary, SourceRegistry};

/// The VR engine: configuration plus the loaded sources.
///
/// # Example
///
/// ```no_run
/// use vr_engine::config::EngineConfig;
/// use vr_engine::service::VrService;
///
/// let service = VrService::new(EngineConfig::default());
/// let summary = service.consolidate(None).unwrap();
/// println!("{}", summary);
/// let result = service.calculate().unwrap();
/// println!("Payout table: {}", result.display());
/// ```
#[derive(Debug, Default)]
pub struct VrService {
    config: EngineConfig,
    registry: SourceRegistry,
}

impl VrService {
    /// Creates a service with nothing loaded.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: SourceRegistry::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns true once sources have been consolidated.
    pub fn is_loaded(&self) -> bool {
        self.registry.is_loaded()
    }

    /// Loads the ten sources from `location`, or from the data directory.
    ///
    /// Replaces any previously loaded sources on success; on failure the
    /// previous sources stay loaded.
    pub fn consolidate(&self, location: Option<&Path>) -> EngineResult<LoadSummary> {
        let location = location.unwrap_or(self.config.paths.data_dir.as_path());
        info!(location = %location.display(), "Consolidating sources");
        self.registry.load(location, &self.config.sources)
    }

    /// Payout computations with their audit traces, without writing.
    pub fn payout_computations(&self) -> EngineResult<Vec<PayoutComputation>> {
        let store = self.registry.snapshot()?;
        compute_payouts(&store, &self.config)
    }

    /// Payout rows, without writing.
    pub fn payout_rows(&self) -> EngineResult<Vec<PayoutRow>> {
        Ok(self
            .payout_computations()?
            .into_iter()
            .map(|c| c.row)
            .collect())
    }

    /// Validation rows, without writing.
    pub fn validation_rows(&self) -> EngineResult<Vec<ValidationRow>> {
        let store = self.registry.snapshot()?;
        compute_validation(&store, &self.config)
    }

    /// Computes and writes the payout table, returning its path.
    pub fn calculate(&self) -> EngineResult<PathBuf> {
        self.calculate_rows().map(|(path, _)| path)
    }

    /// Computes and writes the payout table, returning its path and the
    /// computations written.
    pub fn calculate_rows(&self) -> EngineResult<(PathBuf, Vec<PayoutComputation>)> {
        let start_time = Instant::now();
        let computations = self.payout_computations()?;
        let rows: Vec<PayoutRow> = computations.iter().map(|c| c.row.clone()).collect();

        let path = self.config.paths.result_path();
        write_payout_table(&rows, &path)?;

        info!(
            path = %path.display(),
            rows = rows.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Calculation completed"
        );
        Ok((path, computations))
    }

    /// Computes and writes the validation report, returning its path.
    pub fn validate(&self) -> EngineResult<PathBuf> {
        self.validate_rows().map(|(path, _)| path)
    }

    /// Computes and writes the validation report, returning its path and
    /// the rows written.
    pub fn validate_rows(&self) -> EngineResult<(PathBuf, Vec<ValidationRow>)> {
        let rows = self.validation_rows()?;
        let path = self.config.paths.validation_path();
        write_validation_report(&rows, &path)?;
        info!(path = %path.display(), rows = rows.len(), "Validation completed");
        Ok((path, rows))
    }
}
