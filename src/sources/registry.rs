//! The source registry.
//!
//! Holds the ten loaded tables for the current session. A load reads every
//! table into a new [`SourceStore`] before swapping it in, so readers see
//! either the previous complete store or the new one.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use tracing::{debug, info};

use crate::config::SourceFileNames;
use crate::error::{EngineError, EngineResult};

use super::archive::{ExtractedArchive, is_archive, locate_source_file};
use super::reader::read_table;
use super::table::Table;

/// The ten logical HR extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Active roster.
    Active,
    /// Admissions in the period.
    Admissions,
    /// Terminations.
    Terminations,
    /// Vacations.
    Vacations,
    /// Leaves of absence.
    LeavesOfAbsence,
    /// Apprentices.
    Apprentices,
    /// Interns.
    Interns,
    /// Expatriates.
    Expatriates,
    /// Business days per union.
    BusinessDays,
    /// Daily rate per state.
    UnionRates,
}

impl SourceKind {
    /// Every source, in load order.
    pub const ALL: [SourceKind; 10] = [
        SourceKind::Active,
        SourceKind::Admissions,
        SourceKind::Terminations,
        SourceKind::Vacations,
        SourceKind::LeavesOfAbsence,
        SourceKind::Apprentices,
        SourceKind::Interns,
        SourceKind::Expatriates,
        SourceKind::BusinessDays,
        SourceKind::UnionRates,
    ];

    /// The short logical name used in summaries and logs.
    pub fn key(self) -> &'static str {
        match self {
            SourceKind::Active => "ativos",
            SourceKind::Admissions => "admis",
            SourceKind::Terminations => "deslig",
            SourceKind::Vacations => "ferias",
            SourceKind::LeavesOfAbsence => "afast",
            SourceKind::Apprentices => "aprend",
            SourceKind::Interns => "estagio",
            SourceKind::Expatriates => "exterior",
            SourceKind::BusinessDays => "dias_uteis",
            SourceKind::UnionRates => "sind_valor",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One complete set of loaded tables.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStore {
    tables: BTreeMap<SourceKind, Table>,
}

impl SourceStore {
    /// Builds a store, requiring every one of the ten sources.
    pub fn from_tables(tables: HashMap<SourceKind, Table>) -> EngineResult<Self> {
        if let Some(missing) = SourceKind::ALL.iter().find(|k| !tables.contains_key(k)) {
            return Err(EngineError::SourceNotFound {
                path: missing.key().to_string(),
            });
        }
        Ok(Self {
            tables: tables.into_iter().collect(),
        })
    }

    /// The table for `kind`.
    pub fn table(&self, kind: SourceKind) -> &Table {
        // from_tables guarantees presence; the fallback only satisfies the type
        static EMPTY: Table = Table::empty();
        self.tables.get(&kind).unwrap_or(&EMPTY)
    }

    /// Row count per source.
    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            row_counts: self
                .tables
                .iter()
                .map(|(kind, table)| (*kind, table.len()))
                .collect(),
        }
    }
}

/// Row counts per logical source after a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Rows read from each source.
    pub row_counts: BTreeMap<SourceKind, usize>,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = self
            .row_counts
            .iter()
            .map(|(kind, rows)| format!("{}: {}", kind, rows))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Sources loaded successfully. Summary: {{{}}}", counts)
    }
}

/// Session holder for the currently loaded sources.
///
/// Loads are not merged: each successful load replaces the whole store, and
/// a failed load leaves the previous store in place.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    current: RwLock<Option<Arc<SourceStore>>>,
}

impl SourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every source from `location` and swaps the new store in.
    ///
    /// `location` is either a `.zip` archive, extracted to a temporary
    /// directory first, or a directory holding the files.
    pub fn load(&self, location: &Path, files: &SourceFileNames) -> EngineResult<LoadSummary> {
        let start_time = Instant::now();

        let store = if is_archive(location) {
            let extracted = ExtractedArchive::extract(location)?;
            Self::read_all(extracted.root(), files)?
        } else {
            if !location.is_dir() {
                return Err(EngineError::SourceNotFound {
                    path: location.display().to_string(),
                });
            }
            Self::read_all(location, files)?
        };

        let summary = self.replace(store);
        info!(
            location = %location.display(),
            total_rows = summary.row_counts.values().sum::<usize>(),
            duration_ms = start_time.elapsed().as_millis(),
            "Sources consolidated"
        );
        Ok(summary)
    }

    fn read_all(root: &Path, files: &SourceFileNames) -> EngineResult<SourceStore> {
        let mut tables = HashMap::with_capacity(SourceKind::ALL.len());
        for kind in SourceKind::ALL {
            let file_name = files.file_name(kind);
            let path = locate_source_file(root, file_name).ok_or_else(|| {
                EngineError::SourceNotFound {
                    path: root.join(file_name).display().to_string(),
                }
            })?;
            let table = read_table(&path)?;
            debug!(source = %kind, path = %path.display(), rows = table.len(), "Source read");
            tables.insert(kind, table);
        }
        SourceStore::from_tables(tables)
    }

    /// Swaps `store` in as the current store.
    pub fn replace(&self, store: SourceStore) -> LoadSummary {
        let summary = store.summary();
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(Arc::new(store));
        summary
    }

    /// The current store, or `SourcesNotLoaded`.
    pub fn snapshot(&self) -> EngineResult<Arc<SourceStore>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(EngineError::SourcesNotLoaded)
    }

    /// Returns true once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
