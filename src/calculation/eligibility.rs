//! Eligibility filtering.
//!
//! Apprentices, interns, employees on leave, expatriates and directors do
//! not receive the benefit. The first four come from their own extracts;
//! directors are detected from the role title.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use tracing::debug;

use crate::error::EngineResult;
use crate::models::{EmployeeId, EmployeeRecord, ReasonTag};
use crate::sources::{EXPATRIATE_ID_COLUMN, ID_COLUMN, SourceKind, SourceStore, id_set};

/// Role-title marker identifying directors.
pub const DIRECTOR_MARKER: &str = "DIRETOR";

/// The ID sets that exclude an employee from the payout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSets {
    /// Apprentice IDs.
    pub apprentice: BTreeSet<EmployeeId>,
    /// Intern IDs.
    pub intern: BTreeSet<EmployeeId>,
    /// IDs on leave of absence.
    pub leave: BTreeSet<EmployeeId>,
    /// Expatriate IDs.
    pub expatriate: BTreeSet<EmployeeId>,
}

impl ExclusionSets {
    /// Returns true if `id` is in any of the four sets.
    pub fn contains(&self, id: EmployeeId) -> bool {
        self.apprentice.contains(&id)
            || self.intern.contains(&id)
            || self.leave.contains(&id)
            || self.expatriate.contains(&id)
    }

    /// The set-membership reasons for `id`, in report precedence order.
    pub fn reasons_for(&self, id: EmployeeId) -> Vec<ReasonTag> {
        [
            (&self.apprentice, ReasonTag::Apprentice),
            (&self.intern, ReasonTag::Intern),
            (&self.leave, ReasonTag::LeaveOfAbsence),
            (&self.expatriate, ReasonTag::Expatriate),
        ]
        .into_iter()
        .filter(|(set, _)| set.contains(&id))
        .map(|(_, tag)| tag)
        .collect()
    }
}

/// Reads the four exclusion sets from the loaded sources.
///
/// The expatriate extract identifies employees by `Cadastro` and may lack
/// the column entirely; the other three require `MATRICULA`.
pub fn exclusion_sets(store: &SourceStore) -> EngineResult<ExclusionSets> {
    let sets = ExclusionSets {
        apprentice: id_set(store, SourceKind::Apprentices, ID_COLUMN, true)?,
        intern: id_set(store, SourceKind::Interns, ID_COLUMN, true)?,
        leave: id_set(store, SourceKind::LeavesOfAbsence, ID_COLUMN, true)?,
        expatriate: id_set(store, SourceKind::Expatriates, EXPATRIATE_ID_COLUMN, false)?,
    };
    debug!(
        apprentices = sets.apprentice.len(),
        interns = sets.intern.len(),
        leaves = sets.leave.len(),
        expatriates = sets.expatriate.len(),
        "Exclusion sets built"
    );
    Ok(sets)
}

/// Returns true if the role title contains `DIRETOR`, ignoring case.
///
/// # Examples
///
/// ```
/// use vr_engine::calculation::is_director;
///
/// assert!(is_director("DIRETOR FINANCEIRO"));
/// assert!(is_director("Diretora de RH"));
/// assert!(!is_director("GERENTE"));
/// assert!(!is_director(""));
/// ```
pub fn is_director(role_title: &str) -> bool {
    role_title.to_uppercase().contains(DIRECTOR_MARKER)
}

/// Drops excluded employees and directors, keeping roster order.
pub fn apply_exclusions(roster: &[EmployeeRecord], sets: &ExclusionSets) -> Vec<EmployeeRecord> {
    roster
        .iter()
        .filter(|e| !sets.contains(e.id) && !e.is_director())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::extract::tests::{num, store_with, table, text};
    use crate::sources::Cell;

    fn sets(apprentice: &[i64], intern: &[i64], leave: &[i64], expat: &[i64]) -> ExclusionSets {
        ExclusionSets {
            apprentice: apprentice.iter().copied().collect(),
            intern: intern.iter().copied().collect(),
            leave: leave.iter().copied().collect(),
            expatriate: expat.iter().copied().collect(),
        }
    }

    #[test]
    fn test_apply_exclusions_removes_sets_and_directors() {
        let roster = vec![
            EmployeeRecord::new(1, "ANALISTA", "SINDPD SP"),
            EmployeeRecord::new(2, "APRENDIZ", "SINDPD SP"),
            EmployeeRecord::new(3, "DIRETOR COMERCIAL", "SINDPD SP"),
            EmployeeRecord::new(4, "ESTAGIARIO", "SINDPD RJ"),
            EmployeeRecord::new(5, "ANALISTA", "SINDPD RJ"),
        ];
        let sets = sets(&[2], &[4], &[], &[]);

        let kept: Vec<_> = apply_exclusions(&roster, &sets).iter().map(|e| e.id).collect();
        assert_eq!(kept, vec![1, 5]);
    }

    #[test]
    fn test_reasons_follow_precedence() {
        let sets = sets(&[9], &[], &[9], &[9]);
        assert_eq!(
            sets.reasons_for(9),
            vec![
                ReasonTag::Apprentice,
                ReasonTag::LeaveOfAbsence,
                ReasonTag::Expatriate
            ]
        );
        assert!(sets.reasons_for(10).is_empty());
    }

    #[test]
    fn test_contains_checks_every_set() {
        let sets = sets(&[1], &[2], &[3], &[4]);
        for id in 1..=4 {
            assert!(sets.contains(id));
        }
        assert!(!sets.contains(5));
    }

    #[test]
    fn test_exclusion_sets_read_expatriates_by_cadastro() {
        let store = store_with(vec![
            (
                SourceKind::Apprentices,
                table(&["MATRICULA"], vec![vec![num(1.0)]]),
            ),
            (
                SourceKind::Interns,
                table(&["MATRICULA"], vec![vec![num(2.0)], vec![Cell::Empty]]),
            ),
            (
                SourceKind::LeavesOfAbsence,
                table(&["MATRICULA", "DESC. SITUACAO"], vec![vec![num(3.0), text("Licença")]]),
            ),
            (
                SourceKind::Expatriates,
                table(&["Cadastro", "Valor"], vec![vec![text("4"), num(0.0)]]),
            ),
        ]);

        let sets = exclusion_sets(&store).unwrap();
        assert!(sets.apprentice.contains(&1));
        assert_eq!(sets.intern.len(), 1);
        assert!(sets.leave.contains(&3));
        assert!(sets.expatriate.contains(&4));
    }

    #[test]
    fn test_exclusion_sets_tolerate_missing_expatriate_column() {
        let store = store_with(vec![(
            SourceKind::Expatriates,
            table(&["MATRICULA"], vec![vec![num(4.0)]]),
        )]);
        let sets = exclusion_sets(&store).unwrap();
        assert!(sets.expatriate.is_empty());
    }
}
