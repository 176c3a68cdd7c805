use log::{debug, trace};
use num_traits::Signed;

use crate::bound::find_bound;
use crate::resolve::resolve;
use crate::row::RelOp;
use crate::store::{RowId, RowStore};
use crate::variable::{VarId, VariableTable};

/// Eliminate `x` from the constraint system (the objective row is
/// never touched by projection) using the model to pick a single
/// representative constraint per bucket instead of resolving every
/// upper bound against every lower bound.
///
/// - If any live row ties `x` with `=`, every other row mentioning `x`
///   is resolved against it directly and the equality is retired —
///   there is nothing tighter than an exact value, so no bucket logic
///   is needed (spec.md §4.2's equality short-circuit).
/// - If `x` is only ever bounded from one side, every row mentioning
///   it is vacuously satisfiable by picking `x` far enough in the
///   unbounded direction and is simply dropped.
/// - Otherwise the bucket with fewer rows contributes its tightest
///   row (by [`find_bound`]) as representative; every *other* row that
///   mentioned `x` — from either bucket — is resolved against the
///   representative in place, so it stays alive as an `x`-free
///   resolvent. Only the representative itself is then marked dead,
///   per spec.md §4.5 step 4: the net result is `(N-1) + M` (or
///   symmetric) live resolvents, not an empty system.
pub fn project_one(store: &mut RowStore, model: &VariableTable, x: VarId) {
    let rows: Vec<RowId> = store
        .rows_of(x)
        .into_iter()
        .filter(|&id| id != RowId::OBJECTIVE)
        .collect();
    if rows.is_empty() {
        trace!("project_one x={x}: free variable, nothing to do");
        return;
    }

    if let Some(&eq_row) = rows.iter().find(|&&id| store.row(id).rel() == RelOp::Eq) {
        debug!("project_one x={x}: equality short-circuit via row={eq_row}");
        for &row in &rows {
            if row != eq_row {
                resolve(store, model, row, eq_row, x);
            }
        }
        store.mark_dead(eq_row);
        return;
    }

    let (upper, lower): (Vec<RowId>, Vec<RowId>) = rows
        .iter()
        .partition(|&&id| store.row(id).get_coefficient(x).is_positive());

    if upper.is_empty() || lower.is_empty() {
        debug!("project_one x={x}: one-sided, dropping {} row(s)", rows.len());
        for row in rows {
            store.mark_dead(row);
        }
        return;
    }

    let representative = if upper.len() <= lower.len() {
        find_bound(store, model, x, true, Some(RowId::OBJECTIVE)).expect("upper bucket nonempty").winner.row
    } else {
        find_bound(store, model, x, false, Some(RowId::OBJECTIVE)).expect("lower bucket nonempty").winner.row
    };

    debug!(
        "project_one x={x}: representative row={representative}, resolving against {} row(s)",
        rows.len() - 1
    );
    for &row in &rows {
        if row != representative {
            resolve(store, model, row, representative, x);
        }
    }

    store.mark_dead(representative);
}

/// Eliminate every variable in `vars`, in order.
pub fn project(store: &mut RowStore, model: &VariableTable, vars: &[VarId]) {
    for &x in vars {
        project_one(store, model, x);
    }
}
