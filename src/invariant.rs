//! Debug-only consistency checks for the invariants spec.md §3 lists.
//!
//! None of these run in release builds — callers hang them off
//! `debug_assert!` so a violation panics loudly in development and
//! costs nothing in production, the same tradeoff the public API makes
//! everywhere else (see `SPEC_FULL.md` §B).

use crate::row::{RelOp, Row};
use crate::store::RowStore;
use crate::variable::VariableTable;

/// I1: a row's `vars` list is strictly increasing by id and every
/// coefficient is nonzero.
pub(crate) fn row_vars_sorted_and_nonzero(row: &Row) -> bool {
    row.vars()
        .windows(2)
        .all(|w| w[0].var < w[1].var)
        && row.vars().iter().all(|m| !num_traits::Zero::is_zero(&m.coeff))
}

/// I2: the row's cached `value` matches a fresh evaluation under `model`.
pub(crate) fn row_value_matches_model(row: &Row, model: &VariableTable) -> bool {
    row.value() == &row.evaluate(model)
}

/// I3/I4: a live non-objective row's relation actually holds under the
/// cached `value` — `=` rows evaluate to exactly zero, `<`/`<=` rows to
/// a negative/non-positive value respectively.
pub(crate) fn row_satisfies_its_relation(row: &Row) -> bool {
    use num_traits::{Signed, Zero};
    match row.rel() {
        RelOp::Eq => row.value().is_zero(),
        RelOp::Lt => row.value().is_negative(),
        RelOp::Le => !row.value().is_positive(),
    }
}

/// I5: `rows_of(var)` never omits a live row that truly mentions `var`
/// with a nonzero coefficient (it may tolerate stale extra entries,
/// but never a false negative).
fn rows_of_has_no_false_negatives(store: &RowStore, vars: &VariableTable) -> bool {
    for i in 0..vars.len() {
        let var = crate::variable::VarId(i);
        let indexed: std::collections::BTreeSet<_> = store.rows_of(var).into_iter().collect();
        for (id, row) in store.live_rows() {
            let truly_present = !row.get_coefficient(var).is_zero();
            if truly_present && !indexed.contains(&id) {
                return false;
            }
        }
    }
    true
}

/// Full store-wide check, intended for a single `debug_assert!` call
/// after any operation that mutates rows or the model.
pub(crate) fn check_store(store: &RowStore, vars: &VariableTable) -> bool {
    let objective_ok = row_value_matches_model(store.row(crate::store::RowId::OBJECTIVE), vars);
    let rows_ok = store.live_rows().all(|(_, row)| {
        row_vars_sorted_and_nonzero(row) && row_value_matches_model(row, vars) && row_satisfies_its_relation(row)
    });
    objective_ok && rows_ok && rows_of_has_no_false_negatives(store, vars)
}

#[cfg(test)]
mod tests {
    use crate::row::{Monomial, RelOp};
    use crate::variable::VarId;
    use crate::Rational;

    use super::*;

    fn rat(n: i64) -> Rational {
        Rational::from_integer(n.into())
    }

    #[test]
    fn fresh_store_passes_every_check() {
        let mut store = RowStore::new();
        let mut vars = VariableTable::new();
        let x = vars.add(rat(3));
        store.add_row(vec![Monomial::new(x, rat(1))], rat(-10), RelOp::Le, &vars);
        assert!(check_store(&store, &vars));
    }

    #[test]
    fn stale_model_fails_the_value_check() {
        let mut store = RowStore::new();
        let mut vars = VariableTable::new();
        let x = vars.add(rat(3));
        store.add_row(vec![Monomial::new(x, rat(1))], rat(-10), RelOp::Le, &vars);
        vars.set(x, rat(9));
        assert!(!check_store(&store, &vars));
    }

    #[test]
    fn model_that_violates_a_live_constraint_fails_the_relation_check() {
        let mut store = RowStore::new();
        let mut vars = VariableTable::new();
        let x = vars.add(rat(3));
        let row = store.add_row(vec![Monomial::new(x, rat(1))], rat(-10), RelOp::Le, &vars);
        // Move the model out of the feasible region and refresh the cached
        // value to match, so I2 holds but I3/I4 is what catches the breach.
        vars.set(x, rat(20));
        store.row_mut(row).refresh(&vars);
        assert!(!check_store(&store, &vars));
    }
}
