use log::{debug, info};
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use ratio_extension::BigExtendedRational;

use crate::bound::find_bound;
use crate::resolve::resolve;
use crate::store::{RowId, RowStore};
use crate::variable::{VarId, VariableTable};
use crate::Rational;

/// Defensive cap on pivot steps, grounded on achronyme-solver's
/// `max_iterations` guard: every pivot strictly eliminates one
/// variable from the objective row and variables are never
/// reintroduced into it, so this can only fire if that invariant has
/// been broken elsewhere — it turns an infinite loop into a panic.
const MAX_RESOLUTION_STEPS: usize = 1_000_000;

/// One step of the objective's elimination history: `x` left the
/// objective by being resolved against `row`. `row` is marked dead the
/// moment it's recorded and is never touched again, so its content is
/// frozen for the backward repair pass to read back later.
struct TrailEntry {
    var: VarId,
    row: RowId,
}

/// Drive the objective row to a constant by repeatedly pivoting its
/// leading variable against its tightest bound among the other rows.
///
/// Returns `Infinity` the first time a variable has no binding row in
/// the direction that would increase the objective. Otherwise returns
/// the constant the objective settles to — `Finite` if every pivot
/// used a non-strict bound, `FiniteStrict` (the textbook `value - ε`)
/// if any pivot's tightest bound came from a strict row, since the
/// supremum is then approached but never attained.
///
/// The model is left untouched while variables are being eliminated —
/// no live row still mentions an eliminated variable by the time its
/// pivot is marked dead, so nothing requires a value for it yet. Once
/// the objective is a constant, [`repair_model`] walks the elimination
/// trail backward to reconstruct a witnessing value for every
/// eliminated variable from the (now frozen) pivot row it was resolved
/// against, per spec.md §4.4.
pub fn maximize(store: &mut RowStore, model: &mut VariableTable) -> BigExtendedRational {
    let mut trail: Vec<TrailEntry> = Vec::new();
    let mut any_strict = false;

    for _ in 0..MAX_RESOLUTION_STEPS {
        let objective = store.row(RowId::OBJECTIVE);
        let Some(leading) = objective.vars().last().cloned() else {
            break;
        };
        let x = leading.var;
        let increasing = leading.coeff.is_positive();

        let Some(bound) = find_bound(store, model, x, increasing, Some(RowId::OBJECTIVE)) else {
            info!("maximize: variable {x} unbounded in the objective direction");
            return BigExtendedRational::infinity();
        };

        debug!(
            "maximize: pivot x={x} against row={} bound={} strict={}",
            bound.winner.row, bound.winner.value, bound.winner.strict
        );
        any_strict |= bound.winner.strict;

        let pivot = bound.winner.row;
        // spec.md §4.4 step 4: resolve the pivot against every other live
        // row mentioning x first, so x is purged from the whole system,
        // not just the objective — otherwise rows outside the objective's
        // path would keep a stale reference to a variable no longer
        // tracked by the elimination trail.
        let others: Vec<RowId> = store
            .rows_of(x)
            .into_iter()
            .filter(|&id| id != RowId::OBJECTIVE && id != pivot)
            .collect();
        for row in others {
            resolve(store, model, row, pivot, x);
        }
        resolve(store, model, RowId::OBJECTIVE, pivot, x);
        store.mark_dead(pivot);
        refresh_all(store, model);
        trail.push(TrailEntry { var: x, row: pivot });
    }

    debug_assert!(
        store.row(RowId::OBJECTIVE).vars().is_empty(),
        "maximize must reduce the objective to a constant or report Infinity"
    );

    repair_model(store, model, &trail);

    let value = store.row(RowId::OBJECTIVE).const_term().clone();
    if any_strict {
        BigExtendedRational::finite_strict(value)
    } else {
        BigExtendedRational::finite(value)
    }
}

/// Reconstruct a witnessing model value for every variable the
/// objective shed, walking the trail most-recently-eliminated first so
/// that every other variable a pivot row mentions has already been
/// fixed to its final value by the time that pivot is used to solve
/// for its own variable.
fn repair_model(store: &mut RowStore, model: &mut VariableTable, trail: &[TrailEntry]) {
    let two = Rational::from_integer(BigInt::from(2));

    for entry in trail.iter().rev() {
        let x = entry.var;
        let row = store.row(entry.row);
        let a = row.get_coefficient(x);
        debug_assert!(!a.is_zero(), "pivot row must still carry the variable it eliminated");

        let old = model.get(x).clone();
        // row.evaluate includes x's stale (pre-repair) value under `a`;
        // subtracting it back out isolates the contribution of every
        // other (already-repaired) variable in the row.
        let rest = row.evaluate(model) - &a * &old;
        let exact = -&rest / &a;

        let new_value = if row.rel().is_lt() {
            let diff = (&old - &exact).abs();
            let half = &diff / &two;
            let eps = if half < Rational::one() { half } else { Rational::one() };
            if a.is_negative() {
                &exact + &eps
            } else {
                &exact - &eps
            }
        } else {
            exact
        };

        debug!("repair_model: x={x} pivot={} -> {new_value}", entry.row);
        model.set(x, new_value);
        for row_id in store.rows_of(x) {
            store.row_mut(row_id).refresh(model);
        }
    }
}

fn refresh_all(store: &mut RowStore, model: &VariableTable) {
    for id in 0..store.len() {
        let id = RowId(id);
        let row = store.row_mut(id);
        row.refresh(model);
    }
}
