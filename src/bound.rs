use log::trace;
use num_traits::{Signed, Zero};

use crate::row::RelOp;
use crate::store::{RowId, RowStore};
use crate::variable::{VarId, VariableTable};
use crate::Rational;

/// One row's opinion on how far `x` may move before this row reaches
/// its own boundary (`= 0`, `<= 0`, or `< 0`).
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCandidate {
    pub row: RowId,
    pub value: Rational,
    pub strict: bool,
}

/// The tightest bound found across every row mentioning `x`, together
/// with whatever else tied it — `find_bound` only needs the winner,
/// but callers of `resolve` want the full candidate to pivot against.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundResult {
    pub winner: BoundCandidate,
}

/// Find the tightest finite bound on `x` in the direction `x` is about
/// to move (`increasing = true` means we are searching for how far `x`
/// can grow).
///
/// A row with coefficient `a` on `x` only binds in one direction
/// unless it's an equality, which binds in both and is always
/// reported immediately since nothing can be tighter than "exactly
/// this value" (spec.md §4.2's equality short-circuit, reused here for
/// `maximize`'s bound search as well as `project`'s).
///
/// Ties prefer the candidate with a strict relation, since `< 0` is a
/// tighter boundary than `<= 0` at the same value.
pub fn find_bound(
    store: &RowStore,
    model: &VariableTable,
    x: VarId,
    increasing: bool,
    exclude: Option<RowId>,
) -> Option<BoundResult> {
    let mut winner: Option<BoundCandidate> = None;

    for row_id in store.rows_of(x) {
        if Some(row_id) == exclude {
            continue;
        }
        let row = store.row(row_id);
        let a = row.get_coefficient(x);
        if a.is_zero() {
            continue;
        }
        let rest = row.value() - &a * model.get(x);
        let bound = -&rest / &a;
        let strict = row.rel().is_lt();

        let binds = match row.rel() {
            RelOp::Eq => true,
            _ => {
                if increasing {
                    a.is_positive()
                } else {
                    a.is_negative()
                }
            }
        };
        if !binds {
            continue;
        }

        if row.rel().is_eq() {
            trace!("find_bound x={x} row={row_id} equality short-circuit at {bound}");
            // An equality pins x to an exact value — nothing is approached,
            // so this bound introduces no strictness regardless of `strict`
            // above (which is only meaningful for `<`/`<=` rows).
            return Some(BoundResult {
                winner: BoundCandidate { row: row_id, value: bound, strict: false },
            });
        }

        let candidate = BoundCandidate { row: row_id, value: bound, strict };
        winner = Some(match winner {
            None => candidate,
            Some(best) => pick_tighter(best, candidate, increasing),
        });
    }

    winner.map(|winner| BoundResult { winner })
}

fn pick_tighter(a: BoundCandidate, b: BoundCandidate, increasing: bool) -> BoundCandidate {
    use std::cmp::Ordering;
    let ord = a.value.cmp(&b.value);
    let a_tighter = if increasing { ord == Ordering::Less } else { ord == Ordering::Greater };
    if a_tighter {
        a
    } else if ord == Ordering::Equal {
        if a.strict {
            a
        } else {
            b
        }
    } else {
        b
    }
}
