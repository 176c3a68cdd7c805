use std::collections::HashMap;

use derive_more::Display;
use log::{debug, trace};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::row::{Monomial, RelOp, Row};
use crate::variable::{VarId, VariableTable};
use crate::Rational;

/// A dense, never-reused handle into [`RowStore`]. Row `0` is always
/// the objective row, installed by [`RowStore::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
pub struct RowId(pub(crate) usize);

impl RowId {
    pub const OBJECTIVE: RowId = RowId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// The append-only, stale-tolerant multiset backing `rows_of`.
///
/// Entries are never removed when a row dies or a coefficient cancels
/// to zero — [`RowStore::rows_of`] filters stale entries out at read
/// time by re-checking the live coefficient, exactly as spec.md §3
/// describes for invariant 5. This keeps `mul_add` append-only and
/// O(new terms) instead of paying to scrub every index touched by a
/// resolution step.
#[derive(Debug, Clone, Default)]
struct RowIndex {
    by_var: HashMap<VarId, Vec<RowId>>,
}

impl RowIndex {
    fn record(&mut self, var: VarId, row: RowId) {
        self.by_var.entry(var).or_default().push(row);
    }

    fn candidates(&self, var: VarId) -> &[RowId] {
        self.by_var.get(&var).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The row collection: a dense `Vec<Row>` plus the index used to
/// answer "which rows mention variable `x`" without scanning every
/// row on every pivot.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: Vec<Row>,
    index: RowIndex,
}

impl RowStore {
    /// A fresh store with the objective row (`RowId::OBJECTIVE`)
    /// already installed as an all-zero, `<=` row — callers overwrite
    /// its coefficients via [`crate::engine::Engine::set_objective`].
    pub fn new() -> Self {
        let mut store = Self {
            rows: Vec::new(),
            index: RowIndex::default(),
        };
        store.rows.push(Row::new(Vec::new(), Rational::zero(), RelOp::Le, Rational::zero()));
        store
    }

    pub fn row(&self, id: RowId) -> &Row {
        &self.rows[id.0]
    }

    pub(crate) fn row_mut(&mut self, id: RowId) -> &mut Row {
        &mut self.rows[id.0]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Live rows other than the objective, in id order.
    pub fn live_rows(&self) -> impl Iterator<Item = (RowId, &Row)> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, r)| r.is_alive())
            .map(|(i, r)| (RowId(i), r))
    }

    pub fn add_row(&mut self, vars: Vec<Monomial>, const_term: Rational, rel: RelOp, model: &VariableTable) -> RowId {
        let id = RowId(self.rows.len());
        let row = Row::new(vars, const_term, rel, Rational::zero());
        for m in &row.vars {
            self.index.record(m.var, id);
        }
        self.rows.push(row);
        self.row_mut(id).refresh(model);
        trace!("added row {id} with {} term(s)", self.row(id).vars().len());
        id
    }

    pub fn mark_dead(&mut self, id: RowId) {
        debug!("row {id} marked dead");
        self.rows[id.0].alive = false;
    }

    /// Every live row that currently mentions `var` with a nonzero
    /// coefficient. `RowId::OBJECTIVE` never appears here — [`mul_add`]
    /// intentionally omits it from the index (spec.md §4.1): the
    /// objective is never a bound-providing row, so an index entry for
    /// it would never be read.
    ///
    /// [`mul_add`]: Self::mul_add
    pub fn rows_of(&self, var: VarId) -> Vec<RowId> {
        self.index
            .candidates(var)
            .iter()
            .copied()
            .filter(|&id| self.rows[id.0].is_alive() && !self.rows[id.0].get_coefficient(var).is_zero())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `dst := dst + c * src`, re-evaluating `dst`'s cached value and
    /// folding the relation per [`Row::combined_rel`]. `src` is left
    /// untouched. Returns the variables newly introduced into `dst` so
    /// the caller can extend the row index.
    pub(crate) fn mul_add(&mut self, dst: RowId, c: &Rational, src: RowId, same_sign: bool, model: &VariableTable) -> Vec<VarId> {
        debug_assert_ne!(dst, src, "mul_add requires distinct rows");
        let src_vars = self.row(src).vars().to_vec();
        let src_rel = self.row(src).rel();

        let dst_row = self.row(dst);
        let (merged, newly_added) = dst_row.merge_add(c, &src_vars);
        let new_rel = Row::combined_rel(same_sign, dst_row.rel(), src_rel);

        let dst_row = self.row_mut(dst);
        dst_row.vars = merged;
        dst_row.rel = new_rel;
        dst_row.const_term = &dst_row.const_term + c * self.row(src).const_term();
        self.row_mut(dst).refresh(model);

        if dst != RowId::OBJECTIVE {
            for &var in &newly_added {
                self.index.record(var, dst);
            }
        }
        trace!("mul_add dst={dst} src={src} c={c} -> {} term(s)", self.row(dst).vars().len());
        newly_added
    }
}
