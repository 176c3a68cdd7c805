use derive_more::{Display, IsVariant};
use derive_new::new;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::variable::{VarId, VariableTable};
use crate::Rational;

/// The relation a row's linear expression is held against zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant, Display, Serialize, Deserialize)]
pub enum RelOp {
    #[display(fmt = "=")]
    Eq,
    #[display(fmt = "<")]
    Lt,
    #[display(fmt = "\u{2264}")]
    Le,
}

/// A single `(variable, coefficient)` term inside a [`Row`].
///
/// Never constructed with a zero coefficient — [`Row::merge_add`]
/// drops terms that cancel rather than keeping a zero around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monomial {
    pub var: VarId,
    pub coeff: Rational,
}

impl Monomial {
    pub fn new(var: VarId, coeff: Rational) -> Self {
        debug_assert!(!coeff.is_zero(), "monomial coefficients must be nonzero");
        Self { var, coeff }
    }
}

/// A linear constraint `(Σ coeff_i · v_i) + const REL 0`.
///
/// `vars` is always kept strictly increasing by [`VarId`] with every
/// coefficient nonzero (invariant 1); `value` is always kept equal to
/// [`Row::evaluate`] under whatever model last touched it (invariant
/// 2). Row id 0 is reserved for the objective by [`crate::store::RowStore`]
/// and is exempt from invariants 3–4 — see `spec.md` §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, new)]
pub struct Row {
    pub(crate) vars: Vec<Monomial>,
    pub(crate) const_term: Rational,
    pub(crate) rel: RelOp,
    pub(crate) value: Rational,
    #[new(value = "true")]
    pub(crate) alive: bool,
}

impl Row {
    pub fn vars(&self) -> &[Monomial] {
        &self.vars
    }

    pub fn const_term(&self) -> &Rational {
        &self.const_term
    }

    pub fn rel(&self) -> RelOp {
        self.rel
    }

    pub fn value(&self) -> &Rational {
        &self.value
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// `O(log n)` coefficient lookup by binary search over the sorted
    /// `vars` list; `0` if `var` does not appear.
    pub fn get_coefficient(&self, var: VarId) -> Rational {
        match self.vars.binary_search_by_key(&var, |m| m.var) {
            Ok(idx) => self.vars[idx].coeff.clone(),
            Err(_) => Rational::zero(),
        }
    }

    /// `const + Σ coeff · val(id)` under the given model.
    pub fn evaluate(&self, model: &VariableTable) -> Rational {
        self.vars
            .iter()
            .fold(self.const_term.clone(), |acc, m| acc + &m.coeff * model.get(m.var))
    }

    /// Refresh the cached `value` from `evaluate`, restoring invariant 2.
    pub(crate) fn refresh(&mut self, model: &VariableTable) {
        self.value = self.evaluate(model);
    }

    /// Merge `self.vars` with `src_vars` under `self + c * src`,
    /// dropping any monomial whose summed coefficient is zero.
    ///
    /// Returns the merged list together with the ids that were not
    /// already present in `self` — the caller uses that second list
    /// to update the row index (`rows_of`).
    pub(crate) fn merge_add(&self, c: &Rational, src_vars: &[Monomial]) -> (Vec<Monomial>, Vec<VarId>) {
        let mut merged = Vec::with_capacity(self.vars.len() + src_vars.len());
        let mut newly_added = Vec::new();

        let mut i = 0;
        let mut j = 0;
        while i < self.vars.len() && j < src_vars.len() {
            let lhs = &self.vars[i];
            let rhs = &src_vars[j];
            match lhs.var.cmp(&rhs.var) {
                std::cmp::Ordering::Less => {
                    merged.push(lhs.clone());
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    let coeff = c * &rhs.coeff;
                    if !coeff.is_zero() {
                        merged.push(Monomial::new(rhs.var, coeff));
                    }
                    newly_added.push(rhs.var);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    let coeff = &lhs.coeff + c * &rhs.coeff;
                    if !coeff.is_zero() {
                        merged.push(Monomial::new(lhs.var, coeff));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend(self.vars[i..].iter().cloned());
        for rhs in &src_vars[j..] {
            let coeff = c * &rhs.coeff;
            if !coeff.is_zero() {
                merged.push(Monomial::new(rhs.var, coeff));
            }
            newly_added.push(rhs.var);
        }

        (merged, newly_added)
    }

    /// The type rule from spec.md §4.1: strictness propagates when
    /// resolving opposite-signed rows, and two same-signed strict rows
    /// relax to non-strict.
    pub(crate) fn combined_rel(same_sign: bool, dst_rel: RelOp, src_rel: RelOp) -> RelOp {
        if !same_sign && src_rel.is_lt() {
            RelOp::Lt
        } else if same_sign && dst_rel.is_lt() && src_rel.is_lt() {
            RelOp::Le
        } else {
            dst_rel
        }
    }
}
