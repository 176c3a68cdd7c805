use log::info;
use ratio_extension::BigExtendedRational;

use crate::invariant::check_store;
use crate::maximize::maximize;
use crate::project::project;
use crate::row::{Monomial, RelOp, Row};
use crate::store::{RowId, RowStore};
use crate::variable::{VarId, VariableTable};
use crate::Rational;

/// A term of a constraint or objective expressed in terms of caller
/// variable ids, before it is sorted and compacted into a [`Row`].
pub type Term = (VarId, Rational);

/// The public surface: a model, the rows built over it, and the two
/// operations spec.md builds around — [`Engine::maximize`] and
/// [`Engine::project`].
///
/// Every method here either succeeds or panics via `debug_assert!` on
/// a caller-violated precondition (for example referencing a
/// [`VarId`] the engine never handed out); there is no recoverable
/// `Result` on this API, per `SPEC_FULL.md` §B.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    store: RowStore,
    model: VariableTable,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            store: RowStore::new(),
            model: VariableTable::new(),
        }
    }

    /// Introduce a fresh variable with an initial value.
    pub fn add_var(&mut self, initial: Rational) -> VarId {
        self.model.add(initial)
    }

    pub fn get_value(&self, var: VarId) -> &Rational {
        self.model.get(var)
    }

    /// Add `(Σ coeff · var) + const REL 0` to the live constraint set.
    ///
    /// Precondition (spec.md §7): the model must already satisfy this
    /// constraint. Checked in debug builds only — a caller handing the
    /// engine an infeasible row is a programmer error, not a recoverable
    /// failure.
    pub fn add_constraint(&mut self, terms: &[Term], const_term: Rational, rel: RelOp) -> RowId {
        let vars = compact_terms(terms);
        #[cfg(debug_assertions)]
        let candidate_value = vars
            .iter()
            .fold(const_term.clone(), |acc, m| acc + &m.coeff * self.model.get(m.var));
        debug_assert!(
            match rel {
                RelOp::Eq => num_traits::Zero::is_zero(&candidate_value),
                RelOp::Lt => num_traits::Signed::is_negative(&candidate_value),
                RelOp::Le => !num_traits::Signed::is_positive(&candidate_value),
            },
            "add_constraint precondition violated: model does not satisfy the new row"
        );
        let id = self.store.add_row(vars, const_term, rel, &self.model);
        debug_assert!(check_store(&self.store, &self.model));
        id
    }

    /// Replace the objective row's linear expression (`Σ coeff · var`,
    /// no constant — the constant plays no role in maximization).
    pub fn set_objective(&mut self, terms: &[Term]) {
        let vars = compact_terms(terms);
        let row = self.store.row_mut(RowId::OBJECTIVE);
        row.vars = vars;
        row.refresh(&self.model);
    }

    /// Drive the objective to its supremum over the live constraints,
    /// mutating the model to witness the result.
    pub fn maximize(&mut self) -> BigExtendedRational {
        info!("maximize: {} live constraint row(s)", self.store.live_rows().count());
        let result = maximize(&mut self.store, &mut self.model);
        debug_assert!(check_store(&self.store, &self.model));
        result
    }

    /// Existentially eliminate `var` from the live constraints.
    pub fn project_one(&mut self, var: VarId) {
        project(&mut self.store, &self.model, std::slice::from_ref(&var));
        debug_assert!(check_store(&self.store, &self.model));
    }

    /// Existentially eliminate every variable in `vars`, in order.
    pub fn project(&mut self, vars: &[VarId]) {
        project(&mut self.store, &self.model, vars);
        debug_assert!(check_store(&self.store, &self.model));
    }

    pub fn get_live_rows(&self) -> Vec<&Row> {
        self.store.live_rows().map(|(_, row)| row).collect()
    }
}

fn compact_terms(terms: &[Term]) -> Vec<Monomial> {
    let mut sorted = terms.to_vec();
    sorted.sort_by_key(|(var, _)| *var);
    let mut merged: Vec<Monomial> = Vec::with_capacity(sorted.len());
    for (var, coeff) in sorted {
        match merged.last_mut() {
            Some(last) if last.var == var => last.coeff += coeff,
            _ => merged.push(Monomial { var, coeff }),
        }
    }
    merged.retain(|m| !num_traits::Zero::is_zero(&m.coeff));
    merged
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rat(n: i64) -> Rational {
        Rational::from_integer(n.into())
    }

    #[test]
    fn maximize_bounded_linear_program() {
        let mut engine = Engine::new();
        let x = engine.add_var(rat(0));
        let y = engine.add_var(rat(0));
        // x + y <= 10, x <= 6
        engine.add_constraint(&[(x, rat(1)), (y, rat(1))], rat(-10), RelOp::Le);
        engine.add_constraint(&[(x, rat(1))], rat(-6), RelOp::Le);
        engine.set_objective(&[(x, rat(1)), (y, rat(1))]);

        let result = engine.maximize();
        assert_eq!(result, BigExtendedRational::finite(rat(10)));
    }

    #[test]
    fn compact_terms_merges_duplicate_vars_and_drops_cancellations() {
        let x = VarId(0);
        let y = VarId(1);
        let merged = compact_terms(&[(x, rat(3)), (y, rat(1)), (x, rat(-3))]);
        assert_eq!(merged, vec![Monomial::new(y, rat(1))]);
    }

    #[test]
    fn project_one_removes_a_variable_from_every_live_row() {
        let mut engine = Engine::new();
        let x = engine.add_var(rat(0));
        let y = engine.add_var(rat(0));
        engine.add_constraint(&[(x, rat(1)), (y, rat(1))], rat(-10), RelOp::Le);
        engine.add_constraint(&[(x, rat(-1))], rat(-2), RelOp::Le);

        engine.project_one(x);

        for row in engine.get_live_rows() {
            assert_eq!(row.get_coefficient(x), rat(0));
        }
    }
}
