//! Quantified invariants from spec.md §8, checked against small randomly
//! generated linear systems rather than the worked examples in
//! `scenarios.rs`.

use mbo::{Engine, RelOp, Row};
use num_bigint::BigInt;
use num_rational::BigRational;
use proptest::prelude::*;

fn rat(n: i32) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

fn assert_row_canonical(row: &Row) {
    let vars = row.vars();
    for w in vars.windows(2) {
        assert!(w[0].var < w[1].var, "vars must be strictly id-increasing");
    }
    for m in vars {
        assert_ne!(m.coeff, rat(0), "stored coefficients must be nonzero");
    }
}

fn assert_row_satisfied(row: &Row) {
    match row.rel() {
        RelOp::Eq => assert_eq!(row.value(), &rat(0)),
        RelOp::Lt => assert!(row.value() < &rat(0)),
        RelOp::Le => assert!(row.value() <= &rat(0)),
    }
}

proptest! {
    // P1 + P3: after building an arbitrary small non-strict LP and adding a
    // feasible upper bound to every variable, every live row stays in
    // canonical form and satisfied by the model.
    #[test]
    fn add_constraint_preserves_canonical_form_and_satisfaction(
        coeffs in prop::collection::vec(-5i32..=5, 1..4),
        bound in 1i32..50,
    ) {
        let mut engine = Engine::new();
        let vars: Vec<_> = coeffs.iter().map(|_| engine.add_var(rat(0))).collect();
        let terms: Vec<_> = vars.iter().zip(&coeffs).map(|(&v, &c)| (v, rat(c))).collect();
        let nonzero_terms: Vec<_> = terms.iter().cloned().filter(|(_, c)| c != &rat(0)).collect();
        prop_assume!(!nonzero_terms.is_empty());

        engine.add_constraint(&nonzero_terms, rat(-bound), RelOp::Le);

        for row in engine.get_live_rows() {
            assert_row_canonical(row);
            assert_row_satisfied(row);
        }
    }

    // P6 + P3: maximizing a single bounded variable returns its bound and
    // leaves every live constraint satisfied by the repaired model.
    #[test]
    fn maximize_single_variable_bound_is_sound(bound in -20i32..50) {
        let mut engine = Engine::new();
        let x = engine.add_var(rat(0));
        engine.add_constraint(&[(x, rat(1))], rat(-bound), RelOp::Le);
        engine.set_objective(&[(x, rat(1))]);

        let result = engine.maximize();
        prop_assert_eq!(result, mbo::ExtendedValue::finite(rat(bound)));
        prop_assert_eq!(engine.get_value(x), &rat(bound));
        for row in engine.get_live_rows() {
            assert_row_satisfied(row);
        }
    }

    // P4: resolving a variable out of a two-row chain always eliminates it
    // from the downstream row, whatever the two bounds are.
    #[test]
    fn chained_bound_eliminates_the_shared_variable(
        upper in -20i32..20,
        lower in -20i32..20,
    ) {
        let mut engine = Engine::new();
        let v0 = engine.add_var(rat(0));
        let v1 = engine.add_var(rat(lower.max(upper) + 1));
        // v0 <= v1, v1 <= upper (only meaningful once v0's value also satisfies it)
        engine.add_constraint(&[(v0, rat(1)), (v1, rat(-1))], rat(0), RelOp::Le);
        engine.add_constraint(&[(v1, rat(1))], rat(-upper.max(lower + 1)), RelOp::Le);
        engine.set_objective(&[(v0, rat(1))]);

        engine.maximize();
        for row in engine.get_live_rows() {
            assert_eq!(row.get_coefficient(v0), rat(0));
        }
    }

    // P5: projecting a variable out of a satisfied two-sided bound preserves
    // satisfiability of everything that survives.
    #[test]
    fn project_preserves_satisfiability_for_two_sided_bounds(
        lo in -20i32..0,
        hi in 1i32..20,
        witness in -20i32..20,
    ) {
        prop_assume!(lo < witness && witness < hi);
        let mut engine = Engine::new();
        let x = engine.add_var(rat(witness));
        // lo <= x <= hi, i.e. -x + lo <= 0 and x - hi <= 0
        engine.add_constraint(&[(x, rat(-1))], rat(lo), RelOp::Le);
        engine.add_constraint(&[(x, rat(1))], rat(-hi), RelOp::Le);

        engine.project_one(x);

        for row in engine.get_live_rows() {
            assert_eq!(row.get_coefficient(x), rat(0));
            assert_row_satisfied(row);
        }
    }
}
