use std::{cmp::Ordering, fmt};

use derive_more::IsVariant;
use num_integer::Integer;
use num_rational::Ratio;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// A rational extended with `+∞`, `-∞`, and a strict witness.
///
/// `Finite(r)` is an ordinary attained value. `FiniteStrict(r)` stands
/// for "the supremum is `r`, but it is not attained" — the textbook
/// `r - ε` for a symbolic infinitesimal `ε > 0` smaller than every
/// positive rational. No `Nan` variant is carried: unlike a general
/// extended-rational type, nothing in this crate ever divides by a
/// value that invariant 1 (no zero coefficients) hasn't already ruled
/// out, so there is no indeterminate form to represent.
#[derive(Debug, Clone, IsVariant, Serialize, Deserialize)]
pub enum ExtendedRational<T: Clone + Integer> {
    NegInfinity,
    Finite(Ratio<T>),
    FiniteStrict(Ratio<T>),
    Infinity,
}

impl<T> ExtendedRational<T>
where
    T: Clone + Integer,
{
    pub fn finite(value: Ratio<T>) -> Self {
        Self::Finite(value)
    }

    pub fn finite_strict(value: Ratio<T>) -> Self {
        Self::FiniteStrict(value)
    }

    pub const fn infinity() -> Self {
        Self::Infinity
    }

    pub const fn neg_infinity() -> Self {
        Self::NegInfinity
    }

    /// The underlying rational witness, for both `Finite` and
    /// `FiniteStrict` values; `None` at either infinity.
    pub fn value(&self) -> Option<&Ratio<T>> {
        match self {
            Self::Finite(r) | Self::FiniteStrict(r) => Some(r),
            Self::NegInfinity | Self::Infinity => None,
        }
    }

    pub fn into_value(self) -> Option<Ratio<T>> {
        match self {
            Self::Finite(r) | Self::FiniteStrict(r) => Some(r),
            Self::NegInfinity | Self::Infinity => None,
        }
    }
}

impl<T> Default for ExtendedRational<T>
where
    T: Clone + Integer,
{
    fn default() -> Self {
        Self::Finite(Ratio::zero())
    }
}

impl<T> From<Ratio<T>> for ExtendedRational<T>
where
    T: Clone + Integer,
{
    fn from(value: Ratio<T>) -> Self {
        Self::Finite(value)
    }
}

impl<T> PartialEq for ExtendedRational<T>
where
    T: Clone + Integer,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Infinity, Self::Infinity) | (Self::NegInfinity, Self::NegInfinity) => true,
            (Self::Finite(lhs), Self::Finite(rhs)) => lhs == rhs,
            (Self::FiniteStrict(lhs), Self::FiniteStrict(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl<T> PartialOrd for ExtendedRational<T>
where
    T: Clone + Integer,
{
    /// `FiniteStrict(r)` compares as "just below `r`": strictly less
    /// than `Finite(r)` and strictly less than `FiniteStrict(s)` for
    /// any `s` with `r == s`... resolved below by falling back to
    /// `r`'s ordering and only distinguishing the tie.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        use ExtendedRational::*;
        Some(match (self, other) {
            (NegInfinity, NegInfinity) | (Infinity, Infinity) => Ordering::Equal,
            (NegInfinity, _) | (_, Infinity) => Ordering::Less,
            (Infinity, _) | (_, NegInfinity) => Ordering::Greater,
            (Finite(lhs), Finite(rhs)) => lhs.cmp(rhs),
            (FiniteStrict(lhs), FiniteStrict(rhs)) => lhs.cmp(rhs),
            (FiniteStrict(lhs), Finite(rhs)) => match lhs.cmp(rhs) {
                Ordering::Equal => Ordering::Less,
                ord => ord,
            },
            (Finite(lhs), FiniteStrict(rhs)) => match lhs.cmp(rhs) {
                Ordering::Equal => Ordering::Greater,
                ord => ord,
            },
        })
    }
}

impl<T> fmt::Display for ExtendedRational<T>
where
    T: Clone + Integer + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(r) => write!(f, "{r}"),
            Self::FiniteStrict(r) => write!(f, "{r} - \u{3b5}"),
            Self::Infinity => write!(f, "+\u{221e}"),
            Self::NegInfinity => write!(f, "-\u{221e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;
    use pretty_assertions::assert_eq;

    use super::*;

    fn r(n: i64, d: i64) -> Ratio<BigInt> {
        Ratio::new(BigInt::from(n), BigInt::from(d))
    }

    type Ext = ExtendedRational<BigInt>;

    #[test]
    fn infinities_order_around_every_finite_value() {
        assert!(Ext::neg_infinity() < Ext::finite(r(-1_000_000, 1)));
        assert!(Ext::infinity() > Ext::finite(r(1_000_000, 1)));
        assert!(Ext::neg_infinity() < Ext::infinity());
    }

    #[test]
    fn finite_strict_sits_just_below_the_same_finite_value() {
        let strict = Ext::finite_strict(r(4, 1));
        let exact = Ext::finite(r(4, 1));
        assert!(strict < exact);
        assert!(Ext::finite(r(3, 1)) < strict);
        assert!(strict < Ext::finite(r(5, 1)));
    }

    #[test]
    fn finite_equality_ignores_strictness_mismatch() {
        assert_ne!(Ext::finite(r(2, 1)), Ext::finite_strict(r(2, 1)));
        assert_eq!(Ext::finite_strict(r(1, 2)), Ext::finite_strict(r(1, 2)));
    }

    #[test]
    fn value_unwraps_both_finite_variants() {
        assert_eq!(Ext::finite(r(3, 4)).value(), Some(&r(3, 4)));
        assert_eq!(Ext::finite_strict(r(3, 4)).value(), Some(&r(3, 4)));
        assert_eq!(Ext::infinity().value(), None);
        assert_eq!(Ext::neg_infinity().value(), None);
    }

    #[test]
    fn display_matches_teacher_style() {
        assert_eq!(Ext::finite(r(7, 2)).to_string(), "7/2");
        assert_eq!(Ext::infinity().to_string(), "+\u{221e}");
        assert_eq!(Ext::neg_infinity().to_string(), "-\u{221e}");
    }
}
