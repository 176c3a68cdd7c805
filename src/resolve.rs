use num_traits::{Signed, Zero};

use crate::store::{RowId, RowStore};
use crate::variable::{VarId, VariableTable};

/// Eliminate `x` from `dst` by adding a multiple of `src` to it.
///
/// Both rows must carry a nonzero coefficient on `x`. The scale factor
/// `c = -dst[x] / src[x]` is chosen so the combined row's coefficient
/// on `x` is exactly zero; `same_sign` (whether the two original
/// coefficients shared a sign) is threaded through to
/// [`crate::row::Row::combined_rel`] so the resulting relation's
/// strictness follows the resolution rule in spec.md §4.1. Per §4.3,
/// `dst == RowId::OBJECTIVE` always resolves as `same_sign = false`
/// regardless of the actual signs — this is what makes the objective's
/// relation leak strictness pessimistically rather than relax it back.
///
/// Returns the variables newly introduced into `dst` by the merge, for
/// the caller to extend the row index with.
pub fn resolve(store: &mut RowStore, model: &VariableTable, dst: RowId, src: RowId, x: VarId) -> Vec<VarId> {
    let dst_coeff = store.row(dst).get_coefficient(x);
    let src_coeff = store.row(src).get_coefficient(x);
    debug_assert!(!dst_coeff.is_zero(), "resolve requires x present in dst");
    debug_assert!(!src_coeff.is_zero(), "resolve requires x present in src");

    let same_sign = dst != RowId::OBJECTIVE && dst_coeff.is_positive() == src_coeff.is_positive();
    let c = -&dst_coeff / &src_coeff;

    let newly_added = store.mul_add(dst, &c, src, same_sign, model);
    debug_assert!(
        store.row(dst).get_coefficient(x).is_zero(),
        "resolve must eliminate x from dst"
    );
    newly_added
}
