mod extended_rational;

use num_bigint::BigInt;
pub use extended_rational::ExtendedRational;

pub type BigExtendedRational = ExtendedRational<BigInt>;
pub type ExtendedRational32 = ExtendedRational<i32>;
pub type ExtendedRational64 = ExtendedRational<i64>;
