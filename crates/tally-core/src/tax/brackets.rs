//! Progressive bracket table and liability math

use super::round2;

/// Ordered (upper bound, marginal rate) pairs. Rates increase strictly with
/// income; the last bracket is unbounded.
pub const BRACKETS: [(f64, f64); 7] = [
    (11_600.0, 0.10),
    (47_150.0, 0.12),
    (100_525.0, 0.22),
    (191_950.0, 0.24),
    (243_725.0, 0.32),
    (609_350.0, 0.35),
    (f64::INFINITY, 0.37),
];

/// Compute liability for a taxable income via cumulative marginal math.
///
/// Each bracket taxes only the income that falls within it; the base from
/// lower brackets carries forward. Result is rounded to 2 decimal places.
pub fn liability_for(taxable: f64) -> f64 {
    let taxable = taxable.max(0.0);
    let mut liability = 0.0;
    let mut lower = 0.0;

    for (upper, rate) in BRACKETS {
        if taxable <= lower {
            break;
        }
        let in_bracket = taxable.min(upper) - lower;
        liability += in_bracket * rate;
        lower = upper;
    }

    round2(liability)
}
