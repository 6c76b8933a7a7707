//! Tax estimation and optimization engine
//!
//! Two explicitly separate analysis variants:
//!
//! - [`optimize`]: progressive-bracket liability plus the five-opportunity
//!   optimization search ([`optimize::optimize`]).
//! - [`quick`]: flat-rate per-domain estimate with threshold-rule
//!   recommendations ([`quick::quick_estimate`]), used when a full
//!   optimization run is not requested.
//!
//! The two variants use different rate assumptions on purpose and are never
//! reconciled; callers pick one by name.

pub mod brackets;
pub mod optimize;
pub mod quick;

pub use brackets::liability_for;
pub use optimize::{detect_opportunities, optimize, Opportunity, OpportunityKind};
pub use quick::{quick_estimate, QuickEstimate, QuickScope};

/// Round to 2 decimal places using standard rounding.
pub(crate) fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.3449), 12.34);
        assert_eq!(round2(12.345), 12.35);
        assert_eq!(round2(0.0), 0.0);
    }
}
