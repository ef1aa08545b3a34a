//! Multi-carrier quote rating.
//!
//! A [`RatingProfile`] plus the injected [`CarrierCatalog`] produce a ranked
//! list of [`QuoteResult`]s. The computation is pure: no I/O, no shared
//! mutable state, and deterministic for a fixed calendar year.

mod carrier;
mod discounts;
mod engine;
mod factors;
mod profile;
pub mod router;
mod surcharges;
mod vehicle;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use carrier::{
    BaseRates, CarrierCatalog, CarrierConfig, DiscountTable, Eligibility, SurchargeTable,
};
pub use engine::{PremiumBreakdown, QuoteResult, RatingEngine};
pub use profile::{
    CoverageType, CreditTier, DrivingHistory, GarageType, Gender, MaritalStatus, Occupation,
    OwnershipType, PrimaryUse, RatingProfile,
};
pub use router::quote_router;
pub use vehicle::VehicleInfo;

/// One triggered discount or surcharge, kept on the quote for audit display.
/// `percent` is rounded to the nearest whole percentage point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedAdjustment {
    pub label: String,
    pub percent: f64,
}

impl AppliedAdjustment {
    pub(crate) fn new(label: &str, fraction: f64) -> Self {
        Self {
            label: label.to_string(),
            percent: (fraction * 100.0).round(),
        }
    }
}
