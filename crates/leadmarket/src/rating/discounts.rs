use super::carrier::DiscountTable;
use super::profile::{
    CreditTier, DrivingHistory, GarageType, MaritalStatus, Occupation, OwnershipType, PrimaryUse,
    RatingProfile,
};
use super::AppliedAdjustment;

/// Total discounts are capped at 50% of the raw premium, both when applied
/// and in the reported total.
pub(crate) const DISCOUNT_CAP: f64 = 0.50;

pub(crate) const LOW_MILEAGE_THRESHOLD: u32 = 7_500;
const CLEAN_RECORD_MIN_YEARS_LICENSED: u8 = 3;
const MATURE_DRIVER_RANGE: std::ops::RangeInclusive<u8> = 50..=70;

// Deductible tiers carry fixed extra discounts independent of the carrier
// table. A $250 deductible earns nothing.
const DEDUCTIBLE_500: f64 = 0.08;
const DEDUCTIBLE_1000: f64 = 0.15;
const DEDUCTIBLE_2000: f64 = 0.22;

/// Additively accumulate every triggered discount. Returns the audit trail
/// and the uncapped sum; the engine applies [`DISCOUNT_CAP`].
pub(crate) fn accumulate(
    profile: &RatingProfile,
    table: &DiscountTable,
) -> (Vec<AppliedAdjustment>, f64) {
    let mut applied = Vec::new();
    let mut total = 0.0;

    let mut push = |label: &str, fraction: f64| {
        applied.push(AppliedAdjustment::new(label, fraction));
        total += fraction;
    };

    if profile.home_owner {
        push("Homeowner", table.homeowner);
    }
    if profile.marital_status == MaritalStatus::Married {
        push("Married", table.married);
    }
    if profile.driving_history == DrivingHistory::Clean
        && profile.years_licensed >= CLEAN_RECORD_MIN_YEARS_LICENSED
    {
        push("Clean driving record", table.clean_record);
    }
    match profile.credit_tier {
        CreditTier::Excellent => push("Excellent credit", table.good_credit),
        CreditTier::Good => push("Good credit", table.good_credit / 2.0),
        CreditTier::Fair | CreditTier::Poor => {}
    }
    if profile.annual_mileage < LOW_MILEAGE_THRESHOLD {
        push("Low annual mileage", table.low_mileage);
    }
    if profile.anti_theft {
        push("Anti-theft system", table.anti_theft);
    }
    if profile.safety_features {
        push("Safety features", table.safety_features);
    }
    if profile.occupation == Occupation::Military {
        push("Military service", table.military);
    }
    if profile.garage == GarageType::Garage {
        push("Garaged vehicle", table.garaged);
    }
    if profile.prior_insurance {
        push("Continuous coverage", table.continuous_coverage);
    }
    if profile.ownership == OwnershipType::Owned {
        push("Vehicle paid in full", table.paid_in_full);
    }
    if profile.primary_use == PrimaryUse::Pleasure {
        push("Pleasure use", table.pleasure_use);
    }
    if profile.occupation == Occupation::Student {
        push("Student", table.student);
    }
    if MATURE_DRIVER_RANGE.contains(&profile.age) {
        push("Mature driver", table.mature_driver);
    }

    match profile.deductible {
        500 => push("$500 deductible", DEDUCTIBLE_500),
        1000 => push("$1000 deductible", DEDUCTIBLE_1000),
        2000 => push("$2000 deductible", DEDUCTIBLE_2000),
        _ => {}
    }

    (applied, total)
}
