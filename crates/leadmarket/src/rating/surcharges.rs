use super::carrier::SurchargeTable;
use super::profile::{CreditTier, DrivingHistory, PrimaryUse, RatingProfile};
use super::AppliedAdjustment;

pub(crate) const HIGH_MILEAGE_THRESHOLD: u32 = 15_000;
const YOUNG_DRIVER_MAX_AGE: u8 = 25;
const SENIOR_DRIVER_MIN_AGE: u8 = 70;
const INEXPERIENCED_MAX_YEARS: u8 = 3;

/// Additively accumulate every triggered surcharge. Surcharges are never
/// capped. The four driving-history surcharges are mutually exclusive; only
/// the category on the profile applies.
pub(crate) fn accumulate(
    profile: &RatingProfile,
    table: &SurchargeTable,
) -> (Vec<AppliedAdjustment>, f64) {
    let mut applied = Vec::new();
    let mut total = 0.0;

    let mut push = |label: &str, fraction: f64| {
        applied.push(AppliedAdjustment::new(label, fraction));
        total += fraction;
    };

    if profile.age < YOUNG_DRIVER_MAX_AGE {
        push("Young driver", table.young_driver);
    }
    if profile.age > SENIOR_DRIVER_MIN_AGE {
        push("Senior driver", table.senior_driver);
    }
    match profile.credit_tier {
        CreditTier::Poor => push("Poor credit", table.poor_credit),
        CreditTier::Fair => push("Fair credit", table.poor_credit / 2.0),
        CreditTier::Excellent | CreditTier::Good => {}
    }
    if !profile.prior_insurance {
        push("No prior insurance", table.no_prior_insurance);
    }
    if profile.years_licensed < INEXPERIENCED_MAX_YEARS {
        push("Newly licensed", table.inexperienced);
    }
    match profile.driving_history {
        DrivingHistory::Clean => {}
        DrivingHistory::MinorViolations => push("Minor violations", table.minor_violation),
        DrivingHistory::MajorViolations => push("Major violations", table.major_violation),
        DrivingHistory::Accidents => push("At-fault accident", table.at_fault_accident),
        DrivingHistory::Dui => push("DUI on record", table.dui),
    }
    if profile.annual_mileage > HIGH_MILEAGE_THRESHOLD {
        push("High annual mileage", table.high_mileage);
    }
    if profile.primary_use == PrimaryUse::Business {
        push("Business use", table.business_use);
    }

    (applied, total)
}
