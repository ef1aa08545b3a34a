use std::collections::BTreeMap;

use crate::rating::{
    BaseRates, CarrierCatalog, CarrierConfig, CoverageType, CreditTier, DiscountTable,
    DrivingHistory, Eligibility, GarageType, Gender, MaritalStatus, Occupation, OwnershipType,
    PrimaryUse, RatingEngine, RatingProfile, SurchargeTable,
};

/// Calendar year pinned for deterministic vehicle-age math.
pub(super) const TEST_YEAR: i32 = 2025;

/// A thirty-five year old commuter in an eight-year-old unremarkable sedan:
/// every multiplicative factor lands on 1.0 and, against [`flat_carrier`],
/// no discount or surcharge value is configured.
pub(super) fn baseline_profile() -> RatingProfile {
    RatingProfile {
        age: 35,
        gender: Gender::Female,
        marital_status: MaritalStatus::Single,
        credit_tier: CreditTier::Fair,
        home_owner: false,
        years_licensed: 15,
        driving_history: DrivingHistory::Clean,
        prior_insurance: false,
        occupation: Occupation::Employed,
        annual_mileage: 12_000,
        vehicle: "2017 Chevrolet Malibu".to_string(),
        ownership: OwnershipType::Financed,
        primary_use: PrimaryUse::Commute,
        garage: GarageType::Street,
        anti_theft: false,
        safety_features: false,
        coverage: CoverageType::Liability,
        deductible: 250,
        state: "IA".to_string(),
    }
}

/// Single-carrier catalog with a flat $1000 liability base and every table
/// entry zeroed, so premiums can be asserted exactly.
pub(super) fn flat_catalog() -> CarrierCatalog {
    CarrierCatalog::new(vec![flat_carrier("flat", 1000.0)])
}

pub(super) fn flat_carrier(id: &str, liability: f64) -> CarrierConfig {
    CarrierConfig {
        id: id.to_string(),
        name: format!("Carrier {id}"),
        eligibility: Eligibility::Open,
        avg_rating: 4.0,
        base_rates: BaseRates {
            liability,
            collision: liability + 200.0,
            comprehensive: liability + 300.0,
            full: liability * 2.0,
        },
        discounts: zero_discounts(),
        surcharges: zero_surcharges(),
        state_multipliers: BTreeMap::new(),
        available: true,
    }
}

pub(super) fn zero_discounts() -> DiscountTable {
    DiscountTable {
        homeowner: 0.0,
        married: 0.0,
        clean_record: 0.0,
        good_credit: 0.0,
        low_mileage: 0.0,
        anti_theft: 0.0,
        safety_features: 0.0,
        military: 0.0,
        garaged: 0.0,
        continuous_coverage: 0.0,
        paid_in_full: 0.0,
        pleasure_use: 0.0,
        student: 0.0,
        mature_driver: 0.0,
    }
}

pub(super) fn zero_surcharges() -> SurchargeTable {
    SurchargeTable {
        young_driver: 0.0,
        senior_driver: 0.0,
        poor_credit: 0.0,
        no_prior_insurance: 0.0,
        inexperienced: 0.0,
        minor_violation: 0.0,
        major_violation: 0.0,
        at_fault_accident: 0.0,
        dui: 0.0,
        high_mileage: 0.0,
        business_use: 0.0,
    }
}

pub(super) fn standard_engine() -> RatingEngine {
    RatingEngine::new(CarrierCatalog::standard())
}

/// Profile that trips every discount condition at once: homeowner, married,
/// clean long-licensed record, excellent credit, low mileage, equipped and
/// garaged owned vehicle, military occupation, prior coverage, pleasure use,
/// mature-driver age band, and a $2000 deductible.
pub(super) fn maximally_discounted_profile() -> RatingProfile {
    RatingProfile {
        age: 55,
        gender: Gender::Male,
        marital_status: MaritalStatus::Married,
        credit_tier: CreditTier::Excellent,
        home_owner: true,
        years_licensed: 30,
        driving_history: DrivingHistory::Clean,
        prior_insurance: true,
        occupation: Occupation::Military,
        annual_mileage: 5_000,
        vehicle: "2017 Chevrolet Malibu".to_string(),
        ownership: OwnershipType::Owned,
        primary_use: PrimaryUse::Pleasure,
        garage: GarageType::Garage,
        anti_theft: true,
        safety_features: true,
        coverage: CoverageType::Full,
        deductible: 2000,
        state: "TX".to_string(),
    }
}
