use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::profile::{CoverageType, Occupation};

/// Restricts who a carrier will quote. `MilitaryOnly` carriers are filtered
/// out for every occupation except `Military`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    Open,
    MilitaryOnly,
}

/// Annual base premium in dollars per coverage tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseRates {
    pub liability: f64,
    pub collision: f64,
    pub comprehensive: f64,
    pub full: f64,
}

impl BaseRates {
    pub fn for_coverage(&self, coverage: CoverageType) -> f64 {
        match coverage {
            CoverageType::Liability => self.liability,
            CoverageType::Collision => self.collision,
            CoverageType::Comprehensive => self.comprehensive,
            CoverageType::Full => self.full,
        }
    }
}

/// Named discount percentages, expressed as fractions of the raw premium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountTable {
    pub homeowner: f64,
    pub married: f64,
    pub clean_record: f64,
    pub good_credit: f64,
    pub low_mileage: f64,
    pub anti_theft: f64,
    pub safety_features: f64,
    pub military: f64,
    pub garaged: f64,
    pub continuous_coverage: f64,
    pub paid_in_full: f64,
    pub pleasure_use: f64,
    pub student: f64,
    pub mature_driver: f64,
}

/// Named surcharge percentages, expressed as fractions of the raw premium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurchargeTable {
    pub young_driver: f64,
    pub senior_driver: f64,
    pub poor_credit: f64,
    pub no_prior_insurance: f64,
    pub inexperienced: f64,
    pub minor_violation: f64,
    pub major_violation: f64,
    pub at_fault_accident: f64,
    pub dui: f64,
    pub high_mileage: f64,
    pub business_use: f64,
}

/// One carrier's complete rating configuration. Defined at process start and
/// never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierConfig {
    pub id: String,
    pub name: String,
    pub eligibility: Eligibility,
    pub avg_rating: f32,
    pub base_rates: BaseRates,
    pub discounts: DiscountTable,
    pub surcharges: SurchargeTable,
    /// Sparse; states missing from the map rate at 1.0.
    pub state_multipliers: BTreeMap<String, f64>,
    pub available: bool,
}

impl CarrierConfig {
    /// Multiplier for a state code, case-insensitive and whitespace-tolerant.
    pub fn state_multiplier(&self, state: &str) -> f64 {
        let code = state.trim().to_ascii_uppercase();
        self.state_multipliers.get(&code).copied().unwrap_or(1.0)
    }
}

/// Immutable registry of carrier configurations, constructed once and
/// injected into the rating engine.
#[derive(Debug, Clone)]
pub struct CarrierCatalog {
    carriers: Vec<CarrierConfig>,
}

impl CarrierCatalog {
    pub fn new(carriers: Vec<CarrierConfig>) -> Self {
        Self { carriers }
    }

    pub fn carriers(&self) -> &[CarrierConfig] {
        &self.carriers
    }

    /// Carriers a requester with the given occupation may be quoted by.
    /// Unavailable carriers are always excluded; an empty result is valid and
    /// the caller must handle zero quotes.
    pub fn eligible_for(&self, occupation: Occupation) -> Vec<&CarrierConfig> {
        self.carriers
            .iter()
            .filter(|carrier| carrier.available)
            .filter(|carrier| match carrier.eligibility {
                Eligibility::Open => true,
                Eligibility::MilitaryOnly => occupation == Occupation::Military,
            })
            .collect()
    }

    /// The production catalog: ten carriers, one military-only, one
    /// suspended from quoting.
    pub fn standard() -> Self {
        Self::new(vec![
            CarrierConfig {
                id: "summit-mutual".to_string(),
                name: "Summit Mutual".to_string(),
                eligibility: Eligibility::Open,
                avg_rating: 4.6,
                base_rates: BaseRates {
                    liability: 620.0,
                    collision: 850.0,
                    comprehensive: 920.0,
                    full: 1390.0,
                },
                discounts: DiscountTable {
                    homeowner: 0.10,
                    married: 0.05,
                    clean_record: 0.15,
                    good_credit: 0.12,
                    low_mileage: 0.08,
                    anti_theft: 0.04,
                    safety_features: 0.05,
                    military: 0.05,
                    garaged: 0.03,
                    continuous_coverage: 0.07,
                    paid_in_full: 0.03,
                    pleasure_use: 0.04,
                    student: 0.05,
                    mature_driver: 0.05,
                },
                surcharges: SurchargeTable {
                    young_driver: 0.35,
                    senior_driver: 0.12,
                    poor_credit: 0.22,
                    no_prior_insurance: 0.15,
                    inexperienced: 0.10,
                    minor_violation: 0.12,
                    major_violation: 0.38,
                    at_fault_accident: 0.28,
                    dui: 0.70,
                    high_mileage: 0.08,
                    business_use: 0.10,
                },
                state_multipliers: states(&[
                    ("CA", 1.18),
                    ("NY", 1.22),
                    ("FL", 1.25),
                    ("TX", 1.08),
                    ("MI", 1.40),
                ]),
                available: true,
            },
            CarrierConfig {
                id: "pacific-shield".to_string(),
                name: "Pacific Shield".to_string(),
                eligibility: Eligibility::Open,
                avg_rating: 4.3,
                base_rates: BaseRates {
                    liability: 580.0,
                    collision: 800.0,
                    comprehensive: 880.0,
                    full: 1310.0,
                },
                discounts: DiscountTable {
                    homeowner: 0.08,
                    married: 0.06,
                    clean_record: 0.14,
                    good_credit: 0.10,
                    low_mileage: 0.10,
                    anti_theft: 0.05,
                    safety_features: 0.06,
                    military: 0.06,
                    garaged: 0.04,
                    continuous_coverage: 0.06,
                    paid_in_full: 0.04,
                    pleasure_use: 0.05,
                    student: 0.04,
                    mature_driver: 0.04,
                },
                surcharges: SurchargeTable {
                    young_driver: 0.32,
                    senior_driver: 0.14,
                    poor_credit: 0.20,
                    no_prior_insurance: 0.14,
                    inexperienced: 0.09,
                    minor_violation: 0.14,
                    major_violation: 0.36,
                    at_fault_accident: 0.26,
                    dui: 0.65,
                    high_mileage: 0.10,
                    business_use: 0.09,
                },
                state_multipliers: states(&[
                    ("CA", 0.95),
                    ("OR", 0.90),
                    ("WA", 0.92),
                    ("NY", 1.30),
                    ("FL", 1.32),
                ]),
                available: true,
            },
            CarrierConfig {
                id: "beacon-national".to_string(),
                name: "Beacon National".to_string(),
                eligibility: Eligibility::Open,
                avg_rating: 4.1,
                base_rates: BaseRates {
                    liability: 640.0,
                    collision: 880.0,
                    comprehensive: 950.0,
                    full: 1450.0,
                },
                discounts: DiscountTable {
                    homeowner: 0.12,
                    married: 0.04,
                    clean_record: 0.16,
                    good_credit: 0.14,
                    low_mileage: 0.07,
                    anti_theft: 0.03,
                    safety_features: 0.04,
                    military: 0.05,
                    garaged: 0.02,
                    continuous_coverage: 0.08,
                    paid_in_full: 0.02,
                    pleasure_use: 0.03,
                    student: 0.06,
                    mature_driver: 0.06,
                },
                surcharges: SurchargeTable {
                    young_driver: 0.40,
                    senior_driver: 0.10,
                    poor_credit: 0.25,
                    no_prior_insurance: 0.18,
                    inexperienced: 0.12,
                    minor_violation: 0.10,
                    major_violation: 0.42,
                    at_fault_accident: 0.30,
                    dui: 0.80,
                    high_mileage: 0.07,
                    business_use: 0.12,
                },
                state_multipliers: states(&[
                    ("NY", 1.12),
                    ("NJ", 1.18),
                    ("PA", 1.02),
                    ("FL", 1.20),
                ]),
                available: true,
            },
            CarrierConfig {
                id: "ironhorse-auto".to_string(),
                name: "Ironhorse Auto".to_string(),
                eligibility: Eligibility::Open,
                avg_rating: 3.8,
                base_rates: BaseRates {
                    liability: 540.0,
                    collision: 760.0,
                    comprehensive: 830.0,
                    full: 1240.0,
                },
                discounts: DiscountTable {
                    homeowner: 0.07,
                    married: 0.05,
                    clean_record: 0.12,
                    good_credit: 0.09,
                    low_mileage: 0.06,
                    anti_theft: 0.04,
                    safety_features: 0.04,
                    military: 0.04,
                    garaged: 0.03,
                    continuous_coverage: 0.05,
                    paid_in_full: 0.03,
                    pleasure_use: 0.04,
                    student: 0.03,
                    mature_driver: 0.03,
                },
                surcharges: SurchargeTable {
                    young_driver: 0.28,
                    senior_driver: 0.15,
                    poor_credit: 0.18,
                    no_prior_insurance: 0.12,
                    inexperienced: 0.08,
                    minor_violation: 0.15,
                    major_violation: 0.34,
                    at_fault_accident: 0.24,
                    dui: 0.60,
                    high_mileage: 0.12,
                    business_use: 0.08,
                },
                state_multipliers: states(&[
                    ("TX", 0.92),
                    ("OK", 0.88),
                    ("LA", 1.35),
                    ("MI", 1.48),
                ]),
                available: true,
            },
            CarrierConfig {
                id: "liberty-crest".to_string(),
                name: "Liberty Crest".to_string(),
                eligibility: Eligibility::Open,
                avg_rating: 4.4,
                base_rates: BaseRates {
                    liability: 660.0,
                    collision: 900.0,
                    comprehensive: 980.0,
                    full: 1490.0,
                },
                discounts: DiscountTable {
                    homeowner: 0.11,
                    married: 0.06,
                    clean_record: 0.17,
                    good_credit: 0.13,
                    low_mileage: 0.09,
                    anti_theft: 0.05,
                    safety_features: 0.06,
                    military: 0.06,
                    garaged: 0.04,
                    continuous_coverage: 0.09,
                    paid_in_full: 0.04,
                    pleasure_use: 0.05,
                    student: 0.05,
                    mature_driver: 0.06,
                },
                surcharges: SurchargeTable {
                    young_driver: 0.38,
                    senior_driver: 0.11,
                    poor_credit: 0.24,
                    no_prior_insurance: 0.16,
                    inexperienced: 0.11,
                    minor_violation: 0.11,
                    major_violation: 0.40,
                    at_fault_accident: 0.32,
                    dui: 0.75,
                    high_mileage: 0.09,
                    business_use: 0.11,
                },
                state_multipliers: states(&[
                    ("MA", 1.15),
                    ("CT", 1.12),
                    ("NY", 1.20),
                    ("NH", 0.90),
                ]),
                available: true,
            },
            CarrierConfig {
                id: "cascade-general".to_string(),
                name: "Cascade General".to_string(),
                eligibility: Eligibility::Open,
                avg_rating: 4.0,
                base_rates: BaseRates {
                    liability: 600.0,
                    collision: 820.0,
                    comprehensive: 890.0,
                    full: 1340.0,
                },
                discounts: DiscountTable {
                    homeowner: 0.09,
                    married: 0.05,
                    clean_record: 0.13,
                    good_credit: 0.11,
                    low_mileage: 0.09,
                    anti_theft: 0.04,
                    safety_features: 0.05,
                    military: 0.05,
                    garaged: 0.05,
                    continuous_coverage: 0.06,
                    paid_in_full: 0.03,
                    pleasure_use: 0.06,
                    student: 0.04,
                    mature_driver: 0.04,
                },
                surcharges: SurchargeTable {
                    young_driver: 0.30,
                    senior_driver: 0.13,
                    poor_credit: 0.19,
                    no_prior_insurance: 0.13,
                    inexperienced: 0.09,
                    minor_violation: 0.13,
                    major_violation: 0.35,
                    at_fault_accident: 0.25,
                    dui: 0.68,
                    high_mileage: 0.11,
                    business_use: 0.10,
                },
                state_multipliers: states(&[
                    ("WA", 0.88),
                    ("OR", 0.86),
                    ("ID", 0.82),
                    ("CA", 1.15),
                ]),
                available: true,
            },
            CarrierConfig {
                id: "armada-direct".to_string(),
                name: "Armada Direct".to_string(),
                eligibility: Eligibility::Open,
                avg_rating: 3.9,
                base_rates: BaseRates {
                    liability: 520.0,
                    collision: 740.0,
                    comprehensive: 810.0,
                    full: 1190.0,
                },
                discounts: DiscountTable {
                    homeowner: 0.06,
                    married: 0.04,
                    clean_record: 0.11,
                    good_credit: 0.08,
                    low_mileage: 0.07,
                    anti_theft: 0.03,
                    safety_features: 0.03,
                    military: 0.04,
                    garaged: 0.02,
                    continuous_coverage: 0.05,
                    paid_in_full: 0.02,
                    pleasure_use: 0.03,
                    student: 0.03,
                    mature_driver: 0.03,
                },
                surcharges: SurchargeTable {
                    young_driver: 0.26,
                    senior_driver: 0.16,
                    poor_credit: 0.17,
                    no_prior_insurance: 0.11,
                    inexperienced: 0.07,
                    minor_violation: 0.16,
                    major_violation: 0.33,
                    at_fault_accident: 0.22,
                    dui: 0.58,
                    high_mileage: 0.13,
                    business_use: 0.07,
                },
                state_multipliers: states(&[
                    ("FL", 1.28),
                    ("GA", 1.10),
                    ("NV", 1.18),
                    ("AZ", 1.05),
                ]),
                available: true,
            },
            CarrierConfig {
                id: "sentinel-military".to_string(),
                name: "Sentinel Military".to_string(),
                eligibility: Eligibility::MilitaryOnly,
                avg_rating: 4.8,
                base_rates: BaseRates {
                    liability: 480.0,
                    collision: 680.0,
                    comprehensive: 750.0,
                    full: 1100.0,
                },
                discounts: DiscountTable {
                    homeowner: 0.10,
                    married: 0.07,
                    clean_record: 0.18,
                    good_credit: 0.12,
                    low_mileage: 0.10,
                    anti_theft: 0.05,
                    safety_features: 0.07,
                    military: 0.15,
                    garaged: 0.04,
                    continuous_coverage: 0.10,
                    paid_in_full: 0.05,
                    pleasure_use: 0.05,
                    student: 0.06,
                    mature_driver: 0.07,
                },
                surcharges: SurchargeTable {
                    young_driver: 0.25,
                    senior_driver: 0.10,
                    poor_credit: 0.15,
                    no_prior_insurance: 0.10,
                    inexperienced: 0.08,
                    minor_violation: 0.10,
                    major_violation: 0.30,
                    at_fault_accident: 0.20,
                    dui: 0.50,
                    high_mileage: 0.05,
                    business_use: 0.08,
                },
                state_multipliers: states(&[
                    ("VA", 0.95),
                    ("NC", 0.92),
                    ("TX", 0.95),
                    ("CA", 1.05),
                ]),
                available: true,
            },
            CarrierConfig {
                id: "redwood-standard".to_string(),
                name: "Redwood Standard".to_string(),
                eligibility: Eligibility::Open,
                avg_rating: 3.6,
                base_rates: BaseRates {
                    liability: 570.0,
                    collision: 790.0,
                    comprehensive: 860.0,
                    full: 1280.0,
                },
                discounts: DiscountTable {
                    homeowner: 0.08,
                    married: 0.04,
                    clean_record: 0.12,
                    good_credit: 0.10,
                    low_mileage: 0.06,
                    anti_theft: 0.03,
                    safety_features: 0.04,
                    military: 0.04,
                    garaged: 0.03,
                    continuous_coverage: 0.05,
                    paid_in_full: 0.03,
                    pleasure_use: 0.04,
                    student: 0.04,
                    mature_driver: 0.04,
                },
                surcharges: SurchargeTable {
                    young_driver: 0.33,
                    senior_driver: 0.14,
                    poor_credit: 0.21,
                    no_prior_insurance: 0.14,
                    inexperienced: 0.10,
                    minor_violation: 0.12,
                    major_violation: 0.37,
                    at_fault_accident: 0.27,
                    dui: 0.66,
                    high_mileage: 0.10,
                    business_use: 0.09,
                },
                state_multipliers: states(&[("CA", 1.22), ("NV", 1.12), ("UT", 0.90)]),
                available: true,
            },
            CarrierConfig {
                id: "atlas-premier".to_string(),
                name: "Atlas Premier".to_string(),
                eligibility: Eligibility::Open,
                avg_rating: 4.2,
                base_rates: BaseRates {
                    liability: 700.0,
                    collision: 950.0,
                    comprehensive: 1030.0,
                    full: 1560.0,
                },
                discounts: DiscountTable {
                    homeowner: 0.12,
                    married: 0.06,
                    clean_record: 0.16,
                    good_credit: 0.14,
                    low_mileage: 0.08,
                    anti_theft: 0.05,
                    safety_features: 0.06,
                    military: 0.06,
                    garaged: 0.04,
                    continuous_coverage: 0.08,
                    paid_in_full: 0.04,
                    pleasure_use: 0.05,
                    student: 0.05,
                    mature_driver: 0.06,
                },
                surcharges: SurchargeTable {
                    young_driver: 0.36,
                    senior_driver: 0.12,
                    poor_credit: 0.23,
                    no_prior_insurance: 0.15,
                    inexperienced: 0.10,
                    minor_violation: 0.12,
                    major_violation: 0.39,
                    at_fault_accident: 0.29,
                    dui: 0.72,
                    high_mileage: 0.09,
                    business_use: 0.10,
                },
                state_multipliers: states(&[("NY", 1.25), ("CA", 1.28)]),
                // Suspended from quoting; retained so stored references resolve.
                available: false,
            },
        ])
    }
}

fn states(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(code, factor)| (code.to_string(), *factor))
        .collect()
}
