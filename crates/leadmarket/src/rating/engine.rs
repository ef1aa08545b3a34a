use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::carrier::{CarrierCatalog, CarrierConfig};
use super::profile::RatingProfile;
use super::vehicle::VehicleInfo;
use super::{discounts, factors, surcharges, AppliedAdjustment};

/// No quote goes out below this annual premium.
pub(crate) const MINIMUM_ANNUAL_PREMIUM: f64 = 300.0;

/// Stateless rating computation over an injected carrier catalog.
pub struct RatingEngine {
    catalog: CarrierCatalog,
}

impl RatingEngine {
    pub fn new(catalog: CarrierCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CarrierCatalog {
        &self.catalog
    }

    /// Quotes for the current calendar year. Vehicle age is the only input
    /// the wall clock contributes.
    pub fn quotes(&self, profile: &RatingProfile) -> Vec<QuoteResult> {
        self.quotes_for_year(profile, Utc::now().year())
    }

    /// Deterministic variant with the calendar year pinned by the caller.
    pub fn quotes_for_year(&self, profile: &RatingProfile, current_year: i32) -> Vec<QuoteResult> {
        let vehicle = VehicleInfo::parse(&profile.vehicle, current_year);

        let mut quotes: Vec<QuoteResult> = self
            .catalog
            .eligible_for(profile.occupation)
            .into_iter()
            .map(|carrier| rate_carrier(carrier, profile, &vehicle, current_year))
            .collect();

        // Stable: ties keep catalog order.
        quotes.sort_by_key(|quote| quote.monthly_premium);
        quotes
    }
}

fn rate_carrier(
    carrier: &CarrierConfig,
    profile: &RatingProfile,
    vehicle: &VehicleInfo,
    current_year: i32,
) -> QuoteResult {
    let base_rate = carrier.base_rates.for_coverage(profile.coverage);
    let age_factor = factors::age_factor(profile.age);
    let vehicle_factor = factors::vehicle_factor(vehicle, current_year);
    let state_factor = carrier.state_multiplier(&profile.state);

    let (applied_discounts, discount_sum) = discounts::accumulate(profile, &carrier.discounts);
    let (applied_surcharges, surcharge_total) = surcharges::accumulate(profile, &carrier.surcharges);
    let total_discount = discount_sum.min(discounts::DISCOUNT_CAP);

    let raw_premium = base_rate * age_factor * vehicle_factor * state_factor;
    let discount_amount = raw_premium * total_discount;
    let surcharge_amount = raw_premium * surcharge_total;
    let annual = (raw_premium - discount_amount + surcharge_amount)
        .max(MINIMUM_ANNUAL_PREMIUM)
        .round();

    QuoteResult {
        carrier_id: carrier.id.clone(),
        carrier_name: carrier.name.clone(),
        carrier_rating: carrier.avg_rating,
        monthly_premium: (annual / 12.0).round() as u32,
        semiannual_premium: (annual / 2.0).round() as u32,
        annual_premium: annual as u32,
        discounts: applied_discounts,
        total_discount_percent: (total_discount * 100.0).round(),
        surcharges: applied_surcharges,
        total_surcharge_percent: (surcharge_total * 100.0).round(),
        breakdown: PremiumBreakdown {
            base_rate,
            age_factor,
            vehicle_factor,
            state_factor,
            raw_premium,
            discount_amount,
            surcharge_amount,
        },
    }
}

/// One carrier's priced quote, ready for display and downstream purchase
/// flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub carrier_id: String,
    pub carrier_name: String,
    pub carrier_rating: f32,
    pub monthly_premium: u32,
    pub semiannual_premium: u32,
    pub annual_premium: u32,
    pub discounts: Vec<AppliedAdjustment>,
    /// Aggregate discount percentage after the 50% cap.
    pub total_discount_percent: f64,
    pub surcharges: Vec<AppliedAdjustment>,
    /// Aggregate surcharge percentage; surcharges are uncapped.
    pub total_surcharge_percent: f64,
    pub breakdown: PremiumBreakdown,
}

/// The multiplicative factors and dollar adjustments behind a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumBreakdown {
    pub base_rate: f64,
    pub age_factor: f64,
    pub vehicle_factor: f64,
    pub state_factor: f64,
    pub raw_premium: f64,
    pub discount_amount: f64,
    pub surcharge_amount: f64,
}
