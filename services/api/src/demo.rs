use crate::infra::{default_terms, InMemoryMarketplaceRepository, LoggingNotificationPublisher};
use clap::Args;
use leadmarket::error::AppError;
use leadmarket::marketplace::{
    BuyerId, CustomerContact, LeadSubmission, LeadType, MarketplaceError, MarketplaceService,
    ProviderId, QuoteSnapshot, Role,
};
use leadmarket::rating::{
    CarrierCatalog, CoverageType, CreditTier, DrivingHistory, GarageType, Gender, MaritalStatus,
    Occupation, OwnershipType, PrimaryUse, RatingEngine, RatingProfile,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Rate per lead the demo buyer offers, in dollars
    #[arg(long, default_value_t = 25)]
    pub(crate) rate: u32,
    /// Weekly lead cap the demo buyer enforces
    #[arg(long, default_value_t = 5)]
    pub(crate) weekly_cap: u32,
    /// Two-letter state code for the sample quote profile
    #[arg(long, default_value = "IA")]
    pub(crate) state: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = RatingEngine::new(CarrierCatalog::standard());
    let profile = sample_profile(&args.state);

    println!("== Quotes for a sample {} driver ==", args.state);
    let quotes = engine.quotes(&profile);
    for quote in &quotes {
        println!(
            "  {:<18} ${}/mo (${}/yr)  -{}% discounts, +{}% surcharges",
            quote.carrier_name,
            quote.monthly_premium,
            quote.annual_premium,
            quote.total_discount_percent,
            quote.total_surcharge_percent,
        );
    }

    let repository = Arc::new(InMemoryMarketplaceRepository::default());
    let notifier = Arc::new(LoggingNotificationPublisher::default());
    let marketplace = MarketplaceService::new(repository, notifier);

    println!("\n== Connection negotiation ==");
    let provider = ProviderId("demo-provider".to_string());
    let buyer = BuyerId("demo-agency".to_string());
    let connection = marketplace
        .initiate(
            provider,
            buyer,
            Role::Provider,
            Some("demo provider requesting a partnership".to_string()),
            None,
        )
        .map_err(AppError::Marketplace)?;
    println!("  provider initiated: {}", connection.status.label());

    let terms = default_terms(args.rate, Some(args.weekly_cap));
    marketplace
        .set_terms(Role::Buyer, &connection.id, terms)
        .map_err(AppError::Marketplace)?;
    println!("  buyer offered ${}/lead, weekly cap {}", args.rate, args.weekly_cap);

    let active = marketplace
        .accept(Role::Provider, &connection.id)
        .map_err(AppError::Marketplace)?;
    println!("  provider accepted: {}", active.status.label());

    println!("\n== Lead submissions ==");
    let best_quote = quotes.first();
    for n in 1.. {
        let submission = LeadSubmission {
            customer: CustomerContact {
                name: format!("Demo Customer {n}"),
                phone: "515-555-0100".to_string(),
                email: None,
                state: args.state.clone(),
            },
            vehicle: profile.vehicle.clone(),
            quote_type: LeadType::QuoteRequest,
            selected_quote: best_quote.map(|quote| QuoteSnapshot {
                carrier_name: quote.carrier_name.clone(),
                monthly_premium: quote.monthly_premium,
                coverage: profile.coverage.label().to_string(),
            }),
        };

        match marketplace.submit_lead(Role::Provider, &connection.id, submission) {
            Ok(lead) => println!("  lead {} accepted, payout ${}", lead.id.0, lead.payout),
            Err(MarketplaceError::CapReached(cap)) => {
                println!("  submission {n} refused: {cap}");
                break;
            }
            Err(other) => return Err(AppError::Marketplace(other)),
        }
    }

    let settled = marketplace
        .get(&connection.id)
        .map_err(AppError::Marketplace)?;
    println!(
        "\n== Totals ==\n  {} leads accrued ${} for the provider",
        settled.total_leads, settled.total_paid
    );

    Ok(())
}

fn sample_profile(state: &str) -> RatingProfile {
    RatingProfile {
        age: 29,
        gender: Gender::Female,
        marital_status: MaritalStatus::Single,
        credit_tier: CreditTier::Good,
        home_owner: false,
        years_licensed: 10,
        driving_history: DrivingHistory::Clean,
        prior_insurance: true,
        occupation: Occupation::Employed,
        annual_mileage: 11_000,
        vehicle: "2021 Honda Civic".to_string(),
        ownership: OwnershipType::Financed,
        primary_use: PrimaryUse::Commute,
        garage: GarageType::Driveway,
        anti_theft: true,
        safety_features: true,
        coverage: CoverageType::Full,
        deductible: 500,
        state: state.to_string(),
    }
}
