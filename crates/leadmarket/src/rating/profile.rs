use serde::{Deserialize, Serialize};

/// Full set of driver, vehicle, and coverage inputs to a quote computation.
///
/// The engine treats every field permissively: out-of-range or zero-like
/// values flow through the factor tables unchanged, and callers are expected
/// to supply sane defaults before invoking the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingProfile {
    pub age: u8,
    pub gender: Gender,
    pub marital_status: MaritalStatus,
    pub credit_tier: CreditTier,
    pub home_owner: bool,
    pub years_licensed: u8,
    pub driving_history: DrivingHistory,
    pub prior_insurance: bool,
    pub occupation: Occupation,
    pub annual_mileage: u32,
    /// Free text, typically "YYYY Make Model". Parsed by [`crate::rating::VehicleInfo`].
    pub vehicle: String,
    pub ownership: OwnershipType,
    pub primary_use: PrimaryUse,
    pub garage: GarageType,
    pub anti_theft: bool,
    pub safety_features: bool,
    pub coverage: CoverageType,
    pub deductible: u32,
    pub state: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Worst entry on the driver's record; the categories are mutually exclusive
/// for surcharge purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrivingHistory {
    Clean,
    MinorViolations,
    MajorViolations,
    Accidents,
    Dui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Employed,
    SelfEmployed,
    Military,
    Student,
    Retired,
    Unemployed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipType {
    Owned,
    Financed,
    Leased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryUse {
    Commute,
    Pleasure,
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarageType {
    Garage,
    Carport,
    Driveway,
    Street,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageType {
    Liability,
    Collision,
    Comprehensive,
    Full,
}

impl CoverageType {
    pub const fn label(self) -> &'static str {
        match self {
            CoverageType::Liability => "liability",
            CoverageType::Collision => "collision",
            CoverageType::Comprehensive => "comprehensive",
            CoverageType::Full => "full",
        }
    }
}
