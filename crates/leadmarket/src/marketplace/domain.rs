use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for provider accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub String);

/// Identifier wrapper for buyer (agency) accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuyerId(pub String);

/// Identifier wrapper for a provider-buyer connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub String);

/// Identifier wrapper for a submitted lead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// Capability-tagged identity for every marketplace operation. Passed
/// explicitly by callers; never inferred from ambient session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Provider,
    Buyer,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Provider => "provider",
            Role::Buyer => "buyer",
            Role::Admin => "admin",
        }
    }
}

/// How a lead reaches the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadType {
    ImmediateCall,
    QuoteRequest,
}

/// When accrued payouts are settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSchedule {
    PerLead,
    Weekly,
    Biweekly,
    Monthly,
}

/// Volume limits a buyer sets to bound obligations under a connection.
/// With `pause_when_reached` unset the limits are advisory only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadCaps {
    pub weekly_limit: Option<u32>,
    pub monthly_limit: Option<u32>,
    pub pause_when_reached: bool,
}

/// Contractual terms a buyer offers a provider. Dollar amounts are whole
/// dollars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub rate_per_lead: u32,
    pub payment_schedule: PaymentSchedule,
    pub minimum_payout: Option<u32>,
    pub lead_types: BTreeSet<LeadType>,
    pub exclusive: bool,
    pub termination_notice_days: u16,
    #[serde(default)]
    pub caps: LeadCaps,
}

/// Lifecycle states of a provider-buyer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    PendingBuyerReview,
    PendingProviderAccept,
    Active,
    DeclinedByProvider,
    RejectedByBuyer,
    Terminated,
}

impl ConnectionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ConnectionStatus::PendingBuyerReview => "pending_buyer_review",
            ConnectionStatus::PendingProviderAccept => "pending_provider_accept",
            ConnectionStatus::Active => "active",
            ConnectionStatus::DeclinedByProvider => "declined_by_provider",
            ConnectionStatus::RejectedByBuyer => "rejected_by_buyer",
            ConnectionStatus::Terminated => "terminated",
        }
    }

    /// Terminal states admit no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ConnectionStatus::DeclinedByProvider
                | ConnectionStatus::RejectedByBuyer
                | ConnectionStatus::Terminated
        )
    }
}

/// The contractual relationship between one provider and one buyer, with its
/// negotiated terms and running totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub provider: ProviderId,
    pub buyer: BuyerId,
    pub initiated_by: Role,
    pub message: Option<String>,
    pub status: ConnectionStatus,
    pub terms: Option<ContractTerms>,
    pub total_leads: u64,
    pub total_paid: u64,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub terms_updated_at: Option<DateTime<Utc>>,
    pub terminated_at: Option<DateTime<Utc>>,
    pub terminated_by: Option<Role>,
    pub termination_reason: Option<String>,
}

impl Connection {
    /// Sanitized representation for API responses.
    pub fn view(&self) -> ConnectionView {
        ConnectionView {
            connection_id: self.id.clone(),
            provider: self.provider.clone(),
            buyer: self.buyer.clone(),
            status: self.status.label(),
            terms: self.terms.clone(),
            total_leads: self.total_leads,
            total_paid: self.total_paid,
            accepted_at: self.accepted_at,
            terminated_at: self.terminated_at,
        }
    }
}

/// Customer contact captured on a lead submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub state: String,
}

/// Snapshot of the quote a customer selected, embedded on the lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub carrier_name: String,
    pub monthly_premium: u32,
    pub coverage: String,
}

/// Disposition of a submitted lead. Transitions past `Pending` belong to the
/// buyer's downstream process; payout bookkeeping happens at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Pending,
    Claimed,
    Converted,
    Rejected,
    Expired,
}

impl LeadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeadStatus::Pending => "pending",
            LeadStatus::Claimed => "claimed",
            LeadStatus::Converted => "converted",
            LeadStatus::Rejected => "rejected",
            LeadStatus::Expired => "expired",
        }
    }
}

/// A single customer referral submitted under an active connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub connection: ConnectionId,
    pub provider: ProviderId,
    pub buyer: BuyerId,
    pub customer: CustomerContact,
    pub vehicle: String,
    pub quote_type: LeadType,
    pub status: LeadStatus,
    /// Fixed from the connection's rate at submission time; never
    /// re-evaluated.
    pub payout: u32,
    pub selected_quote: Option<QuoteSnapshot>,
    pub submitted_at: DateTime<Utc>,
}

/// Inbound payload for a lead submission; the service stamps identity,
/// payout, and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub customer: CustomerContact,
    pub vehicle: String,
    pub quote_type: LeadType,
    pub selected_quote: Option<QuoteSnapshot>,
}

/// Sanitized connection state for display.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionView {
    pub connection_id: ConnectionId,
    pub provider: ProviderId,
    pub buyer: BuyerId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<ContractTerms>,
    pub total_leads: u64,
    pub total_paid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminated_at: Option<DateTime<Utc>>,
}
