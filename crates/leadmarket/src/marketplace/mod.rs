//! Provider-buyer connection lifecycle and lead ledger.
//!
//! A connection is the contractual relationship between one lead provider
//! and one buyer. Its state machine governs negotiation through activation
//! or a terminal refusal; once active, the lead ledger gates submissions on
//! the buyer's volume caps and accrues payouts at submission time.

pub mod domain;
pub mod ledger;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    BuyerId, Connection, ConnectionId, ConnectionStatus, ConnectionView, ContractTerms,
    CustomerContact, Lead, LeadCaps, LeadId, LeadStatus, LeadSubmission, LeadType,
    PaymentSchedule, ProviderId, QuoteSnapshot, Role,
};
pub use ledger::{CapReached, CapScope};
pub use lifecycle::{ConnectionAction, InvalidTransition};
pub use repository::{
    ConnectionEvent, MarketplaceRepository, NotificationPublisher, NotifyError, RepositoryError,
};
pub use router::connection_router;
pub use service::{MarketplaceError, MarketplaceService};
