use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{BuyerId, Connection, ConnectionId, Lead, LeadId, ProviderId};

/// Storage abstraction so the service can be exercised in isolation. A
/// durable implementation keys connections by (provider, buyer) and leads by
/// id with a connection reference.
pub trait MarketplaceRepository: Send + Sync {
    fn insert_connection(&self, connection: Connection) -> Result<Connection, RepositoryError>;
    fn update_connection(&self, connection: Connection) -> Result<(), RepositoryError>;
    fn fetch_connection(&self, id: &ConnectionId) -> Result<Option<Connection>, RepositoryError>;
    /// The most recent non-terminal connection for the pair, if any.
    fn open_connection_for_pair(
        &self,
        provider: &ProviderId,
        buyer: &BuyerId,
    ) -> Result<Option<Connection>, RepositoryError>;
    fn connections_for_provider(
        &self,
        provider: &ProviderId,
    ) -> Result<Vec<Connection>, RepositoryError>;
    fn insert_lead(&self, lead: Lead) -> Result<Lead, RepositoryError>;
    fn fetch_lead(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError>;
    /// Submission timestamps for cap-window evaluation.
    fn lead_times_for_connection(
        &self,
        id: &ConnectionId,
    ) -> Result<Vec<DateTime<Utc>>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Marketplace events pushed to outbound channels (in-app inbox, e-mail
/// adapters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEvent {
    pub template: String,
    pub connection_id: ConnectionId,
    pub detail: String,
}

/// Trait describing outbound notification hooks.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, event: ConnectionEvent) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
