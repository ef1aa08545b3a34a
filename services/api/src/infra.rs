use chrono::{DateTime, Utc};
use leadmarket::marketplace::{
    BuyerId, Connection, ConnectionEvent, ConnectionId, ContractTerms, Lead, LeadCaps, LeadId,
    LeadType, MarketplaceRepository, NotificationPublisher, NotifyError, PaymentSchedule,
    ProviderId, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryMarketplaceRepository {
    connections: Mutex<HashMap<ConnectionId, Connection>>,
    leads: Mutex<Vec<Lead>>,
}

impl MarketplaceRepository for InMemoryMarketplaceRepository {
    fn insert_connection(&self, connection: Connection) -> Result<Connection, RepositoryError> {
        let mut guard = self.connections.lock().expect("repository mutex poisoned");
        if guard.contains_key(&connection.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(connection.id.clone(), connection.clone());
        Ok(connection)
    }

    fn update_connection(&self, connection: Connection) -> Result<(), RepositoryError> {
        let mut guard = self.connections.lock().expect("repository mutex poisoned");
        if guard.contains_key(&connection.id) {
            guard.insert(connection.id.clone(), connection);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_connection(&self, id: &ConnectionId) -> Result<Option<Connection>, RepositoryError> {
        let guard = self.connections.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn open_connection_for_pair(
        &self,
        provider: &ProviderId,
        buyer: &BuyerId,
    ) -> Result<Option<Connection>, RepositoryError> {
        let guard = self.connections.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|connection| {
                connection.provider == *provider
                    && connection.buyer == *buyer
                    && !connection.status.is_terminal()
            })
            .cloned())
    }

    fn connections_for_provider(
        &self,
        provider: &ProviderId,
    ) -> Result<Vec<Connection>, RepositoryError> {
        let guard = self.connections.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|connection| connection.provider == *provider)
            .cloned()
            .collect())
    }

    fn insert_lead(&self, lead: Lead) -> Result<Lead, RepositoryError> {
        let mut guard = self.leads.lock().expect("lead mutex poisoned");
        if guard.iter().any(|existing| existing.id == lead.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(lead.clone());
        Ok(lead)
    }

    fn fetch_lead(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let guard = self.leads.lock().expect("lead mutex poisoned");
        Ok(guard.iter().find(|lead| lead.id == *id).cloned())
    }

    fn lead_times_for_connection(
        &self,
        id: &ConnectionId,
    ) -> Result<Vec<DateTime<Utc>>, RepositoryError> {
        let guard = self.leads.lock().expect("lead mutex poisoned");
        Ok(guard
            .iter()
            .filter(|lead| lead.connection == *id)
            .map(|lead| lead.submitted_at)
            .collect())
    }
}

/// Logs every marketplace event and keeps it for inspection. A production
/// deployment swaps this for an in-app inbox or e-mail adapter.
#[derive(Default)]
pub(crate) struct LoggingNotificationPublisher {
    events: Mutex<Vec<ConnectionEvent>>,
}

impl NotificationPublisher for LoggingNotificationPublisher {
    fn publish(&self, event: ConnectionEvent) -> Result<(), NotifyError> {
        info!(
            template = %event.template,
            connection = %event.connection_id.0,
            detail = %event.detail,
            "marketplace notification"
        );
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(crate) fn default_terms(rate_per_lead: u32, weekly_limit: Option<u32>) -> ContractTerms {
    ContractTerms {
        rate_per_lead,
        payment_schedule: PaymentSchedule::Weekly,
        minimum_payout: Some(100),
        lead_types: BTreeSet::from([LeadType::ImmediateCall, LeadType::QuoteRequest]),
        exclusive: false,
        termination_notice_days: 14,
        caps: LeadCaps {
            weekly_limit,
            monthly_limit: None,
            pause_when_reached: weekly_limit.is_some(),
        },
    }
}
