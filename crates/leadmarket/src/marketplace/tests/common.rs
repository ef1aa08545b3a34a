use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::marketplace::domain::{
    BuyerId, Connection, ConnectionId, ContractTerms, CustomerContact, Lead, LeadCaps, LeadId,
    LeadSubmission, LeadType, PaymentSchedule, ProviderId, Role,
};
use crate::marketplace::repository::{
    ConnectionEvent, MarketplaceRepository, NotificationPublisher, NotifyError, RepositoryError,
};
use crate::marketplace::service::MarketplaceService;

pub(super) fn provider() -> ProviderId {
    ProviderId("prov-001".to_string())
}

pub(super) fn buyer() -> BuyerId {
    BuyerId("agency-001".to_string())
}

pub(super) fn terms() -> ContractTerms {
    ContractTerms {
        rate_per_lead: 25,
        payment_schedule: PaymentSchedule::Weekly,
        minimum_payout: Some(100),
        lead_types: BTreeSet::from([LeadType::ImmediateCall, LeadType::QuoteRequest]),
        exclusive: false,
        termination_notice_days: 14,
        caps: LeadCaps::default(),
    }
}

pub(super) fn capped_terms(weekly: u32) -> ContractTerms {
    let mut terms = terms();
    terms.caps = LeadCaps {
        weekly_limit: Some(weekly),
        monthly_limit: None,
        pause_when_reached: true,
    };
    terms
}

pub(super) fn submission() -> LeadSubmission {
    LeadSubmission {
        customer: CustomerContact {
            name: "Jordan Ruiz".to_string(),
            phone: "515-555-0117".to_string(),
            email: Some("jordan.ruiz@example.com".to_string()),
            state: "IA".to_string(),
        },
        vehicle: "2021 Honda Accord".to_string(),
        quote_type: LeadType::QuoteRequest,
        selected_quote: None,
    }
}

/// Wednesday mid-week so weekly windows have room on either side.
pub(super) fn midweek() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 12, 15, 30, 0).single().expect("valid timestamp")
}

pub(super) fn build_service() -> (
    Arc<MarketplaceService<MemoryRepository, MemoryNotifier>>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = Arc::new(MarketplaceService::new(repository.clone(), notifier.clone()));
    (service, repository, notifier)
}

/// Drive a fresh connection to `Active` through the full negotiation.
pub(super) fn activate_connection(
    service: &MarketplaceService<MemoryRepository, MemoryNotifier>,
    terms: ContractTerms,
) -> ConnectionId {
    let connection = service
        .initiate(provider(), buyer(), Role::Provider, None, None)
        .expect("initiate");
    service
        .set_terms(Role::Buyer, &connection.id, terms)
        .expect("buyer sets terms");
    service
        .accept(Role::Provider, &connection.id)
        .expect("provider accepts");
    connection.id
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) connections: Arc<Mutex<HashMap<ConnectionId, Connection>>>,
    pub(super) leads: Arc<Mutex<Vec<Lead>>>,
}

impl MarketplaceRepository for MemoryRepository {
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

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<ConnectionEvent>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<ConnectionEvent> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifier {
    fn publish(&self, event: ConnectionEvent) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl MarketplaceRepository for UnavailableRepository {
    fn insert_connection(&self, _connection: Connection) -> Result<Connection, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_connection(&self, _connection: Connection) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_connection(&self, _id: &ConnectionId) -> Result<Option<Connection>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn open_connection_for_pair(
        &self,
        _provider: &ProviderId,
        _buyer: &BuyerId,
    ) -> Result<Option<Connection>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn connections_for_provider(
        &self,
        _provider: &ProviderId,
    ) -> Result<Vec<Connection>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_lead(&self, _lead: Lead) -> Result<Lead, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_lead(&self, _id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn lead_times_for_connection(
        &self,
        _id: &ConnectionId,
    ) -> Result<Vec<DateTime<Utc>>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
