use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{
    BuyerId, Connection, ConnectionId, ConnectionStatus, ContractTerms, Lead, LeadId,
    LeadStatus, LeadSubmission, ProviderId, Role,
};
use super::ledger::{self, CapReached};
use super::lifecycle::{ConnectionAction, InvalidTransition};
use super::repository::{
    ConnectionEvent, MarketplaceRepository, NotificationPublisher, NotifyError, RepositoryError,
};

/// Service composing the repository, the connection state machine, and the
/// lead ledger. Every read-modify-write on one connection is serialised
/// through a per-connection lock so transitions and the
/// cap-check-then-accrue sequence never interleave; connections remain
/// independent units.
pub struct MarketplaceService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    locks: Mutex<HashMap<ConnectionId, Arc<Mutex<()>>>>,
}

static CONNECTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_connection_id() -> ConnectionId {
    let id = CONNECTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ConnectionId(format!("conn-{id:06}"))
}

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

impl<R, N> MarketplaceService<R, N>
where
    R: MarketplaceRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn connection_lock(&self, id: &ConnectionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock registry mutex poisoned");
        locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Open a connection request between a provider and a buyer. A
    /// provider-initiated request awaits buyer terms; a buyer-initiated
    /// request carries terms up front and awaits provider acceptance. At
    /// most one non-terminal connection may exist per pair.
    pub fn initiate(
        &self,
        provider: ProviderId,
        buyer: BuyerId,
        initiated_by: Role,
        message: Option<String>,
        terms: Option<ContractTerms>,
    ) -> Result<Connection, MarketplaceError> {
        if self
            .repository
            .open_connection_for_pair(&provider, &buyer)?
            .is_some()
        {
            return Err(MarketplaceError::PairAlreadyConnected);
        }

        let (status, terms) = match initiated_by {
            Role::Provider => (ConnectionStatus::PendingBuyerReview, None),
            Role::Buyer => (
                ConnectionStatus::PendingProviderAccept,
                Some(terms.ok_or(MarketplaceError::MissingTerms)?),
            ),
            Role::Admin => {
                return Err(MarketplaceError::Forbidden {
                    role: initiated_by,
                    action: ConnectionAction::Initiate,
                })
            }
        };

        let connection = Connection {
            id: next_connection_id(),
            provider,
            buyer,
            initiated_by,
            message,
            status,
            terms,
            total_leads: 0,
            total_paid: 0,
            created_at: Utc::now(),
            accepted_at: None,
            terms_updated_at: None,
            terminated_at: None,
            terminated_by: None,
            termination_reason: None,
        };

        let stored = self.repository.insert_connection(connection)?;
        Ok(stored)
    }

    /// Buyer answers a pending request with concrete terms.
    pub fn set_terms(
        &self,
        actor: Role,
        id: &ConnectionId,
        terms: ContractTerms,
    ) -> Result<Connection, MarketplaceError> {
        require(actor, Role::Buyer, ConnectionAction::SetTerms)?;
        let lock = self.connection_lock(id);
        let _guard = lock.lock().expect("connection mutex poisoned");

        let mut connection = self.fetch(id)?;
        connection.set_terms(terms, Utc::now())?;
        self.repository.update_connection(connection.clone())?;

        self.notifier.publish(ConnectionEvent {
            template: "terms_proposed".to_string(),
            connection_id: connection.id.clone(),
            detail: "the buyer proposed contract terms".to_string(),
        })?;

        Ok(connection)
    }

    /// Buyer turns a pending request down.
    pub fn reject(&self, actor: Role, id: &ConnectionId) -> Result<Connection, MarketplaceError> {
        require(actor, Role::Buyer, ConnectionAction::Reject)?;
        let lock = self.connection_lock(id);
        let _guard = lock.lock().expect("connection mutex poisoned");

        let mut connection = self.fetch(id)?;
        connection.reject()?;
        self.repository.update_connection(connection.clone())?;
        Ok(connection)
    }

    /// Provider accepts offered terms, activating the relationship.
    pub fn accept(&self, actor: Role, id: &ConnectionId) -> Result<Connection, MarketplaceError> {
        require(actor, Role::Provider, ConnectionAction::Accept)?;
        let lock = self.connection_lock(id);
        let _guard = lock.lock().expect("connection mutex poisoned");

        let mut connection = self.fetch(id)?;
        connection.accept(Utc::now())?;
        self.warn_on_exclusivity_conflict(&connection)?;
        self.repository.update_connection(connection.clone())?;

        self.notifier.publish(ConnectionEvent {
            template: "connection_accepted".to_string(),
            connection_id: connection.id.clone(),
            detail: "the provider accepted the contract terms".to_string(),
        })?;

        info!(connection = %connection.id.0, "connection activated");
        Ok(connection)
    }

    /// Provider walks away from offered terms.
    pub fn decline(&self, actor: Role, id: &ConnectionId) -> Result<Connection, MarketplaceError> {
        require(actor, Role::Provider, ConnectionAction::Decline)?;
        let lock = self.connection_lock(id);
        let _guard = lock.lock().expect("connection mutex poisoned");

        let mut connection = self.fetch(id)?;
        connection.decline()?;
        self.repository.update_connection(connection.clone())?;
        Ok(connection)
    }

    /// Buyer revises the terms of an active connection. Future submissions
    /// pay the new rate; accrued payouts are untouched.
    pub fn update_terms(
        &self,
        actor: Role,
        id: &ConnectionId,
        terms: ContractTerms,
    ) -> Result<Connection, MarketplaceError> {
        require(actor, Role::Buyer, ConnectionAction::UpdateTerms)?;
        let lock = self.connection_lock(id);
        let _guard = lock.lock().expect("connection mutex poisoned");

        let mut connection = self.fetch(id)?;
        connection.update_terms(terms, Utc::now())?;
        self.repository.update_connection(connection.clone())?;
        Ok(connection)
    }

    /// Either party ends an active relationship.
    pub fn terminate(
        &self,
        actor: Role,
        id: &ConnectionId,
        reason: Option<String>,
    ) -> Result<Connection, MarketplaceError> {
        let lock = self.connection_lock(id);
        let _guard = lock.lock().expect("connection mutex poisoned");

        let mut connection = self.fetch(id)?;
        connection.terminate(actor, reason, Utc::now())?;
        self.repository.update_connection(connection.clone())?;

        self.notifier.publish(ConnectionEvent {
            template: "connection_terminated".to_string(),
            connection_id: connection.id.clone(),
            detail: format!("terminated by the {}", actor.label()),
        })?;

        info!(connection = %connection.id.0, by = actor.label(), "connection terminated");
        Ok(connection)
    }

    /// Submit a lead under an active connection, using the current wall
    /// clock for the cap windows.
    pub fn submit_lead(
        &self,
        actor: Role,
        id: &ConnectionId,
        submission: LeadSubmission,
    ) -> Result<Lead, MarketplaceError> {
        self.submit_lead_at(actor, id, submission, Utc::now())
    }

    /// Clock-injected variant of [`Self::submit_lead`].
    ///
    /// The payout is fixed from the connection's current rate at submission
    /// time and the connection's totals accrue immediately, independent of
    /// the lead's eventual disposition. Later rejection does not reverse the
    /// accrual.
    pub fn submit_lead_at(
        &self,
        actor: Role,
        id: &ConnectionId,
        submission: LeadSubmission,
        now: DateTime<Utc>,
    ) -> Result<Lead, MarketplaceError> {
        require(actor, Role::Provider, ConnectionAction::SubmitLead)?;
        let lock = self.connection_lock(id);
        let _guard = lock.lock().expect("connection mutex poisoned");

        let mut connection = self.fetch(id)?;
        if connection.status != ConnectionStatus::Active {
            return Err(InvalidTransition {
                action: ConnectionAction::SubmitLead,
                status: connection.status,
            }
            .into());
        }
        let terms = connection
            .terms
            .clone()
            .ok_or(MarketplaceError::MissingTerms)?;

        let submitted = self.repository.lead_times_for_connection(&connection.id)?;
        ledger::check_caps(&terms.caps, &submitted, now)?;

        let payout = terms.rate_per_lead;
        let lead = Lead {
            id: next_lead_id(),
            connection: connection.id.clone(),
            provider: connection.provider.clone(),
            buyer: connection.buyer.clone(),
            customer: submission.customer,
            vehicle: submission.vehicle,
            quote_type: submission.quote_type,
            status: LeadStatus::Pending,
            payout,
            selected_quote: submission.selected_quote,
            submitted_at: now,
        };

        let stored = self.repository.insert_lead(lead)?;
        connection.total_leads += 1;
        connection.total_paid += payout as u64;
        self.repository.update_connection(connection.clone())?;

        self.notifier.publish(ConnectionEvent {
            template: "lead_submitted".to_string(),
            connection_id: connection.id.clone(),
            detail: format!("lead {} accrued a {payout} dollar payout", stored.id.0),
        })?;

        Ok(stored)
    }

    /// Fetch a connection for API responses.
    pub fn get(&self, id: &ConnectionId) -> Result<Connection, MarketplaceError> {
        self.fetch(id)
    }

    fn fetch(&self, id: &ConnectionId) -> Result<Connection, MarketplaceError> {
        Ok(self
            .repository
            .fetch_connection(id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    // Exclusivity is advisory: the flag is surfaced on terms, and an
    // activation that collides with another active exclusive connection for
    // the same provider is logged, not refused.
    fn warn_on_exclusivity_conflict(
        &self,
        connection: &Connection,
    ) -> Result<(), MarketplaceError> {
        let exclusive_here = connection
            .terms
            .as_ref()
            .map_or(false, |terms| terms.exclusive);

        let siblings = self
            .repository
            .connections_for_provider(&connection.provider)?;
        let conflicting = siblings.iter().any(|other| {
            other.id != connection.id
                && other.status == ConnectionStatus::Active
                && (exclusive_here
                    || other.terms.as_ref().map_or(false, |terms| terms.exclusive))
        });

        if conflicting {
            warn!(
                connection = %connection.id.0,
                provider = %connection.provider.0,
                "activation conflicts with an exclusive connection held by this provider"
            );
        }

        Ok(())
    }
}

fn require(actor: Role, allowed: Role, action: ConnectionAction) -> Result<(), MarketplaceError> {
    if actor == allowed || actor == Role::Admin {
        Ok(())
    } else {
        Err(MarketplaceError::Forbidden { role: actor, action })
    }
}

/// Error raised by the marketplace service.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    #[error(transparent)]
    CapReached(#[from] CapReached),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotifyError),
    #[error("a {} may not {} this connection", .role.label(), .action.label())]
    Forbidden { role: Role, action: ConnectionAction },
    #[error("an open connection already exists between this provider and buyer")]
    PairAlreadyConnected,
    #[error("connection has no negotiated terms")]
    MissingTerms,
}
