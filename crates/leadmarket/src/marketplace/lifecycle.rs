use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Connection, ConnectionStatus, ContractTerms, Role};

/// Operations a party can attempt against a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionAction {
    Initiate,
    SetTerms,
    Reject,
    Accept,
    Decline,
    UpdateTerms,
    Terminate,
    SubmitLead,
}

impl ConnectionAction {
    pub const fn label(self) -> &'static str {
        match self {
            ConnectionAction::Initiate => "initiate",
            ConnectionAction::SetTerms => "set terms on",
            ConnectionAction::Reject => "reject",
            ConnectionAction::Accept => "accept",
            ConnectionAction::Decline => "decline",
            ConnectionAction::UpdateTerms => "update terms on",
            ConnectionAction::Terminate => "terminate",
            ConnectionAction::SubmitLead => "submit a lead to",
        }
    }
}

/// An operation attempted from a state that does not allow it. Surfaced to
/// the caller, never silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {} a connection in the {} state", .action.label(), .status.label())]
pub struct InvalidTransition {
    pub action: ConnectionAction,
    pub status: ConnectionStatus,
}

impl Connection {
    fn guard(
        &self,
        action: ConnectionAction,
        expected: ConnectionStatus,
    ) -> Result<(), InvalidTransition> {
        if self.status == expected {
            Ok(())
        } else {
            Err(InvalidTransition {
                action,
                status: self.status,
            })
        }
    }

    /// Buyer answers a provider-initiated request with concrete terms.
    pub fn set_terms(
        &mut self,
        terms: ContractTerms,
        at: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        self.guard(ConnectionAction::SetTerms, ConnectionStatus::PendingBuyerReview)?;
        self.terms = Some(terms);
        self.terms_updated_at = Some(at);
        self.status = ConnectionStatus::PendingProviderAccept;
        Ok(())
    }

    /// Buyer turns the provider down. Terminal.
    pub fn reject(&mut self) -> Result<(), InvalidTransition> {
        self.guard(ConnectionAction::Reject, ConnectionStatus::PendingBuyerReview)?;
        self.status = ConnectionStatus::RejectedByBuyer;
        Ok(())
    }

    /// Provider accepts the offered terms. `accepted_at` is set exactly once,
    /// here.
    pub fn accept(&mut self, at: DateTime<Utc>) -> Result<(), InvalidTransition> {
        self.guard(ConnectionAction::Accept, ConnectionStatus::PendingProviderAccept)?;
        self.status = ConnectionStatus::Active;
        self.accepted_at = Some(at);
        Ok(())
    }

    /// Provider walks away from the offered terms. Terminal.
    pub fn decline(&mut self) -> Result<(), InvalidTransition> {
        self.guard(ConnectionAction::Decline, ConnectionStatus::PendingProviderAccept)?;
        self.status = ConnectionStatus::DeclinedByProvider;
        Ok(())
    }

    /// Buyer revises the terms of an active connection in place. Leads
    /// already submitted keep their payouts; only future submissions see the
    /// new rate.
    pub fn update_terms(
        &mut self,
        terms: ContractTerms,
        at: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        self.guard(ConnectionAction::UpdateTerms, ConnectionStatus::Active)?;
        self.terms = Some(terms);
        self.terms_updated_at = Some(at);
        Ok(())
    }

    /// Either party ends an active relationship. Terminal.
    pub fn terminate(
        &mut self,
        by: Role,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        self.guard(ConnectionAction::Terminate, ConnectionStatus::Active)?;
        self.status = ConnectionStatus::Terminated;
        self.terminated_at = Some(at);
        self.terminated_by = Some(by);
        self.termination_reason = reason;
        Ok(())
    }
}
