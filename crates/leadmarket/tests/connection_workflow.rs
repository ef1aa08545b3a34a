//! Integration specifications for the connection lifecycle and lead ledger,
//! driven end-to-end through the public service facade and HTTP router.

mod common {
    use std::collections::{BTreeSet, HashMap};
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Utc};

    use leadmarket::marketplace::{
        BuyerId, Connection, ConnectionEvent, ConnectionId, ContractTerms, CustomerContact,
        Lead, LeadCaps, LeadId, LeadSubmission, LeadType, MarketplaceRepository,
        MarketplaceService, NotificationPublisher, NotifyError, PaymentSchedule, ProviderId,
        RepositoryError,
    };

    pub(super) fn provider() -> ProviderId {
        ProviderId("prov-integration".to_string())
    }

    pub(super) fn buyer() -> BuyerId {
        BuyerId("agency-integration".to_string())
    }

    pub(super) fn terms(rate: u32, weekly_cap: Option<u32>) -> ContractTerms {
        ContractTerms {
            rate_per_lead: rate,
            payment_schedule: PaymentSchedule::PerLead,
            minimum_payout: None,
            lead_types: BTreeSet::from([LeadType::QuoteRequest]),
            exclusive: false,
            termination_notice_days: 7,
            caps: LeadCaps {
                weekly_limit: weekly_cap,
                monthly_limit: None,
                pause_when_reached: weekly_cap.is_some(),
            },
        }
    }

    pub(super) fn submission() -> LeadSubmission {
        LeadSubmission {
            customer: CustomerContact {
                name: "Casey Meadows".to_string(),
                phone: "515-555-0142".to_string(),
                email: None,
                state: "IA".to_string(),
            },
            vehicle: "2019 Subaru Outback".to_string(),
            quote_type: LeadType::QuoteRequest,
            selected_quote: None,
        }
    }

    pub(super) fn build_service() -> Arc<MarketplaceService<MemoryRepository, MemoryNotifier>> {
        Arc::new(MarketplaceService::new(
            Arc::new(MemoryRepository::default()),
            Arc::new(MemoryNotifier::default()),
        ))
    }

    #[derive(Default)]
    pub(super) struct MemoryRepository {
        connections: Mutex<HashMap<ConnectionId, Connection>>,
        leads: Mutex<Vec<Lead>>,
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

        fn fetch_connection(
            &self,
            id: &ConnectionId,
        ) -> Result<Option<Connection>, RepositoryError> {
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

    #[derive(Default)]
    pub(super) struct MemoryNotifier {
        events: Mutex<Vec<ConnectionEvent>>,
    }

    impl NotificationPublisher for MemoryNotifier {
        fn publish(&self, event: ConnectionEvent) -> Result<(), NotifyError> {
            self.events.lock().expect("notifier mutex poisoned").push(event);
            Ok(())
        }
    }
}

use chrono::{Duration, TimeZone, Utc};
use common::{build_service, buyer, provider, submission, terms};
use leadmarket::marketplace::{
    connection_router, CapScope, ConnectionStatus, MarketplaceError, Role,
};
use tower::ServiceExt;

#[test]
fn full_negotiation_and_ledger_flow() {
    let service = build_service();

    let connection = service
        .initiate(
            provider(),
            buyer(),
            Role::Provider,
            Some("we cover central Iowa".to_string()),
            None,
        )
        .expect("initiate");
    assert_eq!(connection.status, ConnectionStatus::PendingBuyerReview);

    service
        .set_terms(Role::Buyer, &connection.id, terms(30, Some(3)))
        .expect("buyer terms");
    let active = service
        .accept(Role::Provider, &connection.id)
        .expect("provider accepts");
    assert_eq!(active.status, ConnectionStatus::Active);
    assert!(active.accepted_at.is_some());

    let monday = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).single().expect("valid");
    for i in 0..3i64 {
        service
            .submit_lead_at(
                Role::Provider,
                &connection.id,
                submission(),
                monday + Duration::hours(i),
            )
            .expect("within cap");
    }

    match service.submit_lead_at(
        Role::Provider,
        &connection.id,
        submission(),
        monday + Duration::hours(5),
    ) {
        Err(MarketplaceError::CapReached(err)) => assert_eq!(err.scope, CapScope::Weekly),
        other => panic!("expected cap refusal, got {other:?}"),
    }

    let settled = service.get(&connection.id).expect("connection");
    assert_eq!(settled.total_leads, 3);
    assert_eq!(settled.total_paid, 90);

    let ended = service
        .terminate(Role::Buyer, &connection.id, Some("budget cut".to_string()))
        .expect("terminate");
    assert_eq!(ended.status, ConnectionStatus::Terminated);
    assert_eq!(ended.terminated_by, Some(Role::Buyer));

    // Totals survive termination; nothing is reversed.
    assert_eq!(ended.total_leads, 3);
    assert_eq!(ended.total_paid, 90);
}

#[tokio::test]
async fn http_surface_covers_the_whole_lifecycle() {
    let service = build_service();
    let router = connection_router(service);

    let post = |uri: String, payload: serde_json::Value| {
        axum::http::Request::post(uri)
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap()
    };

    let response = router
        .clone()
        .oneshot(post(
            "/api/v1/connections".to_string(),
            serde_json::json!({
                "provider": "prov-http",
                "buyer": "agency-http",
                "initiated_by": "buyer",
                "terms": serde_json::to_value(terms(20, None)).unwrap()
            }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let created: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(created["status"], "pending_provider_accept");
    let id = created["connection_id"].as_str().expect("id").to_string();

    let response = router
        .clone()
        .oneshot(post(
            format!("/api/v1/connections/{id}/accept"),
            serde_json::json!({ "actor": "provider" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let response = router
        .clone()
        .oneshot(post(
            format!("/api/v1/connections/{id}/leads"),
            serde_json::json!({
                "actor": "provider",
                "customer": {
                    "name": "Casey Meadows",
                    "phone": "515-555-0142",
                    "email": null,
                    "state": "IA"
                },
                "vehicle": "2019 Subaru Outback",
                "quote_type": "quote_request",
                "selected_quote": {
                    "carrier_name": "Pacific Shield",
                    "monthly_premium": 112,
                    "coverage": "full"
                }
            }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), axum::http::StatusCode::ACCEPTED);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let lead: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(lead["payout"], 20);
    assert_eq!(lead["status"], "pending");

    let response = router
        .oneshot(
            axum::http::Request::get(format!("/api/v1/connections/{id}"))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("router responds");
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let view: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(view["total_leads"], 1);
    assert_eq!(view["total_paid"], 20);
}
