use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    BuyerId, ConnectionId, ConnectionStatus, ContractTerms, LeadSubmission, ProviderId, Role,
};
use super::repository::{MarketplaceRepository, NotificationPublisher, RepositoryError};
use super::service::{MarketplaceError, MarketplaceService};

/// Router builder exposing the connection lifecycle and lead submission over
/// HTTP.
pub fn connection_router<R, N>(service: Arc<MarketplaceService<R, N>>) -> Router
where
    R: MarketplaceRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/connections", post(initiate_handler::<R, N>))
        .route(
            "/api/v1/connections/:connection_id",
            get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/connections/:connection_id/terms",
            put(terms_handler::<R, N>),
        )
        .route(
            "/api/v1/connections/:connection_id/accept",
            post(accept_handler::<R, N>),
        )
        .route(
            "/api/v1/connections/:connection_id/decline",
            post(decline_handler::<R, N>),
        )
        .route(
            "/api/v1/connections/:connection_id/reject",
            post(reject_handler::<R, N>),
        )
        .route(
            "/api/v1/connections/:connection_id/terminate",
            post(terminate_handler::<R, N>),
        )
        .route(
            "/api/v1/connections/:connection_id/leads",
            post(submit_lead_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct InitiateRequest {
    pub(crate) provider: String,
    pub(crate) buyer: String,
    pub(crate) initiated_by: Role,
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) terms: Option<ContractTerms>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActorRequest {
    pub(crate) actor: Role,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TermsRequest {
    pub(crate) actor: Role,
    pub(crate) terms: ContractTerms,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TerminateRequest {
    pub(crate) actor: Role,
    #[serde(default)]
    pub(crate) reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitLeadRequest {
    pub(crate) actor: Role,
    #[serde(flatten)]
    pub(crate) submission: LeadSubmission,
}

pub(crate) async fn initiate_handler<R, N>(
    State(service): State<Arc<MarketplaceService<R, N>>>,
    axum::Json(request): axum::Json<InitiateRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result = service.initiate(
        ProviderId(request.provider),
        BuyerId(request.buyer),
        request.initiated_by,
        request.message,
        request.terms,
    );

    match result {
        Ok(connection) => (StatusCode::CREATED, axum::Json(connection.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<MarketplaceService<R, N>>>,
    Path(connection_id): Path<String>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = ConnectionId(connection_id);
    match service.get(&id) {
        Ok(connection) => (StatusCode::OK, axum::Json(connection.view())).into_response(),
        Err(err) => error_response(err),
    }
}

/// Sets terms on a pending request, or revises them on an active
/// connection; the service validates the transition either way.
pub(crate) async fn terms_handler<R, N>(
    State(service): State<Arc<MarketplaceService<R, N>>>,
    Path(connection_id): Path<String>,
    axum::Json(request): axum::Json<TermsRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = ConnectionId(connection_id);
    let active = matches!(
        service.get(&id).map(|connection| connection.status),
        Ok(ConnectionStatus::Active)
    );

    let result = if active {
        service.update_terms(request.actor, &id, request.terms)
    } else {
        service.set_terms(request.actor, &id, request.terms)
    };

    match result {
        Ok(connection) => (StatusCode::OK, axum::Json(connection.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn accept_handler<R, N>(
    State(service): State<Arc<MarketplaceService<R, N>>>,
    Path(connection_id): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = ConnectionId(connection_id);
    match service.accept(request.actor, &id) {
        Ok(connection) => (StatusCode::OK, axum::Json(connection.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn decline_handler<R, N>(
    State(service): State<Arc<MarketplaceService<R, N>>>,
    Path(connection_id): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = ConnectionId(connection_id);
    match service.decline(request.actor, &id) {
        Ok(connection) => (StatusCode::OK, axum::Json(connection.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reject_handler<R, N>(
    State(service): State<Arc<MarketplaceService<R, N>>>,
    Path(connection_id): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = ConnectionId(connection_id);
    match service.reject(request.actor, &id) {
        Ok(connection) => (StatusCode::OK, axum::Json(connection.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn terminate_handler<R, N>(
    State(service): State<Arc<MarketplaceService<R, N>>>,
    Path(connection_id): Path<String>,
    axum::Json(request): axum::Json<TerminateRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = ConnectionId(connection_id);
    match service.terminate(request.actor, &id, request.reason) {
        Ok(connection) => (StatusCode::OK, axum::Json(connection.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_lead_handler<R, N>(
    State(service): State<Arc<MarketplaceService<R, N>>>,
    Path(connection_id): Path<String>,
    axum::Json(request): axum::Json<SubmitLeadRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = ConnectionId(connection_id);
    match service.submit_lead(request.actor, &id, request.submission) {
        Ok(lead) => (StatusCode::ACCEPTED, axum::Json(lead)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: MarketplaceError) -> Response {
    let status = match &err {
        MarketplaceError::Transition(_)
        | MarketplaceError::CapReached(_)
        | MarketplaceError::MissingTerms => StatusCode::UNPROCESSABLE_ENTITY,
        MarketplaceError::Forbidden { .. } => StatusCode::FORBIDDEN,
        MarketplaceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        MarketplaceError::Repository(RepositoryError::Conflict)
        | MarketplaceError::PairAlreadyConnected => StatusCode::CONFLICT,
        MarketplaceError::Repository(RepositoryError::Unavailable(_))
        | MarketplaceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
