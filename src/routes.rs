use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{auth::Principal, directory, error::AppError, ledger, state::AppState};

pub async fn recommended_handler(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.redis.clone();
    let users = directory::recommended(&mut conn, principal.id()).await?;
    Ok(Json(users))
}

pub async fn friends_handler(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.redis.clone();
    let friends = directory::friends_of(&mut conn, principal.id()).await?;
    Ok(Json(friends))
}

pub async fn send_request_handler(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(recipient_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.redis.clone();
    let request = ledger::send(&mut conn, principal.id(), &recipient_id).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn accept_request_handler(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.redis.clone();
    let request = ledger::accept(&mut conn, principal.id(), &request_id).await?;
    Ok(Json(request))
}

pub async fn incoming_requests_handler(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.redis.clone();
    let requests = ledger::incoming(&mut conn, principal.id()).await?;
    Ok(Json(requests))
}

pub async fn outgoing_requests_handler(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.redis.clone();
    let requests = ledger::outgoing(&mut conn, principal.id()).await?;
    Ok(Json(requests))
}
