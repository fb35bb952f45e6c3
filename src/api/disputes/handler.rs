//! Dispute API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::identity::{AdminId, BuyerId, SellerId};
use crate::core::ServerState;
use crate::models::{Actor, Dispute, DisputeStatus};
use crate::utils::{
    AppResponse, AppResult, ok,
    pagination::{PageQuery, Paginated, paginate},
};

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub note: String,
}

pub async fn buyer_revision_request(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(id): Path<String>,
    Json(payload): Json<NoteRequest>,
) -> AppResult<Json<AppResponse<Dispute>>> {
    Ok(ok(state.disputes.request_revision(
        Actor::Buyer,
        &buyer_id,
        &id,
        &payload.note,
    )?))
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub response: String,
}

pub async fn respond(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(id): Path<String>,
    Json(payload): Json<RespondRequest>,
) -> AppResult<Json<AppResponse<Dispute>>> {
    Ok(ok(state.disputes.respond(&seller_id, &id, &payload.response)?))
}

pub async fn seller_revision_request(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(id): Path<String>,
    Json(payload): Json<NoteRequest>,
) -> AppResult<Json<AppResponse<Dispute>>> {
    Ok(ok(state.disputes.request_revision(
        Actor::Seller,
        &seller_id,
        &id,
        &payload.note,
    )?))
}

// ========== Admin ==========

#[derive(Debug, Deserialize)]
pub struct DisputeListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<DisputeStatus>,
}

pub async fn list(
    State(state): State<ServerState>,
    AdminId(_admin_id): AdminId,
    Query(query): Query<DisputeListQuery>,
) -> AppResult<Json<AppResponse<Paginated<Dispute>>>> {
    let (page, limit) = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .normalize();
    Ok(ok(paginate(state.disputes.list(query.status), page, limit)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    AdminId(_admin_id): AdminId,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Dispute>>> {
    Ok(ok(state.disputes.get(&id)?))
}

pub async fn review(
    State(state): State<ServerState>,
    AdminId(_admin_id): AdminId,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Dispute>>> {
    Ok(ok(state.disputes.review(&id)?))
}

/// `decision`: ACCEPT upholds the buyer, REJECT sides with the seller
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
    pub resolution: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Accept,
    Reject,
}

pub async fn resolve(
    State(state): State<ServerState>,
    AdminId(_admin_id): AdminId,
    Path(id): Path<String>,
    Json(payload): Json<DecisionRequest>,
) -> AppResult<Json<AppResponse<Dispute>>> {
    Ok(ok(state.disputes.resolve(
        &id,
        payload.decision == Decision::Accept,
        &payload.resolution,
    )?))
}

pub async fn revise(
    State(state): State<ServerState>,
    AdminId(_admin_id): AdminId,
    Path(id): Path<String>,
    Json(payload): Json<DecisionRequest>,
) -> AppResult<Json<AppResponse<Dispute>>> {
    Ok(ok(state.disputes.revise(
        &id,
        payload.decision == Decision::Accept,
        &payload.resolution,
    )?))
}
