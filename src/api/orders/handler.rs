//! Customer Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::api::identity::BuyerId;
use crate::core::ServerState;
use crate::models::{
    Dispute, Order, OrderGroup, OrderGroupStatus, OrderStatus, ReturnClassification,
};
use crate::utils::{
    AppError, AppResponse, AppResult, ok,
    pagination::{PageQuery, Paginated, paginate},
};

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<OrderStatus>,
}

impl OrderListQuery {
    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Group view: the stored group plus the derived aggregate status
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderGroupView {
    #[serde(flatten)]
    pub group: OrderGroup,
    pub status: OrderGroupStatus,
    pub orders: Vec<Order>,
}

pub async fn get_group(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(group_code): Path<String>,
) -> AppResult<Json<AppResponse<OrderGroupView>>> {
    let group = state
        .orders
        .group(&group_code)
        .ok_or_else(|| AppError::not_found(format!("Order group {group_code}")))?;
    if group.buyer_id != buyer_id {
        return Err(AppError::forbidden("Order group belongs to another buyer"));
    }
    let orders: Vec<Order> = group
        .order_codes
        .iter()
        .filter_map(|c| state.orders.order(c))
        .collect();
    let statuses: Vec<OrderStatus> = orders.iter().map(|o| o.status).collect();
    Ok(ok(OrderGroupView {
        status: OrderGroup::aggregate_status(&statuses),
        group,
        orders,
    }))
}

pub async fn list(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<AppResponse<Paginated<Order>>>> {
    let (page, limit) = query.page_query().normalize();
    let orders = state.orders.list_by_buyer(&buyer_id, query.status);
    Ok(ok(paginate(orders, page, limit)))
}

pub async fn get_by_code(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .orders
        .order(&code)
        .ok_or_else(|| AppError::not_found(format!("Order {code}")))?;
    if order.buyer_id != buyer_id {
        return Err(AppError::forbidden("Order belongs to another buyer"));
    }
    Ok(ok(order))
}

pub async fn confirm_received(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.confirm_received(&buyer_id, &code)?))
}

pub async fn cancel_free(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.cancel_free(&buyer_id, &code)?))
}

#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    pub reason: String,
}

pub async fn request_cancel(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
    Json(payload): Json<ReasonRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state
        .lifecycle
        .request_cancel(&buyer_id, &code, &payload.reason)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequestPayload {
    pub reason: String,
    pub classification: ReturnClassification,
}

pub async fn request_return(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
    Json(payload): Json<ReturnRequestPayload>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.request_return(
        &buyer_id,
        &code,
        &payload.reason,
        payload.classification,
    )?))
}

pub async fn request_refund(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
    Json(payload): Json<ReasonRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state
        .lifecycle
        .request_refund(&buyer_id, &code, &payload.reason)?))
}

#[derive(Debug, Deserialize)]
pub struct OpenDisputeRequest {
    pub subject: String,
    pub detail: String,
}

pub async fn open_dispute(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
    Json(payload): Json<OpenDisputeRequest>,
) -> AppResult<Json<AppResponse<Dispute>>> {
    Ok(ok(state
        .disputes
        .open(&buyer_id, &code, &payload.subject, &payload.detail)?))
}
