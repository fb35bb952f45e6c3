//! Seller Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::identity::SellerId;
use crate::core::ServerState;
use crate::lifecycle::ReturnTerms;
use crate::models::{Order, OrderStatus, ShipmentStatus};
use crate::utils::{
    AppError, AppResponse, AppResult, ok,
    pagination::{PageQuery, Paginated, paginate},
};

#[derive(Debug, Deserialize)]
pub struct SellerListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<OrderStatus>,
}

/// Orders across every shop the seller owns, newest first
pub async fn list(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Query(query): Query<SellerListQuery>,
) -> AppResult<Json<AppResponse<Paginated<Order>>>> {
    let (page, limit) = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .normalize();

    let mut orders: Vec<Order> = state
        .catalog
        .shops_by_seller(&seller_id)
        .iter()
        .flat_map(|shop| state.orders.list_by_shop(&shop.id, query.status))
        .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.code.cmp(&b.code)));
    Ok(ok(paginate(orders, page, limit)))
}

pub async fn get_by_code(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .orders
        .order(&code)
        .ok_or_else(|| AppError::not_found(format!("Order {code}")))?;
    if !state.catalog.seller_owns(&order.shop_id, &seller_id) {
        return Err(AppError::forbidden("Order belongs to another shop"));
    }
    Ok(ok(order))
}

pub async fn confirm(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.confirm(&seller_id, &code)?))
}

pub async fn pack(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.pack(&seller_id, &code)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    pub carrier: String,
    pub service_name: String,
    pub tracking_code: Option<String>,
}

pub async fn create_shipment(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(code): Path<String>,
    Json(payload): Json<CreateShipmentRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.create_shipment(
        &seller_id,
        &code,
        &payload.carrier,
        &payload.service_name,
        payload.tracking_code,
    )?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShipmentRequest {
    pub status: ShipmentStatus,
    pub note: Option<String>,
}

pub async fn update_shipment(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(code): Path<String>,
    Json(payload): Json<UpdateShipmentRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.update_shipment(
        &seller_id,
        &code,
        payload.status,
        payload.note,
    )?))
}

pub async fn approve_cancel(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.approve_cancel(&seller_id, &code)?))
}

pub async fn reject_cancel(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.reject_cancel(&seller_id, &code)?))
}

pub async fn approve_return(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(code): Path<String>,
    Json(terms): Json<ReturnTerms>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.approve_return(&seller_id, &code, terms)?))
}

#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    pub reason: String,
}

pub async fn reject_return(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(code): Path<String>,
    Json(payload): Json<ReasonRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state
        .lifecycle
        .reject_return(&seller_id, &code, &payload.reason)?))
}

pub async fn return_received(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.return_received(&seller_id, &code)?))
}

pub async fn approve_refund(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.approve_refund(&seller_id, &code)?))
}

pub async fn reject_refund(
    State(state): State<ServerState>,
    SellerId(seller_id): SellerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.lifecycle.reject_refund(&seller_id, &code)?))
}
