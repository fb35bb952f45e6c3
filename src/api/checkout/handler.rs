//! Checkout API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Deserialize;

use crate::api::identity::BuyerId;
use crate::checkout::{CommitOutcome, DraftVoucherView};
use crate::core::ServerState;
use crate::models::{AddressInput, CartLine, CheckoutDraft, PaymentMethod};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDraftRequest {
    pub items: Vec<CartLine>,
    #[serde(flatten)]
    pub address: AddressInput,
}

/// Create or refresh the draft for the given cart lines
pub async fn create_draft(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Json(payload): Json<CreateDraftRequest>,
) -> AppResult<Json<AppResponse<CheckoutDraft>>> {
    let draft = state
        .checkout
        .build_or_refresh(&buyer_id, payload.items, payload.address)?;
    Ok(ok(draft))
}

/// Read one draft; totals re-projected against the live catalog
pub async fn get_draft(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<CheckoutDraft>>> {
    let draft = state.checkout.get_draft(&buyer_id, &code)?;
    Ok(ok(draft))
}

pub async fn update_address(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
    Json(payload): Json<AddressInput>,
) -> AppResult<Json<AppResponse<CheckoutDraft>>> {
    let draft = state.checkout.update_address(&buyer_id, &code, payload)?;
    Ok(ok(draft))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectShippingRequest {
    pub shop_id: String,
    pub option_code: String,
}

pub async fn select_shipping(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
    Json(payload): Json<SelectShippingRequest>,
) -> AppResult<Json<AppResponse<CheckoutDraft>>> {
    let draft =
        state
            .checkout
            .select_shipping(&buyer_id, &code, &payload.shop_id, &payload.option_code)?;
    Ok(ok(draft))
}

/// `code: null` clears the voucher
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformVoucherRequest {
    pub code: Option<String>,
}

pub async fn set_platform_voucher(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
    Json(payload): Json<PlatformVoucherRequest>,
) -> AppResult<Json<AppResponse<CheckoutDraft>>> {
    let draft = state
        .checkout
        .set_platform_voucher(&buyer_id, &code, payload.code)?;
    Ok(ok(draft))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopVoucherRequest {
    pub shop_id: String,
    pub code: Option<String>,
}

pub async fn set_shop_voucher(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
    Json(payload): Json<ShopVoucherRequest>,
) -> AppResult<Json<AppResponse<CheckoutDraft>>> {
    let draft =
        state
            .checkout
            .set_shop_voucher(&buyer_id, &code, &payload.shop_id, payload.code)?;
    Ok(ok(draft))
}

pub async fn voucher_preview(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
) -> AppResult<Json<AppResponse<Vec<DraftVoucherView>>>> {
    let views = state.checkout.voucher_preview(&buyer_id, &code)?;
    Ok(ok(views))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    pub note: Option<String>,
}

pub async fn set_note(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    Path(code): Path<String>,
    Json(payload): Json<NoteRequest>,
) -> AppResult<Json<AppResponse<CheckoutDraft>>> {
    let draft = state.checkout.set_note(&buyer_id, &code, payload.note)?;
    Ok(ok(draft))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub draft_code: String,
    pub payment_method: PaymentMethod,
}

/// Commit the draft into one order group. The `Idempotency-Key` header
/// makes retries replay the first result instead of re-executing.
pub async fn commit(
    State(state): State<ServerState>,
    BuyerId(buyer_id): BuyerId,
    headers: HeaderMap,
    Json(payload): Json<CommitRequest>,
) -> AppResult<Json<AppResponse<CommitOutcome>>> {
    let idempotency_key = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let outcome = state.checkout.commit(
        &buyer_id,
        &payload.draft_code,
        payload.payment_method,
        idempotency_key,
    )?;
    Ok(ok_with_message(outcome, "Order group created"))
}
