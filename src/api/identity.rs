//! 调用方身份提取
//!
//! Authentication lives at the gateway; the server trusts the identity
//! headers it forwards. A missing header is a FORBIDDEN, not a 401 —
//! the gateway owns the challenge flow.

use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::utils::AppError;

/// `X-Buyer-Id` — customer-facing endpoints
#[derive(Debug, Clone)]
pub struct BuyerId(pub String);

/// `X-Seller-Id` — seller-facing endpoints
#[derive(Debug, Clone)]
pub struct SellerId(pub String);

/// `X-Admin-Id` — platform adjudication endpoints
#[derive(Debug, Clone)]
pub struct AdminId(pub String);

fn header_identity(parts: &Parts, name: &str) -> Result<String, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or_else(|| AppError::forbidden(format!("Missing {name} header")))
}

impl<S: Send + Sync> FromRequestParts<S> for BuyerId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_identity(parts, "X-Buyer-Id").map(BuyerId)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SellerId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_identity(parts, "X-Seller-Id").map(SellerId)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AdminId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_identity(parts, "X-Admin-Id").map(AdminId)
    }
}
