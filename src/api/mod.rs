//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`checkout`] - 买家结算草稿与提交
//! - [`orders`] - 买家订单查询与售后入口
//! - [`seller`] - 卖家履约与售后处理
//! - [`disputes`] - 纠纷答辩与平台裁决
//!
//! 身份来自网关转发的 `X-Buyer-Id` / `X-Seller-Id` / `X-Admin-Id` 头，
//! 由 [`identity`] 中的提取器统一校验。

pub mod identity;

pub mod checkout;
pub mod disputes;
pub mod health;
pub mod orders;
pub mod seller;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(checkout::router())
        .merge(orders::router())
        .merge(seller::router())
        .merge(disputes::router())
}
