//! 纠纷 API
//!
//! 发起纠纷挂在买家订单路由下（`/api/customer/orders/{code}/dispute`）；
//! 这里承载其余三方入口。
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/customer/disputes/{id}/revision-request | POST | 买家请求复议 |
//! | /api/seller/disputes/{id}/respond | POST | 卖家答辩 |
//! | /api/seller/disputes/{id}/revision-request | POST | 卖家请求复议 |
//! | /api/admin/disputes | GET | 纠纷列表（分页） |
//! | /api/admin/disputes/{id} | GET | 纠纷详情 |
//! | /api/admin/disputes/{id}/review | PUT | OPEN → UNDER_REVIEW |
//! | /api/admin/disputes/{id}/resolve | PUT | 裁决 |
//! | /api/admin/disputes/{id}/revise | PUT | 唯一一次改判 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/customer/disputes/{id}/revision-request",
            post(handler::buyer_revision_request),
        )
        .route("/api/seller/disputes/{id}/respond", post(handler::respond))
        .route(
            "/api/seller/disputes/{id}/revision-request",
            post(handler::seller_revision_request),
        )
        .route("/api/admin/disputes", get(handler::list))
        .route("/api/admin/disputes/{id}", get(handler::get_by_id))
        .route("/api/admin/disputes/{id}/review", put(handler::review))
        .route("/api/admin/disputes/{id}/resolve", put(handler::resolve))
        .route("/api/admin/disputes/{id}/revise", put(handler::revise))
}
