//! 买家订单 API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /order-groups/{groupCode} | GET | 订单组（聚合状态 + 子订单） |
//! | /orders | GET | 订单列表（分页，可按状态过滤） |
//! | /orders/{code} | GET | 订单详情 |
//! | /orders/{code}/confirm-received | POST | 确认收货 |
//! | /orders/{code}/cancel | POST | 履约前免费取消 |
//! | /orders/{code}/cancel-request | POST | 履约后取消申请 |
//! | /orders/{code}/return-request | POST | 退货申请 |
//! | /orders/{code}/refund-request | POST | 仅退款申请 |
//! | /orders/{code}/dispute | POST | 发起纠纷 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customer", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/order-groups/{group_code}", get(handler::get_group))
        .route("/orders", get(handler::list))
        .route("/orders/{code}", get(handler::get_by_code))
        .route(
            "/orders/{code}/confirm-received",
            post(handler::confirm_received),
        )
        .route("/orders/{code}/cancel", post(handler::cancel_free))
        .route("/orders/{code}/cancel-request", post(handler::request_cancel))
        .route("/orders/{code}/return-request", post(handler::request_return))
        .route("/orders/{code}/refund-request", post(handler::request_refund))
        .route("/orders/{code}/dispute", post(handler::open_dispute))
}
