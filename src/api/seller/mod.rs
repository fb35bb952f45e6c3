//! 卖家订单 API
//!
//! 所有操作都要求 `X-Seller-Id` 与订单所属店铺匹配。
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /orders | GET | 本店订单列表（分页） |
//! | /orders/{code} | GET | 订单详情 |
//! | /orders/{code}/confirm | POST | 接单 |
//! | /orders/{code}/pack | POST | 开始打包 |
//! | /orders/{code}/create-shipment | POST | 发货 |
//! | /orders/{code}/update-shipment | POST | 物流推进（单调） |
//! | /orders/{code}/cancel-approve | POST | 同意取消 |
//! | /orders/{code}/cancel-reject | POST | 拒绝取消（回到原状态） |
//! | /orders/{code}/return-approve | POST | 同意退货（含结算条款） |
//! | /orders/{code}/return-reject | POST | 拒绝退货 |
//! | /orders/{code}/return-received | POST | 确认收到退货并结算退款 |
//! | /orders/{code}/refund-approve | POST | 同意仅退款 |
//! | /orders/{code}/refund-reject | POST | 拒绝仅退款（回到原状态） |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/seller", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::list))
        .route("/orders/{code}", get(handler::get_by_code))
        .route("/orders/{code}/confirm", post(handler::confirm))
        .route("/orders/{code}/pack", post(handler::pack))
        .route("/orders/{code}/create-shipment", post(handler::create_shipment))
        .route("/orders/{code}/update-shipment", post(handler::update_shipment))
        .route("/orders/{code}/cancel-approve", post(handler::approve_cancel))
        .route("/orders/{code}/cancel-reject", post(handler::reject_cancel))
        .route("/orders/{code}/return-approve", post(handler::approve_return))
        .route("/orders/{code}/return-reject", post(handler::reject_return))
        .route("/orders/{code}/return-received", post(handler::return_received))
        .route("/orders/{code}/refund-approve", post(handler::approve_refund))
        .route("/orders/{code}/refund-reject", post(handler::reject_refund))
}
