//! 结算草稿 API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /draft | POST | 建立或刷新草稿 |
//! | /draft/{code} | GET | 读取草稿（实时重投影） |
//! | /draft/{code}/address | PATCH | 更新收货地址 |
//! | /draft/{code}/shipping | PATCH | 选择运费选项 |
//! | /draft/{code}/voucher | PATCH | 设置/清除平台券 |
//! | /draft/{code}/shop-voucher | PATCH | 设置/清除店铺券 |
//! | /draft/{code}/vouchers | GET | 券评估预览 |
//! | /draft/{code}/note | PATCH | 订单备注 |
//! | /commit | POST | 提交草稿，生成订单组 |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customer/checkout", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/draft", post(handler::create_draft))
        .route("/draft/{code}", get(handler::get_draft))
        .route("/draft/{code}/address", patch(handler::update_address))
        .route("/draft/{code}/shipping", patch(handler::select_shipping))
        .route("/draft/{code}/voucher", patch(handler::set_platform_voucher))
        .route("/draft/{code}/shop-voucher", patch(handler::set_shop_voucher))
        .route("/draft/{code}/vouchers", get(handler::voucher_preview))
        .route("/draft/{code}/note", patch(handler::set_note))
        .route("/commit", post(handler::commit))
}
