//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举（按错误分类映射 HTTP 状态码）
//! - [`AppResponse`] - API 统一响应结构
//!
//! # 错误分类
//!
//! | 代码 | HTTP | 说明 |
//! |------|------|------|
//! | VALIDATION | 400 | 请求字段缺失或格式错误 |
//! | NOT_ELIGIBLE | 422 | 资格规则不满足（优惠券/运费/退货） |
//! | CONFLICT | 409 | 状态冲突（库存不足、草稿已提交、重复请求） |
//! | FORBIDDEN | 403 | 操作者无权执行该转换 |
//! | NOT_FOUND | 404 | 资源不存在 |
//! | INTERNAL | 500 | 内部错误（不泄露细节） |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Order SM-123"))
//!
//! // 返回成功响应
//! Ok(ok(data))
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// API 统一响应结构
///
/// ```json
/// {
///   "success": true,
///   "code": "OK",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppResponse<T> {
    /// 是否成功
    pub success: bool,
    /// 错误分类代码（成功时为 "OK"）
    pub code: String,
    /// 人类可读消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 请求字段缺失或格式错误 (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 资格规则不满足 (422) — 消息即具体原因，原样返回给调用方
    #[error("Not eligible: {0}")]
    NotEligible(String),

    /// 状态冲突 (409) — 刷新状态后重试是安全的
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 操作者无权执行 (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 资源不存在 (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 内部错误 (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_eligible(msg: impl Into<String>) -> Self {
        Self::NotEligible(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Taxonomy code string used in the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::NotEligible(_) => "NOT_ELIGIBLE",
            Self::Conflict(_) => "CONFLICT",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotEligible(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, format!("{} not found", msg)),

            // 内部错误只记日志，不把存储细节返回给调用方
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            success: false,
            code: self.code().to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        success: true,
        code: "OK".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        success: true,
        code: "OK".to_string(),
        message: message.into(),
        data: Some(data),
    })
}
