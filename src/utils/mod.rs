//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResponse`] - 统一错误与响应结构
//! - [`PageQuery`] / [`Paginated`] - 分页
//! - 校验、编码生成、日志等工具

pub mod codes;
pub mod error;
pub mod logger;
pub mod pagination;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse, ok, ok_with_message};
pub use pagination::{PageQuery, Paginated, paginate};
pub use result::AppResult;
