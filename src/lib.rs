//! SanMart Server - 多商家市场结算与售后核心
//!
//! # 架构概述
//!
//! - **结算** (`checkout`): 购物车 → 草稿 → 原子提交（每店一单）
//! - **生命周期** (`lifecycle`): 订单状态机、取消/退货/退款、纠纷裁决
//! - **存储** (`store`): 内存仓储（目录视图 + 权威订单数据）
//! - **HTTP API** (`api`): 买家 / 卖家 / 平台三方接口
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── models/        # 领域模型
//! ├── store/         # 仓储层
//! ├── checkout/      # 草稿与提交
//! ├── lifecycle/     # 订单状态机与纠纷
//! └── utils/         # 错误、校验、分页等工具
//! ```

pub mod api;
pub mod checkout;
pub mod core;
pub mod lifecycle;
pub mod models;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    // .env 不存在不是错误
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____             __  ___           __
  / ___/____ _____  /  |/  /___ ______/ /_
  \__ \/ __ `/ __ \/ /|_/ / __ `/ ___/ __/
 ___/ / /_/ / / / / /  / / /_/ / /  / /_
/____/\__,_/_/ /_/_/  /_/\__,_/_/   \__/
    "#
    );
}
