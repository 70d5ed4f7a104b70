//! Pricing Server - 餐厅订单定价服务
//!
//! # 架构概述
//!
//! - **定价** (`pricing`): 优惠码、订单报价、动态单价，底层引擎在 `shared::order_money`
//! - **CMS** (`services/directus`): 菜单和库存数据 (内存 TTL 缓存)
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! pricing-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── pricing/       # 定价规则
//! ├── services/      # CMS 客户端、缓存、HTTP 服务
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、时间
//! ```

pub mod api;
pub mod core;
pub mod pricing;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use pricing::PromoCatalog;
pub use services::https::build_router;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env、读取配置、初始化日志
pub fn setup_environment() -> Config {
    // .env 可选
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}
