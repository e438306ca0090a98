//! Depot Server - 设备与耗材台账管理服务
//!
//! # 架构概述
//!
//! 本模块是 Depot 服务端的主入口，提供以下核心功能：
//!
//! - **审计化变更引擎** (`mutation` + `audit`): 字段级 diff、
//!   step-up 重认证、append-only 审计日志
//! - **库存台账** (`inventory`): 入库/领用对库存计数的对账
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! depot-server/src/
//! ├── core/       # 配置、状态、服务器
//! ├── auth/       # JWT 认证
//! ├── audit/      # schema、draft、diff、审计存储与历史
//! ├── mutation/   # step-up gate 与变更引擎
//! ├── inventory/  # 库存对账
//! ├── api/        # HTTP 路由和处理器
//! ├── db/         # 数据库层 (models + repositories)
//! └── utils/      # 工具函数
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod inventory;
pub mod mutation;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____                   __
   / __ \___  ____  ____  / /_
  / / / / _ \/ __ \/ __ \/ __/
 / /_/ /  __/ /_/ / /_/ / /_
/_____/\___/ .___/\____/\__/
          /_/
    "#
    );
}
