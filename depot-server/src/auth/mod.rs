//! 认证模块
//!
//! JWT 会话认证 + Argon2 口令校验（账号模型上）。
//! 会话令牌只证明登录态；敏感操作另行通过 step-up gate
//! 重新校验口令。

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::CurrentUser;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
