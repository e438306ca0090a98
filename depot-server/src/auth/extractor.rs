//! 当前用户提取
//!
//! 认证中间件验证令牌后，将 [`CurrentUser`] 注入请求扩展；
//! handler 通过 `Extension<CurrentUser>` 取用。

use super::jwt::Claims;

/// 已认证的当前用户
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            display_name: claims.display_name,
            role: claims.role,
        }
    }
}
