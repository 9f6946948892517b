use serde::Serialize;

use crate::models::users::entities::User;

// 注册/登录响应
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

// 当前用户响应
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user: User,
}
