use tracing::info;

use super::AuthService;
use crate::errors::{ClassroomError, Result};
use crate::models::{
    auth::{requests::RegisterRequest, responses::AuthResponse},
    users::{entities::UserRole, requests::CreateUserRequest},
};
use crate::utils::password::hash_password;
use crate::utils::validate::required_field;

pub async fn handle_register(
    service: &AuthService,
    request: RegisterRequest,
) -> Result<AuthResponse> {
    // 1. 必填字段
    let email = required_field(request.email, "email")?.trim().to_string();
    let password = required_field(request.password, "password")?;
    let role = required_field(request.role, "role")?;

    // 2. 角色只能是教师或学生
    let role = role
        .parse::<UserRole>()
        .map_err(|_| ClassroomError::validation("Role must be teacher or student!"))?;

    // 3. 邮箱唯一（并发注册时由唯一索引兜底）
    let storage = service.storage();
    if storage.get_user_by_email(&email).await?.is_some() {
        return Err(ClassroomError::duplicate("Email already registered!"));
    }

    // 4. 哈希密码并创建用户
    let password_hash = hash_password(&password, service.argon2())?;
    let user = storage
        .create_user(CreateUserRequest {
            email,
            password_hash,
            role,
        })
        .await?;

    let token = service.tokens().issue(user.id)?;
    info!("User {} registered as {}", user.id, user.role);

    Ok(AuthResponse {
        message: "User registered successfully!".to_string(),
        token,
        user,
    })
}
