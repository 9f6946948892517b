use tracing::{info, warn};

use super::AuthService;
use crate::errors::{ClassroomError, Result};
use crate::models::auth::{requests::LoginRequest, responses::AuthResponse};
use crate::utils::password::verify_password;

pub async fn handle_login(service: &AuthService, request: LoginRequest) -> Result<AuthResponse> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
    let (Some(email), Some(password)) = (non_empty(request.email), non_empty(request.password))
    else {
        return Err(ClassroomError::validation("Email and password required!"));
    };

    // 用户不存在与密码错误返回相同信息
    let user = service
        .storage()
        .get_user_by_email(email.trim())
        .await?
        .filter(|user| verify_password(&password, &user.password_hash))
        .ok_or_else(|| {
            warn!("Failed login attempt for {}", email);
            ClassroomError::authentication("Invalid email or password!")
        })?;

    // 停用账号单独提示
    if !user.active {
        warn!("Login attempt for deactivated user {}", user.id);
        return Err(ClassroomError::authentication("Account is deactivated!"));
    }

    let token = service.tokens().issue(user.id)?;
    info!("User {} logged in successfully", user.id);

    Ok(AuthResponse {
        message: "Login successful!".to_string(),
        token,
        user,
    })
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use crate::models::auth::requests::{LoginRequest, RegisterRequest};
    use crate::testing::test_context;

    fn register_request(email: &str, role: &str) -> RegisterRequest {
        RegisterRequest {
            email: Some(email.to_string()),
            password: Some("pa55word".to_string()),
            role: Some(role.to_string()),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_login_verify_roundtrip() {
        let ctx = test_context().await;
        let auth = &ctx.services.auth;

        let registered = auth
            .register(register_request("alice@example.com", "student"))
            .await
            .unwrap();
        assert_eq!(registered.message, "User registered successfully!");

        let logged_in = auth
            .login(login_request("alice@example.com", "pa55word"))
            .await
            .unwrap();
        assert_eq!(logged_in.message, "Login successful!");
        assert_eq!(ctx.tokens.verify(&logged_in.token), Ok(registered.user.id));
        assert_eq!(ctx.tokens.verify(&registered.token), Ok(registered.user.id));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let ctx = test_context().await;
        let auth = &ctx.services.auth;

        let mut missing = register_request("a@example.com", "student");
        missing.password = None;
        assert_eq!(
            auth.register(missing).await.unwrap_err().message(),
            "password is required!"
        );

        let err = auth
            .register(register_request("a@example.com", "admin"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Role must be teacher or student!");

        auth.register(register_request("a@example.com", "teacher"))
            .await
            .unwrap();
        let err = auth
            .register(register_request("a@example.com", "student"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Email already registered!");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let ctx = test_context().await;
        let auth = &ctx.services.auth;
        let user = auth
            .register(register_request("bob@example.com", "teacher"))
            .await
            .unwrap()
            .user;

        let err = auth
            .login(LoginRequest {
                email: Some("bob@example.com".into()),
                password: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Email and password required!");

        let wrong_password = auth
            .login(login_request("bob@example.com", "nope"))
            .await
            .unwrap_err();
        let unknown_user = auth
            .login(login_request("nobody@example.com", "pa55word"))
            .await
            .unwrap_err();
        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.message(), unknown_user.message());

        // 停用账号即使密码正确也不能登录
        ctx.storage.set_user_active(user.id, false).await.unwrap();
        let err = auth
            .login(login_request("bob@example.com", "pa55word"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Account is deactivated!");
    }
}
