/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，重新读取用户并确认账号仍然启用，
 * 然后把用户写入请求扩展，处理程序通过 `CurrentUser` 提取。
 *
 * ```rust,ignore
 * web::scope("/api")
 *     .wrap(RequireJWT)
 *     .route("/subjects", web::get().to(list_subjects))
 * ```
 *
 * 依赖 app_data 中的 `web::Data<TokenService>` 与 `web::Data<Arc<dyn Storage>>`。
 * 失败时返回 401 {"message": ...}：
 * - 缺少令牌: "Token is missing!"
 * - 令牌过期: "Token has expired!"
 * - 令牌无效: "Invalid token!"
 * - 用户不存在或已停用: "User not found or inactive!"
 */

use crate::errors::ClassroomError;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::TokenService;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

#[derive(Clone)]
pub struct RequireJWT;

// 从请求头取出令牌
fn extract_token(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    parts.next().map(|t| t.to_string())
}

// 校验令牌并加载用户
async fn authenticate(req: &ServiceRequest) -> Result<User, ClassroomError> {
    let token = extract_token(req).ok_or_else(|| ClassroomError::authentication("Token is missing!"))?;

    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| ClassroomError::database_config("TokenService not found in app data"))?;
    let user_id = tokens.verify(&token)?;

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| ClassroomError::database_config("Storage not found in app data"))?
        .get_ref()
        .clone();

    match storage.get_user_by_id(user_id).await? {
        Some(user) if user.active => Ok(user),
        _ => Err(ClassroomError::authentication("User not found or inactive!")),
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求交给 CORS 处理
            if req.method() == actix_web::http::Method::OPTIONS {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(err.error_response().map_into_right_body()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{memory_storage, seed_student};
    use crate::utils::CurrentUser;
    use actix_web::{App, HttpResponse, http::StatusCode, test};

    async fn whoami(user: CurrentUser) -> HttpResponse {
        HttpResponse::Ok().json(user.0)
    }

    #[actix_web::test]
    async fn test_token_checks() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "s@example.com").await;
        let tokens = TokenService::new("secret", chrono::Duration::minutes(5));
        let good = tokens.issue(student.id).unwrap();
        let unknown = tokens.issue(9999).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(tokens.clone()))
                .service(
                    web::scope("/api")
                        .wrap(RequireJWT)
                        .route("/whoami", web::get().to(whoami)),
                ),
        )
        .await;

        let cases = [
            (None, StatusCode::UNAUTHORIZED, Some("Token is missing!")),
            (Some("Bearer".to_string()), StatusCode::UNAUTHORIZED, Some("Token is missing!")),
            (Some("Bearer junk".to_string()), StatusCode::UNAUTHORIZED, Some("Invalid token!")),
            (
                Some(format!("Bearer {unknown}")),
                StatusCode::UNAUTHORIZED,
                Some("User not found or inactive!"),
            ),
            (Some(format!("Bearer {good}")), StatusCode::OK, None),
        ];

        for (header, status, message) in cases {
            let mut req = test::TestRequest::get().uri("/api/whoami");
            if let Some(h) = header {
                req = req.insert_header((AUTHORIZATION, h));
            }
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), status);
            let body: serde_json::Value = test::read_body_json(resp).await;
            match message {
                Some(m) => assert_eq!(body["message"], m),
                None => assert_eq!(body["email"], "s@example.com"),
            }
        }

        // 停用后同一令牌失效
        storage.set_user_active(student.id, false).await.unwrap();
        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {good}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_expired_token() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "s@example.com").await;
        let tokens = TokenService::new("secret", chrono::Duration::minutes(5));
        let expired = tokens
            .issue_at(student.id, chrono::Utc::now() - chrono::Duration::hours(1))
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(tokens))
                .service(
                    web::scope("/api")
                        .wrap(RequireJWT)
                        .route("/whoami", web::get().to(whoami)),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {expired}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Token has expired!");
    }
}
