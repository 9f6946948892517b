use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{AuthRateLimits, RequireJWT};
use crate::models::auth::requests::{LoginRequest, RegisterRequest};
use crate::services::AuthService;
use crate::utils::CurrentUser;

pub async fn register(
    service: web::Data<AuthService>,
    body: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    let response = service.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

pub async fn login(
    service: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let response = service.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn me(
    service: web::Data<AuthService>,
    CurrentUser(user): CurrentUser,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.me(&user).await?))
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig, limits: &AuthRateLimits) {
    cfg.service(
        web::resource("/register")
            .wrap(limits.register.clone())
            .route(web::post().to(register)),
    )
    .service(
        web::resource("/login")
            .wrap(limits.login.clone())
            .route(web::post().to(login)),
    )
    .service(
        web::resource("/me")
            .wrap(RequireJWT)
            .route(web::get().to(me)),
    );
}
