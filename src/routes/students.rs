use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::services::UserService;
use crate::utils::CurrentUser;

pub async fn list_students(
    service: web::Data<UserService>,
    CurrentUser(user): CurrentUser,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list_students(&user).await?))
}

// 配置路由（挂在 /api 下）
pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/students").route(web::get().to(list_students)));
}
