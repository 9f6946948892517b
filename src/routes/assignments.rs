use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::access::Actor;
use crate::models::assignments::requests::CreateAssignmentForm;
use crate::services::AssignmentService;
use crate::utils::{CurrentUser, read_multipart};

pub async fn create_assignment(
    service: web::Data<AssignmentService>,
    CurrentUser(user): CurrentUser,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    // 表单不含文件，只读取文本字段
    let form = read_multipart(payload, None, 0).await?;
    let response = service
        .create(&user, CreateAssignmentForm::from_fields(form.fields))
        .await?;
    Ok(HttpResponse::Created().json(response))
}

pub async fn list_assignments(
    service: web::Data<AssignmentService>,
    CurrentUser(user): CurrentUser,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let response = service.list(&Actor::from(user), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

// 配置路由（挂在 /api 下）
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/assignments").route(web::post().to(create_assignment)))
        .service(
            web::resource("/assignments/{subject_id}").route(web::get().to(list_assignments)),
        );
}
