use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::access::Actor;
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::services::SubjectService;
use crate::utils::CurrentUser;

pub async fn create_subject(
    service: web::Data<SubjectService>,
    CurrentUser(user): CurrentUser,
    body: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    let response = service.create(&user, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

pub async fn list_subjects(
    service: web::Data<SubjectService>,
    CurrentUser(user): CurrentUser,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(&Actor::from(user)).await?))
}

pub async fn delete_subject(
    service: web::Data<SubjectService>,
    CurrentUser(user): CurrentUser,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.delete(&user, path.into_inner()).await?))
}

// 配置路由（挂在 /api 下）
pub fn configure_subjects_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/subjects")
            .route(web::get().to(list_subjects))
            .route(web::post().to(create_subject)),
    )
    .service(web::resource("/subjects/{subject_id}").route(web::delete().to(delete_subject)));
}
