use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::models::attendance::requests::{
    AttendanceRangeQuery, MarkAttendanceRequest, MyAttendanceQuery,
};
use crate::services::AttendanceService;
use crate::utils::CurrentUser;

pub async fn mark_attendance(
    service: web::Data<AttendanceService>,
    CurrentUser(user): CurrentUser,
    body: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    let response = service.mark(&user, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

pub async fn subject_attendance(
    service: web::Data<AttendanceService>,
    CurrentUser(user): CurrentUser,
    path: web::Path<i64>,
    query: web::Query<AttendanceRangeQuery>,
) -> ActixResult<HttpResponse> {
    let response = service
        .for_subject(&user, path.into_inner(), query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn my_attendance(
    service: web::Data<AttendanceService>,
    CurrentUser(user): CurrentUser,
    query: web::Query<MyAttendanceQuery>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.for_student(&user, query.into_inner()).await?))
}

// 配置路由（挂在 /api 下）
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/attendance/mark").route(web::post().to(mark_attendance)))
        .service(
            web::resource("/attendance/{subject_id}").route(web::get().to(subject_attendance)),
        )
        .service(web::resource("/my-attendance").route(web::get().to(my_attendance)));
}
