use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result as ActixResult, http::header, web};

use crate::models::submissions::requests::{GradeSubmissionRequest, SubmitAssignmentForm};
use crate::services::SubmissionService;
use crate::utils::{CurrentUser, read_multipart};

pub async fn submit_assignment(
    service: web::Data<SubmissionService>,
    CurrentUser(user): CurrentUser,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let mut form = read_multipart(payload, Some("file"), service.upload().max_size).await?;
    let response = service
        .submit(
            &user,
            SubmitAssignmentForm {
                assignment_id: form.fields.remove("assignment_id"),
                file: form.file,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(response))
}

pub async fn my_submissions(
    service: web::Data<SubmissionService>,
    CurrentUser(user): CurrentUser,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list_mine(&user).await?))
}

pub async fn assignment_submissions(
    service: web::Data<SubmissionService>,
    CurrentUser(user): CurrentUser,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let response = service
        .list_for_assignment(&user, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn grade_submission(
    service: web::Data<SubmissionService>,
    CurrentUser(user): CurrentUser,
    path: web::Path<i64>,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let response = service
        .grade(&user, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn download_submission(
    service: web::Data<SubmissionService>,
    CurrentUser(user): CurrentUser,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let file = service.download(&user, path.into_inner()).await?;

    // 文件名已清洗，只含 ASCII 安全字符
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name),
        ))
        .body(file.bytes))
}

// 配置路由（挂在 /api 下）
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/submissions").route(web::post().to(submit_assignment)))
        .service(
            web::resource("/submissions/{submission_id}/grade")
                .route(web::put().to(grade_submission)),
        )
        .service(web::resource("/my-submissions").route(web::get().to(my_submissions)))
        .service(
            web::resource("/assignments/{assignment_id}/submissions")
                .route(web::get().to(assignment_submissions)),
        )
        .service(
            web::resource("/download/{submission_id}").route(web::get().to(download_submission)),
        );
}
