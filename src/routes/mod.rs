pub mod assignments;

pub mod attendance;

pub mod auth;

pub mod students;

pub mod subjects;

pub mod submissions;

use actix_web::{HttpResponse, web};

use crate::middlewares::RequireJWT;
use crate::models::ErrorResponse;

pub use assignments::configure_assignments_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use students::configure_students_routes;
pub use subjects::configure_subjects_routes;
pub use submissions::configure_submissions_routes;

/// `/api` 下的全部路由，统一经过 JWT 认证
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(RequireJWT)
            .configure(configure_subjects_routes)
            .configure(configure_assignments_routes)
            .configure(configure_submissions_routes)
            .configure(configure_attendance_routes)
            .configure(configure_students_routes),
    );
}

/// 未匹配路由
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Resource not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateLimitConfig;
    use crate::middlewares::AuthRateLimits;
    use crate::testing::{TestContext, pdf_bytes, test_context};
    use crate::utils::{json_error_handler, path_error_handler, query_error_handler};
    use actix_web::{App, http::StatusCode, http::header, test};
    use serde_json::{Value, json};

    macro_rules! init_app {
        ($ctx:expr, $limits:expr) => {{
            let ctx: &TestContext = &$ctx;
            let limits: AuthRateLimits = $limits;
            test::init_service(
                App::new()
                    .app_data(web::Data::new(ctx.tokens.clone()))
                    .app_data(web::Data::new(ctx.storage.clone()))
                    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                    .app_data(web::PathConfig::default().error_handler(path_error_handler))
                    .configure(|cfg| ctx.services.configure(cfg))
                    .configure(|cfg| configure_auth_routes(cfg, &limits))
                    .configure(configure_api_routes)
                    .default_service(web::to(not_found)),
            )
            .await
        }};
    }

    fn limits() -> AuthRateLimits {
        AuthRateLimits::from_config(&RateLimitConfig {
            login_per_minute: 100,
            register_per_minute: 100,
        })
    }

    fn bearer(token: &str) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
        let boundary = "classflow-test-boundary";
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    #[actix_web::test]
    async fn test_api_requires_token() {
        let ctx = test_context().await;
        let app = init_app!(ctx, limits());

        let req = test::TestRequest::get().uri("/api/subjects").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Token is missing!");

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(bearer("not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid token!");
    }

    #[actix_web::test]
    async fn test_unknown_route_and_bad_path_param() {
        let ctx = test_context().await;
        let app = init_app!(ctx, limits());

        let req = test::TestRequest::get().uri("/nowhere").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Resource not found");

        let teacher = crate::testing::seed_teacher(&ctx.storage, "t@example.com").await;
        let token = ctx.tokens.issue(teacher.id).unwrap();
        let req = test::TestRequest::delete()
            .uri("/api/subjects/abc")
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let ctx = test_context().await;
        let app = init_app!(ctx, limits());

        let req = test::TestRequest::post()
            .uri("/register")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_login_rate_limited() {
        let ctx = test_context().await;
        let strict = AuthRateLimits::from_config(&RateLimitConfig {
            login_per_minute: 2,
            register_per_minute: 2,
        });
        let app = init_app!(ctx, strict);

        let login = || {
            test::TestRequest::post()
                .uri("/login")
                .peer_addr("10.0.0.9:4000".parse().unwrap())
                .set_json(json!({"email": "nobody@example.com", "password": "x"}))
                .to_request()
        };
        for _ in 0..2 {
            let resp = test::call_service(&app, login()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
        let resp = test::call_service(&app, login()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("Retry-After"));
    }

    #[actix_web::test]
    async fn test_classroom_flow() {
        let ctx = test_context().await;
        let app = init_app!(ctx, limits());

        // 注册教师与学生
        let register = |email: &str, role: &str| {
            test::TestRequest::post()
                .uri("/register")
                .set_json(json!({"email": email, "password": "secret123", "role": role}))
                .to_request()
        };
        let resp = test::call_service(&app, register("t@example.com", "teacher")).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let teacher_token = body["token"].as_str().unwrap().to_string();
        assert!(body["user"].get("password_hash").is_none());

        let resp = test::call_service(&app, register("s@example.com", "student")).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let student_token = body["token"].as_str().unwrap().to_string();
        let student_id = body["user"]["id"].as_i64().unwrap();

        // 学生不能创建科目
        let req = test::TestRequest::post()
            .uri("/api/subjects")
            .insert_header(bearer(&student_token))
            .set_json(json!({"name": "Physics"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/subjects")
            .insert_header(bearer(&teacher_token))
            .set_json(json!({"name": "Physics"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let subject_id = body["subject"]["id"].as_i64().unwrap();

        // 教师创建作业（multipart）
        let (content_type, payload) = multipart_body(
            &[
                ("subject_id", &subject_id.to_string()),
                ("title", "Lab report"),
                ("due_date", "2099-01-01T00:00:00"),
            ],
            None,
        );
        let req = test::TestRequest::post()
            .uri("/api/assignments")
            .insert_header(bearer(&teacher_token))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let assignment_id = body["assignment"]["id"].as_i64().unwrap();

        // 学生提交文件
        let pdf = pdf_bytes();
        let (content_type, payload) = multipart_body(
            &[("assignment_id", &assignment_id.to_string())],
            Some(("lab report.pdf", &pdf)),
        );
        let req = test::TestRequest::post()
            .uri("/api/submissions")
            .insert_header(bearer(&student_token))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let submission_id = body["submission"]["id"].as_i64().unwrap();
        assert_eq!(body["submission"]["is_late"], false);

        // 学生视角的作业列表带有提交状态
        let req = test::TestRequest::get()
            .uri(&format!("/api/assignments/{subject_id}"))
            .insert_header(bearer(&student_token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["submitted"], true);

        // 教师查看并下载
        let req = test::TestRequest::get()
            .uri(&format!("/api/assignments/{assignment_id}/submissions"))
            .insert_header(bearer(&teacher_token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));

        let req = test::TestRequest::get()
            .uri(&format!("/api/download/{submission_id}"))
            .insert_header(bearer(&teacher_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.starts_with("attachment"));
        let bytes = test::read_body(resp).await;
        assert_eq!(bytes.as_ref(), pdf.as_slice());

        // 评分
        let req = test::TestRequest::put()
            .uri(&format!("/api/submissions/{submission_id}/grade"))
            .insert_header(bearer(&teacher_token))
            .set_json(json!({"grade": "A", "feedback": "Good"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/my-submissions")
            .insert_header(bearer(&student_token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["grade"], "A");

        // 考勤
        let req = test::TestRequest::post()
            .uri("/api/attendance/mark")
            .insert_header(bearer(&teacher_token))
            .set_json(json!({
                "subject_id": subject_id,
                "date": "2025-03-03",
                "attendance_records": [
                    {"student_id": student_id, "status": "PRESENT"},
                    {"student_id": 9999, "status": "PRESENT"}
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["records_marked"], 1);
        assert_eq!(body["errors"][0], "Student 9999 not found");

        let req = test::TestRequest::get()
            .uri(&format!("/api/my-attendance?subject_id={subject_id}"))
            .insert_header(bearer(&student_token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["stats"]["present"], 1);

        let req = test::TestRequest::get()
            .uri(&format!("/api/attendance/{subject_id}?start_date=2025-03-01"))
            .insert_header(bearer(&teacher_token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["attendance"][0]["present"], 1);

        let req = test::TestRequest::get()
            .uri("/api/students")
            .insert_header(bearer(&teacher_token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["email"], "s@example.com");

        // 删除科目
        let req = test::TestRequest::delete()
            .uri(&format!("/api/subjects/{subject_id}"))
            .insert_header(bearer(&teacher_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
