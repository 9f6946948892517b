use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};

use crate::models::ErrorResponse;

/// JSON 请求体解析失败时返回 400 {"message": ...}
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json!".to_string(),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "Request body is too large!".to_string()
        }
        JsonPayloadError::Deserialize(e) => format!("Invalid JSON body: {e}"),
        _ => format!("Invalid JSON body: {err}"),
    };
    tracing::debug!("JSON 解析失败 {} {}: {}", req.method(), req.path(), err);

    InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorResponse::new(message)))
        .into()
}

/// 查询参数解析失败时返回 400 {"message": ...}
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    let message = format!("Invalid query parameters: {err}");
    tracing::debug!("查询参数解析失败 {} {}: {}", req.method(), req.path(), err);

    InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorResponse::new(message)))
        .into()
}

/// 路径参数无法解析（如非整数 ID）时按资源不存在处理
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    tracing::debug!("路径参数解析失败 {} {}: {}", req.method(), req.path(), err);

    InternalError::from_response(
        err,
        HttpResponse::NotFound().json(ErrorResponse::new("Resource not found")),
    )
    .into()
}
