//! multipart 表单读取

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures_util::TryStreamExt;

use crate::errors::{ClassroomError, Result};
use crate::models::submissions::requests::UploadedFile;

// 普通文本字段的大小上限
const MAX_TEXT_FIELD_SIZE: usize = 64 * 1024;

/// 解析后的表单
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

/// 读取整个 multipart 表单
///
/// 名为 `file_field` 且带文件名的字段作为上传文件读取，只保留第一个；
/// 其余带文件名的字段被丢弃，普通字段按文本读取。请求不是 multipart 时返回空表单，由调用方给出缺字段提示。
pub async fn read_multipart(
    mut payload: Multipart,
    file_field: Option<&str>,
    max_file_size: usize,
) -> Result<MultipartForm> {
    let mut form = MultipartForm::default();
    let mut seen_any = false;

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if !seen_any => {
                tracing::debug!("Multipart 解析失败，按空表单处理: {e}");
                break;
            }
            Err(e) => {
                return Err(ClassroomError::validation(format!(
                    "Invalid multipart form: {e}"
                )));
            }
        };
        seen_any = true;

        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let file_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());

        match file_name {
            Some(file_name) if file_field == Some(name.as_str()) && form.file.is_none() => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.try_next().await.map_err(|e| {
                    ClassroomError::validation(format!("Failed to read uploaded file: {e}"))
                })? {
                    if bytes.len() + chunk.len() > max_file_size {
                        return Err(ClassroomError::validation(format!(
                            "File too large! Maximum size is {max_file_size} bytes"
                        )));
                    }
                    bytes.extend_from_slice(&chunk);
                }
                form.file = Some(UploadedFile { file_name, bytes });
            }
            Some(_) => {
                // 多余的文件字段直接丢弃
                while field
                    .try_next()
                    .await
                    .map_err(|e| ClassroomError::validation(format!("Invalid multipart form: {e}")))?
                    .is_some()
                {}
            }
            None => {
                let mut value = Vec::new();
                while let Some(chunk) = field.try_next().await.map_err(|e| {
                    ClassroomError::validation(format!("Invalid multipart form: {e}"))
                })? {
                    if value.len() + chunk.len() > MAX_TEXT_FIELD_SIZE {
                        return Err(ClassroomError::validation(format!(
                            "Form field '{name}' is too large!"
                        )));
                    }
                    value.extend_from_slice(&chunk);
                }
                form.fields
                    .insert(name, String::from_utf8_lossy(&value).into_owned());
            }
        }
    }

    Ok(form)
}
