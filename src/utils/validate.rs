use crate::errors::ClassroomError;

/// 成绩最大长度
pub const MAX_GRADE_LEN: usize = 10;

pub fn validate_grade(grade: &str) -> Result<(), &'static str> {
    if grade.chars().count() > MAX_GRADE_LEN {
        return Err("Grade must be at most 10 characters!");
    }
    Ok(())
}

/// 必填字段，缺失或空白时返回 "{field} is required!"
pub fn required_field(value: Option<String>, field: &str) -> Result<String, ClassroomError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ClassroomError::validation(format!("{field} is required!"))),
    }
}

/// 解析表单中的整数 ID
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// 取出考勤记录中的学生 ID，接受整数或数字字符串，0 与空值视为缺失
pub fn record_student_id(value: Option<&serde_json::Value>) -> Option<i64> {
    let id = match value? {
        serde_json::Value::Number(n) => n.as_i64()?,
        serde_json::Value::String(s) => parse_id(s)?,
        _ => return None,
    };
    (id != 0).then_some(id)
}
