use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: Option<String>,
}
