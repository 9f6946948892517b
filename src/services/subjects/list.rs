use super::SubjectService;
use crate::access::Actor;
use crate::errors::Result;
use crate::models::subjects::responses::SubjectResponse;

pub async fn list_subjects(service: &SubjectService, actor: &Actor) -> Result<Vec<SubjectResponse>> {
    let teacher_id = match actor {
        Actor::Teacher(teacher) => Some(teacher.id),
        // 学生可以查看所有科目
        Actor::Student(_) => None,
    };

    let subjects = service.storage().list_subjects(teacher_id).await?;
    Ok(subjects.into_iter().map(SubjectResponse::from).collect())
}
