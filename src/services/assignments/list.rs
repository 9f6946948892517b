use std::collections::HashMap;

use super::AssignmentService;
use crate::access::{self, Actor};
use crate::errors::Result;
use crate::models::{
    assignments::responses::{
        AssignmentListResponse, AssignmentResponse, StudentAssignmentResponse,
    },
    submissions::{entities::SubmissionFilter, responses::SubmissionResponse},
};

pub async fn list_assignments(
    service: &AssignmentService,
    actor: &Actor,
    subject_id: i64,
) -> Result<AssignmentListResponse> {
    let storage = service.storage();

    match actor {
        Actor::Teacher(teacher) => {
            let subject = access::owned_subject(storage, teacher, subject_id).await?;
            let assignments = storage.list_assignments_by_subject(subject.id).await?;
            Ok(AssignmentListResponse::Teacher(
                assignments.into_iter().map(AssignmentResponse::from).collect(),
            ))
        }
        // 学生可查看任意科目的作业，附带本人提交情况
        Actor::Student(student) => {
            let assignments = storage.list_assignments_by_subject(subject_id).await?;
            let mut mine: HashMap<i64, SubmissionResponse> = storage
                .list_submissions(SubmissionFilter {
                    student_id: Some(student.id),
                    ..Default::default()
                })
                .await?
                .into_iter()
                .map(|detail| (detail.submission.assignment_id, detail.into()))
                .collect();

            Ok(AssignmentListResponse::Student(
                assignments
                    .into_iter()
                    .map(|detail| {
                        let my_submission = mine.remove(&detail.assignment.id);
                        StudentAssignmentResponse {
                            assignment: detail.into(),
                            submitted: my_submission.is_some(),
                            my_submission,
                        }
                    })
                    .collect(),
            ))
        }
    }
}
