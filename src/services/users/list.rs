use super::UserService;
use crate::access;
use crate::errors::Result;
use crate::models::users::entities::User;

pub async fn list_students(service: &UserService, current_user: &User) -> Result<Vec<User>> {
    access::require_teacher(current_user)?;
    service.storage().list_active_students().await
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use crate::testing::{seed_student, seed_teacher, test_context};

    #[tokio::test]
    async fn test_only_active_students() {
        let ctx = test_context().await;
        let teacher = seed_teacher(&ctx.storage, "t@example.com").await;
        let active = seed_student(&ctx.storage, "a@example.com").await;
        let inactive = seed_student(&ctx.storage, "i@example.com").await;
        ctx.storage.set_user_active(inactive.id, false).await.unwrap();

        let students = ctx.services.users.list_students(&teacher).await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, active.id);

        let err = ctx.services.users.list_students(&active).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
