use super::AuthService;
use crate::errors::{ClassroomError, Result};
use crate::models::{auth::responses::UserResponse, users::entities::User};

pub async fn handle_me(service: &AuthService, current_user: &User) -> Result<UserResponse> {
    let user = service
        .storage()
        .get_user_by_id(current_user.id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("User not found!"))?;

    Ok(UserResponse { user })
}
