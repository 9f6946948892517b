use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};

use crate::errors::ClassroomError;
use crate::models::users::entities::User;

/// 当前登录用户，由 RequireJWT 中间件写入请求扩展
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ClassroomError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<User>()
                .cloned()
                .map(CurrentUser)
                .ok_or_else(|| ClassroomError::authentication("Token is missing!")),
        )
    }
}
