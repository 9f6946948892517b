pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod subjects;
pub mod submissions;
pub mod users;

use std::sync::Arc;

use actix_web::web;

use crate::config::{Argon2Config, UploadConfig};
use crate::storage::{FileStore, Storage};
use crate::utils::TokenService;

pub use assignments::AssignmentService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use subjects::SubjectService;
pub use submissions::SubmissionService;
pub use users::UserService;

/// 所有业务服务，启动时构建一次，各 worker 共享
#[derive(Clone)]
pub struct AppServices {
    pub auth: web::Data<AuthService>,
    pub subjects: web::Data<SubjectService>,
    pub assignments: web::Data<AssignmentService>,
    pub submissions: web::Data<SubmissionService>,
    pub attendance: web::Data<AttendanceService>,
    pub users: web::Data<UserService>,
}

impl AppServices {
    pub fn new(
        storage: Arc<dyn Storage>,
        files: Arc<dyn FileStore>,
        tokens: TokenService,
        upload: UploadConfig,
        argon2: Argon2Config,
    ) -> Self {
        Self {
            auth: web::Data::new(AuthService::new(storage.clone(), tokens, argon2)),
            subjects: web::Data::new(SubjectService::new(storage.clone(), files.clone())),
            assignments: web::Data::new(AssignmentService::new(storage.clone())),
            submissions: web::Data::new(SubmissionService::new(storage.clone(), files, upload)),
            attendance: web::Data::new(AttendanceService::new(storage.clone())),
            users: web::Data::new(UserService::new(storage)),
        }
    }

    /// 注册到 actix 的 app_data
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.subjects.clone())
            .app_data(self.assignments.clone())
            .app_data(self.submissions.clone())
            .app_data(self.attendance.clone())
            .app_data(self.users.clone());
    }
}
