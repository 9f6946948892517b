//! 测试辅助：内存数据库、种子数据、临时上传目录

use std::sync::Arc;

use chrono::Utc;

use crate::config::{Argon2Config, DatabaseConfig, UploadConfig};
use crate::models::{
    submissions::{entities::Submission, requests::NewSubmission},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use crate::services::AppServices;
use crate::storage::{FileStore, LocalFileStore, Storage, create_storage};
use crate::utils::TokenService;

pub const TEST_PASSWORD: &str = "secret123";

pub async fn memory_storage() -> Arc<dyn Storage> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    create_storage(&config)
        .await
        .expect("in-memory database should start")
}

/// 临时目录下的 SQLite 文件库（WAL 模式、多连接），返回库所在目录以便清理
pub async fn file_storage(pool_size: u32) -> (Arc<dyn Storage>, std::path::PathBuf) {
    let dir = std::env::temp_dir().join(format!("classflow-db-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("temp db dir should be creatable");
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.join("classflow.db").display()),
        pool_size,
        timeout: 10,
    };
    let storage = create_storage(&config)
        .await
        .expect("file database should start");
    (storage, dir)
}

/// 最低强度的 Argon2 参数，只用于测试
pub fn argon2_config() -> Argon2Config {
    Argon2Config {
        memory_cost: 8,
        time_cost: 1,
        parallelism: 1,
    }
}

pub fn token_service() -> TokenService {
    TokenService::new("test-secret", chrono::Duration::minutes(30))
}

pub fn upload_config(dir: &str) -> UploadConfig {
    UploadConfig {
        dir: dir.to_string(),
        max_size: 1024 * 1024,
        allowed_extensions: vec!["pdf".into(), "txt".into(), "png".into(), "docx".into()],
        verify_magic_bytes: true,
    }
}

/// 系统临时目录下的独立上传目录
pub async fn temp_file_store() -> Arc<LocalFileStore> {
    let dir = std::env::temp_dir().join(format!("classflow-test-{}", uuid::Uuid::new_v4()));
    Arc::new(
        LocalFileStore::new(dir)
            .await
            .expect("temp upload dir should be creatable"),
    )
}

pub async fn seed_user(storage: &Arc<dyn Storage>, email: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            email: email.to_string(),
            password_hash: crate::utils::password::hash_password(TEST_PASSWORD, &argon2_config())
                .expect("hashing should succeed"),
            role,
        })
        .await
        .expect("seed user")
}

pub async fn seed_teacher(storage: &Arc<dyn Storage>, email: &str) -> User {
    seed_user(storage, email, UserRole::Teacher).await
}

pub async fn seed_student(storage: &Arc<dyn Storage>, email: &str) -> User {
    seed_user(storage, email, UserRole::Student).await
}

pub async fn seed_submission(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
    student_id: i64,
) -> Submission {
    storage
        .create_submission(NewSubmission {
            assignment_id,
            student_id,
            file_path: format!("{student_id}_{assignment_id}_0_report.pdf"),
            file_name: "report.pdf".to_string(),
            submitted_at: Utc::now(),
        })
        .await
        .expect("seed submission")
}

/// 完整的测试上下文
pub struct TestContext {
    pub storage: Arc<dyn Storage>,
    pub file_store: Arc<LocalFileStore>,
    pub tokens: TokenService,
    pub services: AppServices,
}

pub async fn test_context() -> TestContext {
    let storage = memory_storage().await;
    let file_store = temp_file_store().await;
    let tokens = token_service();
    let upload = upload_config(&file_store.root().to_string_lossy());
    let services = AppServices::new(
        storage.clone(),
        file_store.clone() as Arc<dyn FileStore>,
        tokens.clone(),
        upload,
        argon2_config(),
    );
    TestContext {
        storage,
        file_store,
        tokens,
        services,
    }
}

/// 最小的合法 PDF 内容
pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n%test\n".to_vec()
}
