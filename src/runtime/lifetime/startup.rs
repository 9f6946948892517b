use crate::config::AppConfig;
use crate::errors::Result;
use crate::middlewares::AuthRateLimits;
use crate::services::AppServices;
use crate::storage::{FileStore, LocalFileStore, Storage, create_storage};
use crate::utils::TokenService;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub tokens: TokenService,
    pub services: AppServices,
    pub rate_limits: AuthRateLimits,
}

/// 准备服务器启动的上下文
/// 包括存储、上传目录、令牌服务与业务服务
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let storage = create_storage(&config.database).await?;
    warn!("Storage backend initialized and migrations completed");

    let file_store = LocalFileStore::new(&config.upload.dir).await?;
    warn!("Upload directory ready: {}", file_store.root().display());

    let tokens = TokenService::from_config(&config.jwt);
    debug!("Token lifetime: {} minutes", tokens.ttl().num_minutes());

    let services = AppServices::new(
        storage.clone(),
        Arc::new(file_store) as Arc<dyn FileStore>,
        tokens.clone(),
        config.upload.clone(),
        config.argon2.clone(),
    );

    // 在 worker 之间共享计数
    let rate_limits = AuthRateLimits::from_config(&config.rate_limit);

    Ok(StartupContext {
        storage,
        tokens,
        services,
        rate_limits,
    })
}
