pub mod login;
pub mod profile;
pub mod register;

use std::sync::Arc;

use crate::config::Argon2Config;
use crate::errors::Result;
use crate::models::{
    auth::{
        requests::{LoginRequest, RegisterRequest},
        responses::{AuthResponse, UserResponse},
    },
    users::entities::User,
};
use crate::storage::Storage;
use crate::utils::TokenService;

pub struct AuthService {
    storage: Arc<dyn Storage>,
    tokens: TokenService,
    argon2: Argon2Config,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>, tokens: TokenService, argon2: Argon2Config) -> Self {
        Self {
            storage,
            tokens,
            argon2,
        }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub(crate) fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub(crate) fn argon2(&self) -> &Argon2Config {
        &self.argon2
    }

    // 用户注册
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse> {
        register::handle_register(self, request).await
    }

    // 登录验证
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        login::handle_login(self, request).await
    }

    // 获取当前用户信息
    pub async fn me(&self, current_user: &User) -> Result<UserResponse> {
        profile::handle_me(self, current_user).await
    }
}
