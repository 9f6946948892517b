//! ClassFlow - 课堂管理后端服务
//!
//! 基于 Actix Web 构建，教师管理科目、作业与考勤，学生提交作业并查看成绩。
//!
//! # 架构
//! - `access`: 角色与归属校验
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）与上传文件存储
//! - `utils`: 工具函数

pub mod access;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod testing;
