//! Classroom - 课堂管理平台后端服务
//!
//! 教师创建教室、发布作业并批改提交；学生加入教室、提交作业并查看成绩和评论。
//!
//! # 架构
//! - `cache`: 会话缓存（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、角色和速率限制中间件
//! - `models`: 数据模型定义
//! - `object_store`: 对象存储（本地目录/内存）
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod object_store;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod test_support;
