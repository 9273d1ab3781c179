//! mediahub - 媒体生成与转写 API 网关
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - 请求参数值对象（字幕格式、语言代码、用户联系信息）
//!
//! 应用层 (application/):
//! - Ports: 媒体生成、用户登记、转写、语音四个协作方端口
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 路由、字段提取、统一错误响应、静态文件
//! - Adapters: Helper 服务客户端、ElevenLabs 客户端、上传临时文件
//! - Telemetry: 控制台 + 文件日志

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
