//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现，以及 HTTP 与日志

pub mod adapters;
pub mod http;
pub mod telemetry;

pub use telemetry::{init_telemetry, LogGuard};
