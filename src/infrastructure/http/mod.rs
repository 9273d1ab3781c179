//! HTTP Layer - 请求路由
//!
//! 每个请求只调用一个协作方，处理函数之间不共享可变状态

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

#[cfg(test)]
mod test_support;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{build_router, HttpServer, ServerConfig};
pub use state::{AppState, TranscriptionDefaults};
