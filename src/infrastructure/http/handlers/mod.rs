//! HTTP Handlers
//!
//! 每个处理函数：提取字段 → 调用一个协作方 → 包装 JSON 响应

mod generation;
mod ping;
mod speech;
mod transcription;
mod users;

pub use generation::*;
pub use ping::*;
pub use speech::*;
pub use transcription::*;
pub use users::*;
