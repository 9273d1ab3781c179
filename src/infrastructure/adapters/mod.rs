//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod helpers;
mod multipart;
pub mod speech;
pub mod storage;

pub use helpers::*;
pub use speech::*;
pub use storage::*;
