//! Helper Adapter - 媒体生成、用户登记、转写 helper 服务客户端

mod http_helper_client;

pub use http_helper_client::*;
