//! Domain Layer - 领域层
//!
//! 路由层只拥有请求参数的值对象，不持有任何实体

mod errors;
mod value_objects;

pub use errors::DomainError;
pub use value_objects::{LanguageCode, SubtitleFormat, UserContact, VoiceId};
