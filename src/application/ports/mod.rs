//! Application Ports - 出站端口定义
//!
//! 每个协作方一个 trait，每种能力一个方法。
//! 路由层只依赖这些抽象，具体实现在 infrastructure/adapters 层

mod media_generation;
mod speech;
mod transcription;
mod user_registry;

pub use media_generation::{MediaGenerationPort, MusicRequest};
pub use speech::{SpeechPort, VoiceCloneRequest, VoiceSample};
pub use transcription::{LocalMediaJob, SubtitleJob, TranscriptionPort};
pub use user_registry::UserRegistryPort;
