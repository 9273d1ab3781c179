//! 应用层 - 协作方端口
//!
//! 包含：
//! - ports: 六边形架构出站端口（媒体生成、用户登记、转写、语音）
//! - error: 协作方错误定义

pub mod error;
pub mod ports;

pub use error::CollaboratorError;

pub use ports::{
    // Media generation
    MediaGenerationPort,
    MusicRequest,
    // User registry
    UserRegistryPort,
    // Transcription
    LocalMediaJob,
    SubtitleJob,
    TranscriptionPort,
    // Speech
    SpeechPort,
    VoiceCloneRequest,
    VoiceSample,
};
