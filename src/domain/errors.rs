//! Domain Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unsupported subtitle type: {0} (expected vtt or srt)")]
    UnsupportedSubtitleFormat(String),

    #[error("Language code cannot be empty")]
    EmptyLanguageCode,

    #[error("Invalid language code: {0}")]
    InvalidLanguageCode(String),

    #[error("Voice id cannot be empty")]
    EmptyVoiceId,

    #[error("Invalid voice id: {0}")]
    InvalidVoiceId(String),
}
