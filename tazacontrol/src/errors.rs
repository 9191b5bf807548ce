use tazasource::SourceError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    #[error("No playable stream for {0}")]
    NoStreamResolvable(String),
    #[error("Cannot load {0}: {1}")]
    PlaybackLoad(String, String),
    #[error("Cannot resume playback: {0}")]
    PlaybackResume(String),
    #[error("Output Error: {0}")]
    Output(String),
    #[error("Track {0} is not in the library")]
    TrackNotFound(String),
    #[error("{0} is not a supported audio file")]
    UnsupportedFile(String),
    #[error("The library is empty")]
    EmptyLibrary,
}

impl ControlError {
    pub fn output(message: impl Into<String>) -> Self {
        ControlError::Output(message.into())
    }

    pub fn playback_load(name: &str, reason: impl Into<String>) -> Self {
        ControlError::PlaybackLoad(name.to_string(), reason.into())
    }
}

impl From<SourceError> for ControlError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NoStreamResolvable(name) => ControlError::NoStreamResolvable(name),
            other => ControlError::Output(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ControlError>;
