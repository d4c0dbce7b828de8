pub type TuneResult<T> = Result<T, TuneError>;

#[derive(thiserror::Error, Debug)]
pub enum TuneError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("unsupported channel layout: {channels} channels (expected 3 or 4)")]
    UnsupportedChannels { channels: u8 },

    #[error("settings error: {0}")]
    Settings(String),

    #[error("backup error: {0}")]
    Backup(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("registry error: {0}")]
    Registry(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TuneError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    pub fn backup(msg: impl Into<String>) -> Self {
        Self::Backup(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }
}
