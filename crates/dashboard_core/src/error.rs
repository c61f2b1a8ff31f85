use shared::error::FrameError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("malformed robot message: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode command frame: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("invalid command frame: {0}")]
    InvalidCommandFrame(#[from] FrameError),
    #[error("invalid robot url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to connect to robot at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("live connection failed: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("not connected to the robot")]
    NotConnected,
    #[error("dispatch queue closed")]
    QueueClosed,
    #[error("feed watcher task failed: {0}")]
    WatcherTask(#[from] tokio::task::JoinError),
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
