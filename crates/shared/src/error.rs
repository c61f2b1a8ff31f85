use thiserror::Error;

use crate::{domain::Subsystem, protocol::CommandName};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("command frame is missing `{0}`")]
    MissingField(&'static str),
    #[error("servo index {0} is outside 1..=3")]
    UnknownServo(u8),
    #[error("{subsystem:?} does not accept {command:?}")]
    Unsupported {
        subsystem: Subsystem,
        command: CommandName,
    },
}
