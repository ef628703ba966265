use matchdeck::MatchdeckError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputParseError {
    #[error("Unknown command '{0}', type 'help' for the list")]
    UnknownCommand(String),

    #[error("Usage: swipe <start-x> <end-x>")]
    SwipeUsage,

    #[error("Invalid coordinate '{0}'")]
    InvalidCoordinate(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("A username is required, pass it with --user")]
    UserRequired,

    #[error("Could not read photo {0}: {1}")]
    PhotoReadError(String, io::Error),

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    MatchdeckError(#[from] MatchdeckError),

    #[error(transparent)]
    InputParseError(#[from] InputParseError),
}
