use std::fmt;

#[derive(Debug)]
pub enum Error {
    Auth(String),
    Transport(String),
    Api(String),
    InvalidInput(String),
    Other(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Auth(msg) => write!(f, "Authentication error: {msg}"),
            Error::Transport(msg) => write!(f, "Transport error: {msg}"),
            Error::Api(msg) => write!(f, "API error: {msg}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}
