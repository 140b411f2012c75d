use crate::error::Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DynectError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("session not established, login first")]
    NotAuthenticated,
}

pub fn map_error(e: DynectError) -> Error {
    use DynectError::*;
    match e {
        Auth(msg) => Error::Auth(msg),
        Transport(err) => Error::Transport(err.to_string()),
        Api(msg) => Error::Api(msg),
        Decode(err) => Error::Api(err.to_string()),
        NotAuthenticated => Error::Auth("session not established".to_string()),
    }
}
