//! Client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Cannot reach the SafePills API at {0}")]
    Connection(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response body: {0}")]
    ResponseParsing(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
