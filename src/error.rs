//! Error types.
//!
//! [`Error`] covers infrastructure failures (binding a port, socket I/O).
//! [`StorageError`] is what a [`TodoStore`](crate::TodoStore) reports.
//! [`ApiError`] is what a todo operation reports; it converts straight into
//! the JSON error response the client sees.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tracing::error;

use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// Server-level failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// The backing store could not be read or written.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed todo file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize todos: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Failure of a single todo operation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Todo text is required")]
    Validation,

    #[error("Todo not found")]
    NotFound,

    #[error("Invalid JSON body")]
    InvalidJson(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("no todo ids left above the current maximum")]
    IdsExhausted,

    #[error("store task failed: {0}")]
    Task(#[source] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            Self::Validation | Self::InvalidJson(_) => Status::BadRequest,
            Self::NotFound => Status::NotFound,
            Self::Storage(_) | Self::IdsExhausted | Self::Task(_) => Status::InternalServerError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            // Server-side details stay in the log, not in the response.
            Self::Storage(_) | Self::IdsExhausted | Self::Task(_) => {
                error!("todo operation failed: {self}");
                Response::error(self.status(), "Internal server error")
            }
            _ => Response::error(self.status(), &self.to_string()),
        }
    }
}
