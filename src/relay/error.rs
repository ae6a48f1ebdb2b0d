use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure raised by one stage of a relay test. Every variant is caught by the
/// runner and folded into a [`ProfileOutcome`](crate::relay::ProfileOutcome);
/// none of them aborts the run.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{host}:{port} is not reachable")]
    Unreachable { host: String, port: u16 },
    #[error("connection to {host}:{port} failed: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: BoxError,
    },
    #[error("authentication as {username} failed: {source}")]
    Auth {
        username: String,
        #[source]
        source: BoxError,
    },
    #[error("message submission failed: {source}")]
    Send {
        #[source]
        source: BoxError,
    },
    #[error("message could not be built: {0}")]
    Message(String),
}

impl RelayError {
    pub fn unreachable(host: &str, port: u16) -> Self {
        Self::Unreachable {
            host: host.to_string(),
            port,
        }
    }

    pub fn connection(host: &str, port: u16, source: impl Into<BoxError>) -> Self {
        Self::Connection {
            host: host.to_string(),
            port,
            source: source.into(),
        }
    }

    pub fn auth(username: &str, source: impl Into<BoxError>) -> Self {
        Self::Auth {
            username: username.to_string(),
            source: source.into(),
        }
    }

    pub fn send(source: impl Into<BoxError>) -> Self {
        Self::Send {
            source: source.into(),
        }
    }

    pub fn message<T: std::fmt::Display>(err: T) -> Self {
        Self::Message(err.to_string())
    }
}
