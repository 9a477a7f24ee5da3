use tracing::warn;

use crate::message::{MessageKind, Status};

/// Everything that can go wrong between a request and its reply.
///
/// Errors are surfaced unchanged; the engine never retries. `Malformed` and
/// transport failures are fatal: the session closes and every pending waiter
/// observes [`Error::ConnectionClosed`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The session is gone; pending and future requests all fail with this.
    #[error("sftp session closed")]
    ConnectionClosed,

    /// The server did not answer `INIT` within the handshake deadline.
    #[error("no response within the handshake deadline")]
    MissingResponse,

    /// The server offered a protocol version older than 3.
    #[error("unsupported sftp version {0}")]
    UnsupportedVersion(u32),

    /// A reply arrived whose shape does not match the request.
    #[error("unexpected {actual:?} response, expected {expected}")]
    InvalidResponse {
        expected: &'static str,
        actual: MessageKind,
    },

    /// A well-formed `STATUS` reply with a non-OK code.
    #[error(transparent)]
    Status(#[from] Status),

    /// A handle-scoped operation was issued after `close()`.
    #[error("file handle was already closed")]
    FileHandleInvalid,

    /// The peer sent bytes that do not decode as an SFTP v3 packet.
    #[error("malformed packet: {0}")]
    Malformed(&'static str),

    /// Transport-level failure on the underlying byte channel.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure while establishing the subsystem channel.
    #[error("ssh error: {0}")]
    Ssh(#[from] russh::Error),
}

impl Error {
    /// A protocol error: the reply exists but has the wrong shape.
    pub(crate) fn unexpected(expected: &'static str, actual: MessageKind) -> Self {
        warn!(?actual, expected, "response shape mismatch");
        Error::InvalidResponse { expected, actual }
    }
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Io(err) => err,
            Error::Status(status) => status.into(),
            err @ Error::ConnectionClosed => {
                Self::new(std::io::ErrorKind::ConnectionAborted, err)
            }
            err @ Error::MissingResponse => Self::new(std::io::ErrorKind::TimedOut, err),
            err @ Error::Malformed(_) => Self::new(std::io::ErrorKind::InvalidData, err),
            err => Self::new(std::io::ErrorKind::Other, err),
        }
    }
}
