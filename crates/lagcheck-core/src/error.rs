use std::fmt::{Display, Formatter};
use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// A lagcheck error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A lagcheck error.
#[derive(Error, Debug)]
pub enum Error {
    /// Raw socket access was denied by the operating system.
    ///
    /// Recoverable by rerunning with elevated privileges.
    #[error("raw socket access denied, rerun with elevated privileges")]
    PermissionDenied,
    /// The target host could not be resolved to an address.
    #[error("failed to resolve target: {0}")]
    AddressUnresolvable(String),
    /// No samples were available for simulation.
    #[error("insufficient samples")]
    InsufficientSamples,
    #[error("invalid packet: {0}")]
    PacketError(#[from] lagcheck_packet::error::Error),
    #[error("invalid config: {0}")]
    BadConfig(String),
    #[error("IO error: {0}")]
    IoError(#[from] IoError),
    #[error("lagcheck error: {0}")]
    Other(String),
}

/// Custom IO error result.
pub type IoResult<T> = std::result::Result<T, IoError>;

/// Custom IO error.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("Sendto error for {1}: {0}")]
    SendTo(io::Error, SocketAddr),
    #[error("Failed to {1}: {0}")]
    Other(io::Error, IoOperation),
}

impl IoError {
    /// Get the custom error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SendTo(e, _) | Self::Other(e, _) => ErrorKind::from(e),
        }
    }
}

/// Custom error kind.
#[derive(Debug, Eq, PartialEq)]
pub enum ErrorKind {
    PermissionDenied,
    Std(io::ErrorKind),
}

impl From<&io::Error> for ErrorKind {
    fn from(value: &io::Error) -> Self {
        if matches!(value.kind(), io::ErrorKind::PermissionDenied) {
            Self::PermissionDenied
        } else {
            Self::Std(value.kind())
        }
    }
}

/// Io operation.
#[derive(Debug)]
pub enum IoOperation {
    NewSocket,
    SetNonBlocking,
    Select,
    Read,
}

impl Display for IoOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewSocket => write!(f, "create new socket"),
            Self::SetNonBlocking => write!(f, "set non-blocking"),
            Self::Select => write!(f, "select"),
            Self::Read => write!(f, "read"),
        }
    }
}
