use std::io;
use std::path::PathBuf;

use crate::certificate::Status;

/// The csutils error type.
#[derive(Debug, thiserror::Error)]
pub enum CSError {
    #[error("Internal error: [{0}]")]
    InternalError(String),

    #[error("Parse error")]
    ParseError,

    #[error("I/O error")]
    IOError(#[from] io::Error),

    #[error("Unable to open [{}]: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Certificate library error: {0}")]
    CertificateError(Status),

    #[error("DER error: {0}")]
    DerError(#[from] x509_cert::der::Error),

    #[error("UNIX error: {0}")]
    UnixError(#[source] io::Error),

    #[error("Unable to allocate copy state")]
    ResourceAllocation,

    #[error("Invalid argument")]
    InvalidArgument,

    #[error("Usage error: {0}")]
    UsageError(&'static str),
}
