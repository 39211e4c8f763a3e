use std::fmt;
use std::path::PathBuf;

/// Coarse classification of a conversion failure.
///
/// Callers branch on this instead of matching every [`Error`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Opening an input or writing the destination failed.
    Io,
    /// An Avro container, or a bytes `Body` inside it, could not be decoded.
    Decode,
    /// The output collection could not be encoded as JSON.
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Io => "io-error",
            ErrorKind::Decode => "decode-error",
            ErrorKind::Serialization => "serialization-error",
        })
    }
}

/// Errors that can occur while converting Avro files to JSON.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode Avro container {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: apache_avro::Error,
    },
    #[error("record {index} of {}: {source}", path.display())]
    BodyEncoding {
        path: PathBuf,
        index: usize,
        #[source]
        source: crate::body::BodyError,
    },
    #[error("failed to serialize JSON output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Open { .. } | Error::Write { .. } => ErrorKind::Io,
            Error::Decode { .. } | Error::BodyEncoding { .. } => ErrorKind::Decode,
            Error::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
