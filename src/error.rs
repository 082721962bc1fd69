// Error types for spc2wav
//
// Every failure is fatal to the conversion. `ConvertError::kind` groups the
// variants into the four classes the CLI reports on.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("error opening {path}: {source}")]
    InputFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bad SPC metadata: {0}")]
    Metadata(String),

    #[error("invalid argument: {0}")]
    Argument(String),

    #[error("stream too long: {0}")]
    StreamTooLong(String),

    #[error("out of memory allocating {0}")]
    Allocation(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("emulator error: {0}")]
    Emulator(String),
}

/// Coarse classification used for diagnostics and exit handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Argument,
    Resource,
    Io,
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::InputFile { .. } => ErrorKind::Input,
            ConvertError::Metadata(_) => ErrorKind::Input,
            ConvertError::Emulator(_) => ErrorKind::Input,
            ConvertError::StreamTooLong(_) => ErrorKind::Input,
            ConvertError::Argument(_) => ErrorKind::Argument,
            ConvertError::Allocation(_) => ErrorKind::Resource,
            ConvertError::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
