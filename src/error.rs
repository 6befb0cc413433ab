use std::fmt;
use std::io;

/// Everything that can go wrong while encoding, decoding, or decrypting
/// an NPF container.
///
/// Callers must match on the variant: `Authentication` is the path a
/// viewer turns into a password re-prompt, `NotAnNpfFile` the path it
/// turns into "display as a regular image".
#[derive(Debug)]
pub enum NpfError {
    /// The magic header is absent; the input is not an NPF container.
    NotAnNpfFile,
    /// A declared length runs past the end of the buffer, or a fixed-size
    /// region is missing.
    Truncated,
    /// The metadata block is not a valid JSON string map.
    MalformedMetadata(serde_json::Error),
    /// Tag verification failed: wrong password or tampered data. The two
    /// are deliberately indistinguishable.
    Authentication,
    /// Underlying read/write failure.
    Io(io::Error),
}

impl fmt::Display for NpfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NpfError::NotAnNpfFile => write!(f, "not an NPF container"),
            NpfError::Truncated => write!(f, "container is truncated or structurally invalid"),
            NpfError::MalformedMetadata(e) => write!(f, "malformed metadata block: {e}"),
            NpfError::Authentication => write!(f, "incorrect password or corrupted file"),
            NpfError::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for NpfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NpfError::MalformedMetadata(e) => Some(e),
            NpfError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for NpfError {
    fn from(e: io::Error) -> Self {
        NpfError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_message_does_not_leak_cause() {
        let msg = NpfError::Authentication.to_string();
        assert!(msg.contains("incorrect password or corrupted file"));
    }

    #[test]
    fn io_error_converts() {
        let err: NpfError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, NpfError::Io(_)));
    }
}
