use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can abort a conversion run.
#[derive(Debug)]
pub enum ConvertError {
    /// Input could not be read, or output could not be created, written or renamed.
    Io { path: PathBuf, source: io::Error },
    /// Input is not valid JSON, or its top level is not an object.
    Parse { path: PathBuf, source: serde_json::Error },
    /// A room record does not have the expected shape.
    Schema { room: String, message: String },
}

impl ConvertError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        ConvertError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(path: &Path, source: serde_json::Error) -> Self {
        ConvertError::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn schema(room: &str, message: impl Into<String>) -> Self {
        ConvertError::Schema {
            room: room.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Io { path, source } => {
                write!(f, "I/O error on {}: {source}", path.display())
            }
            ConvertError::Parse { path, source } => {
                write!(f, "Failed to parse {}: {source}", path.display())
            }
            ConvertError::Schema { room, message } => {
                write!(f, "Invalid record for room {room:?}: {message}")
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io { source, .. } => Some(source),
            ConvertError::Parse { source, .. } => Some(source),
            ConvertError::Schema { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn io_error_names_path() {
        let err = ConvertError::io(
            Path::new("missing.json"),
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert_eq!(err.to_string(), "I/O error on missing.json: file not found");
        assert!(err.source().is_some());
    }

    #[test]
    fn parse_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ConvertError::parse(Path::new("broken.json"), source);
        assert!(err.to_string().starts_with("Failed to parse broken.json: "));
        assert!(err.source().is_some());
    }

    #[test]
    fn schema_error_names_room() {
        let err = ConvertError::schema("101", "missing field `floor`");
        assert_eq!(
            err.to_string(),
            "Invalid record for room \"101\": missing field `floor`"
        );
        assert!(err.source().is_none());
    }
}
