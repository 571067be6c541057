use std::fmt;
use std::io;

#[derive(Debug)]
pub enum AuditError {
    /// Node.js sidecar failed to spawn (browser_server.js)
    SubprocessSpawn { script: String, source: io::Error },

    /// Reading/writing the sidecar's stdin/stdout failed
    SessionIo(String),

    /// Sidecar answered a command with ok=false or a malformed payload
    SessionProtocol { command: String, error: String },

    /// JSON parsing failed (sidecar output or model response)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (sidecar command or model request)
    JsonSerialize { context: String, source: serde_json::Error },

    /// HTTP call to a model endpoint failed
    Http { context: String, source: reqwest::Error },

    /// Screenshot decode/encode failed
    Image { context: String, source: image::ImageError },

    /// CSV report could not be written
    Csv(csv::Error),

    /// SQLite report could not be written
    Sqlite(rusqlite::Error),

    /// Filesystem operation failed
    Io { context: String, source: io::Error },

    /// Required data missing from a pipeline stage
    MissingData(String),
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditError::SubprocessSpawn { script, source } => {
                write!(f, "Failed to spawn {} (is Node.js installed?): {}", script, source)
            }
            AuditError::SessionIo(msg) => {
                write!(f, "Browser session I/O error: {}", msg)
            }
            AuditError::SessionProtocol { command, error } => {
                write!(f, "Browser command '{}' failed: {}", command, error)
            }
            AuditError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            AuditError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            AuditError::Http { context, source } => {
                write!(f, "HTTP error ({}): {}", context, source)
            }
            AuditError::Image { context, source } => {
                write!(f, "Image error ({}): {}", context, source)
            }
            AuditError::Csv(source) => {
                write!(f, "CSV write error: {}", source)
            }
            AuditError::Sqlite(source) => {
                write!(f, "SQLite write error: {}", source)
            }
            AuditError::Io { context, source } => {
                write!(f, "I/O error ({}): {}", context, source)
            }
            AuditError::MissingData(msg) => {
                write!(f, "Missing data: {}", msg)
            }
        }
    }
}

impl std::error::Error for AuditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuditError::SubprocessSpawn { source, .. } => Some(source),
            AuditError::JsonParse { source, .. } => Some(source),
            AuditError::JsonSerialize { source, .. } => Some(source),
            AuditError::Http { source, .. } => Some(source),
            AuditError::Image { source, .. } => Some(source),
            AuditError::Csv(source) => Some(source),
            AuditError::Sqlite(source) => Some(source),
            AuditError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<csv::Error> for AuditError {
    fn from(e: csv::Error) -> Self {
        AuditError::Csv(e)
    }
}

impl From<rusqlite::Error> for AuditError {
    fn from(e: rusqlite::Error) -> Self {
        AuditError::Sqlite(e)
    }
}
