// EstateHub - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// One enum per subsystem, folded into `EstateError` at the top.
// Every variant here is recoverable: callers surface it as a notice
// and carry on with the previous state.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all EstateHub operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum EstateError {
    /// Login, registration, or session persistence failed.
    Session(SessionError),

    /// An entity lookup by id missed.
    Lookup(LookupError),

    /// A contact request was refused.
    Contact(ContactError),

    /// User-supplied filter criteria could not be parsed.
    Filter(FilterError),

    /// A call to the marketplace backend failed.
    Api(ApiError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for EstateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(e) => write!(f, "Session error: {e}"),
            Self::Lookup(e) => write!(f, "{e}"),
            Self::Contact(e) => write!(f, "Contact request not sent: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Api(e) => write!(f, "Network error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for EstateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Session(e) => Some(e),
            Self::Lookup(e) => Some(e),
            Self::Contact(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Api(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

/// Errors from the mock session store.
#[derive(Debug)]
pub enum SessionError {
    /// No user with this email, or an empty password.
    InvalidCredentials { email: String },

    /// Registration attempted with an email that is already taken.
    DuplicateEmail { email: String },

    /// A required registration field was blank.
    MissingField { field: &'static str },

    /// The active session could not be written to or removed from disk.
    Persist { path: PathBuf, source: io::Error },

    /// The active session could not be serialised.
    Serialise { source: serde_json::Error },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials { email } => {
                write!(f, "Invalid email or password for '{email}'")
            }
            Self::DuplicateEmail { email } => {
                write!(f, "Email address '{email}' is already in use")
            }
            Self::MissingField { field } => write!(f, "The {field} field is required"),
            Self::Persist { path, source } => {
                write!(f, "Cannot persist session '{}': {source}", path.display())
            }
            Self::Serialise { source } => write!(f, "Cannot serialise session: {source}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Persist { source, .. } => Some(source),
            Self::Serialise { source } => Some(source),
            _ => None,
        }
    }
}

impl From<SessionError> for EstateError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

// ---------------------------------------------------------------------------
// Lookup errors
// ---------------------------------------------------------------------------

/// Entity lookup misses. Callers degrade to a "not found" view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    NotFound { kind: &'static str, id: String },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "No {kind} with id '{id}'"),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<LookupError> for EstateError {
    fn from(e: LookupError) -> Self {
        Self::Lookup(e)
    }
}

// ---------------------------------------------------------------------------
// Contact request errors
// ---------------------------------------------------------------------------

/// Reasons a buyer's contact request is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// Nobody is logged in.
    LoginRequired,

    /// Only buyers can contact sellers.
    BuyerRequired { role: String },

    /// The message was blank.
    MessageRequired,

    /// The property does not exist.
    Lookup(LookupError),
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoginRequired => write!(f, "Please log in to contact the seller"),
            Self::BuyerRequired { role } => {
                write!(f, "Only buyers can send contact requests (logged in as {role})")
            }
            Self::MessageRequired => write!(f, "Please enter a message to the seller"),
            Self::Lookup(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ContactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lookup(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LookupError> for ContactError {
    fn from(e: LookupError) -> Self {
        Self::Lookup(e)
    }
}

impl From<ContactError> for EstateError {
    fn from(e: ContactError) -> Self {
        Self::Contact(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors parsing filter criteria from user input.
///
/// Applying criteria never fails; only turning strings into criteria can.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A closed-set value (status, category, sort key...) was not recognised.
    UnknownValue {
        field: &'static str,
        value: String,
        expected: String,
    },

    /// A numeric criterion could not be parsed.
    InvalidNumber { field: &'static str, value: String },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownValue {
                field,
                value,
                expected,
            } => write!(f, "Unknown {field} '{value}'. Expected one of: {expected}"),
            Self::InvalidNumber { field, value } => {
                write!(f, "Invalid number for {field}: '{value}'")
            }
        }
    }
}

impl std::error::Error for FilterError {}

impl From<FilterError> for EstateError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// API errors
// ---------------------------------------------------------------------------

/// Failures talking to the marketplace backend.
///
/// Both variants are network failures from the caller's point of view:
/// nothing is retried and no partial result is kept.
#[derive(Debug)]
pub enum ApiError {
    /// Transport failure or an undecodable response body.
    NetworkFailure {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status code.
    Status { endpoint: String, status: u16 },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkFailure { endpoint, source } => {
                write!(f, "Request to '{endpoint}' failed: {source}")
            }
            Self::Status { endpoint, status } => {
                write!(f, "Request to '{endpoint}' returned HTTP {status}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NetworkFailure { source, .. } => Some(source),
            Self::Status { .. } => None,
        }
    }
}

impl From<ApiError> for EstateError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for EstateError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for EstateError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for EstateHub results.
pub type Result<T> = std::result::Result<T, EstateError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_session_error_display_names_email() {
        let e = SessionError::DuplicateEmail {
            email: "john@example.com".to_string(),
        };
        assert!(e.to_string().contains("john@example.com"));
    }

    #[test]
    fn test_persist_error_keeps_source_chain() {
        let e: EstateError = SessionError::Persist {
            path: PathBuf::from("/tmp/session.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        let session = e.source().expect("top-level error should expose session error");
        assert!(session.source().is_some(), "io source must be preserved");
    }

    #[test]
    fn test_lookup_error_display() {
        let e = LookupError::NotFound {
            kind: "property",
            id: "property-99".to_string(),
        };
        assert_eq!(e.to_string(), "No property with id 'property-99'");
    }
}
