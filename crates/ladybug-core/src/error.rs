use std::fmt;

/// Machine-readable error codes surfaced alongside CLI errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    MissingRequiredFields,
    RecordNotFound,
    DeleteRestricted,
    FormClosed,
    ExportAlreadyRunning,
    ExportUnsupportedFormat,
    ExportWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::MissingRequiredFields => "E2001",
            Self::RecordNotFound => "E2002",
            Self::DeleteRestricted => "E2003",
            Self::FormClosed => "E2004",
            Self::ExportAlreadyRunning => "E3001",
            Self::ExportUnsupportedFormat => "E3002",
            Self::ExportWriteFailed => "E3003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::MissingRequiredFields => "Missing required fields",
            Self::RecordNotFound => "Record not found",
            Self::DeleteRestricted => "Delete blocked by existing references",
            Self::FormClosed => "No form is open",
            Self::ExportAlreadyRunning => "An export is already running",
            Self::ExportUnsupportedFormat => "Export format not supported",
            Self::ExportWriteFailed => "Export artifact write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in ladybug.toml and retry."),
            Self::MissingRequiredFields => Some("Fill in the listed fields and submit again."),
            Self::RecordNotFound => None,
            Self::DeleteRestricted => {
                Some("Remove or reassign the referencing records, then retry the delete.")
            }
            Self::FormClosed => Some("Open the dialog before committing it."),
            Self::ExportAlreadyRunning => Some("Wait for the running export or cancel it first."),
            Self::ExportUnsupportedFormat => Some("Use csv or json."),
            Self::ExportWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Commit-time validation failure: one or more required fields are missing
/// or invalid. Recoverable; the form session stays open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Entity family the draft belongs to ("bug", "team", ...).
    pub family: &'static str,
    /// Names of the offending fields.
    pub fields: Vec<&'static str>,
}

impl ValidationError {
    #[must_use]
    pub fn new(family: &'static str, fields: Vec<&'static str>) -> Self {
        Self { family, fields }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: missing or invalid required fields: {}",
            self.family,
            self.fields.join(", ")
        )
    }
}

impl std::error::Error for ValidationError {}

/// Errors produced by entity stores and cross-store delete policies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{family} {id} not found")]
    NotFound { family: &'static str, id: u32 },

    #[error("cannot delete {family} {id}: {reason}")]
    DeleteRestricted {
        family: &'static str,
        id: u32,
        reason: &'static str,
    },
}

impl StoreError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::MissingRequiredFields,
            Self::NotFound { .. } => ErrorCode::RecordNotFound,
            Self::DeleteRestricted { .. } => ErrorCode::DeleteRestricted,
        }
    }
}

/// Errors produced by form sessions on commit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("no form is open")]
    Closed,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl FormError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Closed => ErrorCode::FormClosed,
            Self::Invalid(_) => ErrorCode::MissingRequiredFields,
        }
    }
}

/// Errors produced by the export task.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("an export is already running")]
    AlreadyRunning,

    #[error("export format '{0}' is not supported")]
    UnsupportedFormat(&'static str),

    #[error("no data sections selected")]
    NothingSelected,

    #[error("failed to write export artifact")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::AlreadyRunning => ErrorCode::ExportAlreadyRunning,
            Self::UnsupportedFormat(_) | Self::NothingSelected => {
                ErrorCode::ExportUnsupportedFormat
            }
            Self::Io(_) => ErrorCode::ExportWriteFailed,
        }
    }
}
