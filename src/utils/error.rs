use thiserror::Error;

#[derive(Error, Debug)]
pub enum JailError {
    #[error("JSON processing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML processing error: {message}")]
    Xml { message: String },

    #[error("Unexpected root element: expected <{expected}>, found <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    #[error("Invalid date in {field}: '{value}' (expected dd/mm/yyyy)")]
    InvalidDate { field: String, value: String },

    #[error("Unknown {kind} token: '{token}'")]
    UnknownToken { kind: String, token: String },

    #[error("Invalid money amount: '{value}'")]
    InvalidMoney { value: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    Config { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Format,
    Persistence,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl JailError {
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Json(_)
            | Self::Xml { .. }
            | Self::UnexpectedRoot { .. }
            | Self::InvalidDate { .. }
            | Self::UnknownToken { .. }
            | Self::InvalidMoney { .. } => ErrorCategory::Format,
            Self::Persistence { .. } => ErrorCategory::Persistence,
            Self::Config { .. } => ErrorCategory::Configuration,
            Self::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Format => ErrorSeverity::High,
            ErrorCategory::Persistence | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Json(_) | Self::Xml { .. } | Self::UnexpectedRoot { .. } => {
                format!("The input document could not be read: {}", self)
            }
            Self::InvalidDate { field, value } => {
                format!("Date '{}' in {} is not in dd/mm/yyyy format", value, field)
            }
            Self::UnknownToken { kind, token } => {
                format!("'{}' is not a known {}", token, kind)
            }
            Self::InvalidMoney { value } => format!("'{}' is not a valid amount", value),
            Self::Persistence { .. } => format!("Nothing was saved: {}", self),
            Self::Io(e) => format!("File access failed: {}", e),
            Self::Config { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Json(_) => "Check that the file is a JSON array of records",
            Self::Xml { .. } | Self::UnexpectedRoot { .. } => {
                "Check that the file is well-formed XML with the expected root element"
            }
            Self::InvalidDate { .. } => "Use the dd/mm/yyyy layout for dates",
            Self::UnknownToken { .. } => {
                "Fix the token or rerun with --on-unknown-token reject to skip the record"
            }
            Self::InvalidMoney { .. } => "Use a decimal amount with at most four fractional digits",
            Self::Persistence { .. } => {
                "Make sure referenced departments, cells and prisoners are imported first"
            }
            Self::Io(_) => "Check that the path exists and is readable/writable",
            Self::Config { .. } => "Review the command-line arguments or the TOML job file",
        }
    }
}

pub type Result<T> = std::result::Result<T, JailError>;
