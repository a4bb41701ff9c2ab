//! Domain error taxonomy.
//!
//! `ErrorCode` values are the stable strings clients match on; the HTTP
//! layer maps them to status codes but never invents new ones.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // input validation
    ValidationFailed,
    InvalidFormat,

    // report extraction
    EmptyOrUnreadablePdf,
    NotACliftonStrengthsReport,
    ExtractionFailed,

    // lookups
    UserNotFound,
    AssessmentNotFound,
    SessionNotFound,

    // provider
    AiProviderError,
    AiFallbackUnavailable,
    RateLimited,

    // infrastructure
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::EmptyOrUnreadablePdf => "EMPTY_OR_UNREADABLE_PDF",
            ErrorCode::NotACliftonStrengthsReport => "NOT_A_CLIFTONSTRENGTHS_REPORT",
            ErrorCode::ExtractionFailed => "EXTRACTION_FAILED",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::AssessmentNotFound => "ASSESSMENT_NOT_FOUND",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::AiProviderError => "AI_PROVIDER_ERROR",
            ErrorCode::AiFallbackUnavailable => "AI_FALLBACK_UNAVAILABLE",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coded error with a message and optional key/value details.
#[derive(Debug, Clone)]
pub struct DomainError {
    code: ErrorCode,
    message: String,
    details: HashMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Validation failure naming the offending field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field)
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &HashMap<String, String> {
        &self.details
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
