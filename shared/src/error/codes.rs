//! Unified error codes for the ticket server
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Ticket errors
//! - 4xxx: Reference data errors (commands, units)
//! - 5xxx: User errors
//! - 6xxx: Import / file errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the frontend can switch on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Ticket ====================
    /// Ticket not found
    TicketNotFound = 3001,
    /// Ticket description is empty
    TicketDescriptionEmpty = 3002,
    /// Comment content is empty
    CommentEmpty = 3003,
    /// Priority outside the vocabulary
    InvalidPriority = 3004,
    /// Status outside the vocabulary
    InvalidStatus = 3005,

    // ==================== 4xxx: Reference data ====================
    /// Command not found
    CommandNotFound = 4001,
    /// Unit not found (or not under the given command)
    UnitNotFound = 4002,
    /// Command name already exists
    CommandNameExists = 4003,
    /// Unit name already exists under the command
    UnitNameExists = 4004,

    // ==================== 5xxx: User ====================
    /// User not found
    UserNotFound = 5001,
    /// Username already exists
    UsernameExists = 5002,
    /// Role outside the vocabulary
    InvalidRole = 5003,
    /// Password too short
    PasswordTooShort = 5004,

    // ==================== 6xxx: Import / File ====================
    /// File too large
    FileTooLarge = 6001,
    /// Unsupported file format
    UnsupportedFileFormat = 6002,
    /// No file provided
    NoFileProvided = 6003,
    /// Empty file provided
    EmptyFile = 6004,
    /// Spreadsheet could not be parsed
    SpreadsheetUnreadable = 6005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Ticket
            ErrorCode::TicketNotFound => "Ticket not found",
            ErrorCode::TicketDescriptionEmpty => "Ticket description must not be empty",
            ErrorCode::CommentEmpty => "Comment content must not be empty",
            ErrorCode::InvalidPriority => "Priority must be one of: normal, urgent, critical",
            ErrorCode::InvalidStatus => "Status must be one of: open, in_progress, resolved",

            // Reference data
            ErrorCode::CommandNotFound => "Command not found",
            ErrorCode::UnitNotFound => "Unit not found",
            ErrorCode::CommandNameExists => "Command name already exists",
            ErrorCode::UnitNameExists => "Unit name already exists in this command",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::InvalidRole => "Role must be one of: admin, technician, viewer",
            ErrorCode::PasswordTooShort => "Password is too short",

            // Import / File
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::SpreadsheetUnreadable => "Spreadsheet could not be read",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Ticket
            3001 => Ok(ErrorCode::TicketNotFound),
            3002 => Ok(ErrorCode::TicketDescriptionEmpty),
            3003 => Ok(ErrorCode::CommentEmpty),
            3004 => Ok(ErrorCode::InvalidPriority),
            3005 => Ok(ErrorCode::InvalidStatus),

            // Reference data
            4001 => Ok(ErrorCode::CommandNotFound),
            4002 => Ok(ErrorCode::UnitNotFound),
            4003 => Ok(ErrorCode::CommandNameExists),
            4004 => Ok(ErrorCode::UnitNameExists),

            // User
            5001 => Ok(ErrorCode::UserNotFound),
            5002 => Ok(ErrorCode::UsernameExists),
            5003 => Ok(ErrorCode::InvalidRole),
            5004 => Ok(ErrorCode::PasswordTooShort),

            // Import / File
            6001 => Ok(ErrorCode::FileTooLarge),
            6002 => Ok(ErrorCode::UnsupportedFileFormat),
            6003 => Ok(ErrorCode::NoFileProvided),
            6004 => Ok(ErrorCode::EmptyFile),
            6005 => Ok(ErrorCode::SpreadsheetUnreadable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::TicketNotFound.code(), 3001);
        assert_eq!(ErrorCode::CommandNotFound.code(), 4001);
        assert_eq!(ErrorCode::UsernameExists.code(), 5002);
        assert_eq!(ErrorCode::FileTooLarge.code(), 6001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(3001), Ok(ErrorCode::TicketNotFound));
        assert_eq!(ErrorCode::try_from(5003), Ok(ErrorCode::InvalidRole));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::DatabaseError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(6), Err(InvalidErrorCode(6)));
        assert_eq!(ErrorCode::try_from(4005), Err(InvalidErrorCode(4005)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_every_code_roundtrips_through_u16() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::RequiredField,
            ErrorCode::TokenExpired,
            ErrorCode::AdminRequired,
            ErrorCode::InvalidStatus,
            ErrorCode::UnitNameExists,
            ErrorCode::PasswordTooShort,
            ErrorCode::SpreadsheetUnreadable,
            ErrorCode::ConfigError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(u16::from(code)), Ok(code));
        }
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::TicketNotFound).unwrap();
        assert_eq!(json, "3001");
        let code: ErrorCode = serde_json::from_str("2001").unwrap();
        assert_eq!(code, ErrorCode::PermissionDenied);
        assert!(serde_json::from_str::<ErrorCode>("42").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::UserNotFound.to_string(), "5001");
        assert_eq!(InvalidErrorCode(999).to_string(), "invalid error code: 999");
    }
}
