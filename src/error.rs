//! Error types for the Gitabase core
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are categorized by domain (identity, filesystem, library, catalog)
//! for better error handling and reporting.

use thiserror::Error;

/// Result type alias using our GitabaseError type
pub type Result<T> = std::result::Result<T, GitabaseError>;

/// Main error type for the Gitabase core
///
/// This enum provides comprehensive error handling for all operations in the
/// library. Each variant includes descriptive error messages and relevant context.
#[derive(Error, Debug)]
pub enum GitabaseError {
    // ===== Identity Errors =====

    /// A file name could not be parsed into a Gitabase identity
    #[error("Invalid Gitabase file name '{name}': {reason}")]
    InvalidFileName {
        name: String,
        reason: String,
    },

    /// A persisted key could not be decoded back into an identity
    #[error("Invalid Gitabase key: {0}")]
    InvalidKey(String),

    /// Generic input validation error
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid data format or content
    #[error("Invalid data: {0}")]
    InvalidData(String),

    // ===== File/Storage Errors =====

    /// File or directory not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Invalid file path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Generic file I/O error
    #[error("File I/O error: {0}")]
    FileIoError(String),

    /// File operation permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A file exists but is not a usable Gitabase database
    #[error("Not a Gitabase database '{path}': {reason}")]
    NotAGitabase {
        path: String,
        reason: String,
    },

    // ===== Library/Selection Errors =====

    /// The requested Gitabase is not registered in the library
    #[error("Gitabase not found: {0}")]
    GitabaseNotFound(String),

    /// An operation needed the current selection but none is set
    #[error("No Gitabase is currently selected")]
    NoCurrentGitabase,

    // ===== Catalog Errors =====

    /// Fetching remote Gitabase descriptions failed
    #[error("Catalog request failed: {message}")]
    CatalogUnavailable {
        message: String,
        /// HTTP status code if available
        status_code: Option<u16>,
    },

    /// Catalog returned an unexpected payload
    #[error("Invalid catalog response: {0}")]
    InvalidCatalogResponse(String),

    // ===== External Library Errors =====
    // Automatic conversions from external error types

    /// HTTP client error from reqwest
    #[error("HTTP client error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Database driver error from sqlx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// Implement From conversions for common error types
impl From<std::string::FromUtf8Error> for GitabaseError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        GitabaseError::InvalidData(format!("UTF-8 conversion error: {}", err))
    }
}

impl From<std::num::ParseIntError> for GitabaseError {
    fn from(err: std::num::ParseIntError) -> Self {
        GitabaseError::InvalidInput(format!("Failed to parse integer: {}", err))
    }
}

impl From<base64::DecodeError> for GitabaseError {
    fn from(err: base64::DecodeError) -> Self {
        GitabaseError::InvalidData(format!("Base64 decode error: {}", err))
    }
}

// Helper methods for creating common errors
impl GitabaseError {
    /// Create an InvalidFileName error
    pub fn invalid_file_name<S: Into<String>, R: Into<String>>(name: S, reason: R) -> Self {
        GitabaseError::InvalidFileName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotAGitabase error for a path that failed validation
    pub fn not_a_gitabase<S: Into<String>, R: Into<String>>(path: S, reason: R) -> Self {
        GitabaseError::NotAGitabase {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a CatalogUnavailable error
    pub fn catalog_failed<S: Into<String>>(message: S, status_code: Option<u16>) -> Self {
        GitabaseError::CatalogUnavailable {
            message: message.into(),
            status_code,
        }
    }

    /// Check if error stems from bad caller input
    ///
    /// Returns `true` for errors where retrying with the same arguments
    /// cannot succeed and the caller should fix the request instead.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            GitabaseError::InvalidFileName { .. }
                | GitabaseError::InvalidKey(_)
                | GitabaseError::InvalidInput(_)
                | GitabaseError::InvalidData(_)
        )
    }

    /// Check if error is related to file/disk operations
    pub fn is_file_error(&self) -> bool {
        matches!(
            self,
            GitabaseError::FileNotFound(_)
                | GitabaseError::FileIoError(_)
                | GitabaseError::PermissionDenied(_)
                | GitabaseError::InvalidPath(_)
                | GitabaseError::NotAGitabase { .. }
                | GitabaseError::IoError(_)
        )
    }

    /// Check if error came from the database layer
    pub fn is_database_error(&self) -> bool {
        matches!(self, GitabaseError::SqlxError(_))
    }

    /// Check if error is retryable (network problems, timeouts)
    ///
    /// Returns `true` for transient errors that might succeed on retry.
    /// Catalog failures are always retryable because enrichment is optional
    /// and re-fetched on the next scan anyway.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GitabaseError::CatalogUnavailable { .. } | GitabaseError::ReqwestError(_)
        )
    }

    /// Get user-friendly error message suitable for display
    ///
    /// This returns actionable error messages that can be shown to end users,
    /// with technical details omitted where appropriate.
    pub fn user_message(&self) -> String {
        match self {
            GitabaseError::NoCurrentGitabase => {
                "No book database is selected. Please choose one from the library.".to_string()
            }
            GitabaseError::GitabaseNotFound(key) => {
                format!(
                    "The book database '{}' is no longer in the library. It may have been removed from the device.",
                    key
                )
            }
            GitabaseError::NotAGitabase { path, .. } => {
                format!(
                    "The file '{}' is not a valid book database and cannot be opened.",
                    path
                )
            }
            GitabaseError::InvalidFileName { name, .. } => {
                format!("'{}' is not a recognizable book database file name.", name)
            }
            GitabaseError::CatalogUnavailable { .. } => {
                "Could not reach the online catalog. Local databases are still available.".to_string()
            }
            GitabaseError::PermissionDenied(path) => {
                format!("Permission denied while accessing '{}'.", path)
            }
            _ => self.to_string(),
        }
    }
}
