//! Typed error handling for resource listings
//!
//! Every failure in the projection core is either a configuration bug or bad
//! caller input; none of them are transient, so nothing here is retried.
//!
//! # Error Categories
//!
//! - [`ConfigError`]: missing mapping tables and configuration loading
//! - [`ValidationError`]: caller-supplied field lists, order-by strings and paging
//! - [`SortError`]: order clauses that reached the sort builder unresolved
//! - [`StorageError`]: lazy query execution failures
//! - [`EntityError`]: single-resource lookups

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the crate
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Sort(#[from] SortError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    /// None of the media types in `Accept` can be produced
    #[error("Media type '{media_type}' is not supported")]
    NotAcceptable { media_type: String },

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShapeError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShapeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShapeError::Validation(_) => StatusCode::BAD_REQUEST,
            ShapeError::Sort(_) => StatusCode::BAD_REQUEST,
            ShapeError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShapeError::Entity(e) => e.status_code(),
            ShapeError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            ShapeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShapeError::Config(e) => e.error_code(),
            ShapeError::Validation(e) => e.error_code(),
            ShapeError::Sort(_) => "SORT_KEY_MAPPING_MISSING",
            ShapeError::Storage(_) => "STORAGE_ERROR",
            ShapeError::Entity(e) => e.error_code(),
            ShapeError::NotAcceptable { .. } => "NOT_ACCEPTABLE",
            ShapeError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller caused this error (as opposed to a server bug)
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShapeError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            ShapeError::Validation(
                ValidationError::UnknownFields { resource, fields }
                | ValidationError::DuplicateFields { resource, fields },
            ) => {
                Some(serde_json::json!({
                    "resource": resource,
                    "fields": fields
                }))
            }
            ShapeError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ShapeError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            tracing::warn!(code = self.error_code(), "rejected request: {}", self);
        } else {
            tracing::error!(code = self.error_code(), "request failed: {}", self);
        }
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No mapping table was registered for a (public, storage) type pair
    #[error("Cannot find exact property mapping instance for <{public_type}, {storage_type}>")]
    MissingMapping {
        public_type: &'static str,
        storage_type: &'static str,
    },

    /// A mapping table was registered twice for the same type pair
    #[error("Property mapping for <{public_type}, {storage_type}> is already registered")]
    DuplicateMapping {
        public_type: &'static str,
        storage_type: &'static str,
    },

    /// A mapping entry has no destination fields
    #[error("Mapping entry '{field}' must have at least one destination field")]
    EmptyMappingEntry { field: String },

    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::MissingMapping { .. } => "MAPPING_NOT_REGISTERED",
            ConfigError::DuplicateMapping { .. } => "MAPPING_ALREADY_REGISTERED",
            ConfigError::EmptyMappingEntry { .. } => "EMPTY_MAPPING_ENTRY",
            _ => "CONFIG_ERROR",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to caller input
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The order-by string references a name with no mapping
    #[error("Order by clause '{order_by}' references unmapped fields")]
    InvalidOrderBy { order_by: String },

    /// Not all requested shaping fields exist on the resource
    #[error("Not all requested data shaping fields exist on the resource {resource}: {fields}")]
    UnknownFields {
        resource: &'static str,
        fields: String,
    },

    /// A shaping field was requested more than once
    #[error("Data shaping fields requested more than once on the resource {resource}: {fields}")]
    DuplicateFields {
        resource: &'static str,
        fields: String,
    },

    /// Page size must be strictly positive
    #[error("Page size must be greater than zero, got {page_size}")]
    InvalidPageSize { page_size: i64 },

    /// Page number must be strictly positive
    #[error("Page number must be greater than zero, got {page_number}")]
    InvalidPageNumber { page_number: i64 },

    /// Request body validation errors
    #[error("Validation errors: {}", .0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect::<Vec<_>>().join(", "))]
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// Invalid UUID format
    #[error("Invalid UUID format: {value}")]
    InvalidUuid { value: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidOrderBy { .. } => "INVALID_ORDER_BY",
            ValidationError::UnknownFields { .. } => "UNKNOWN_FIELDS",
            ValidationError::DuplicateFields { .. } => "DUPLICATE_FIELDS",
            ValidationError::InvalidPageSize { .. } => "INVALID_PAGE_SIZE",
            ValidationError::InvalidPageNumber { .. } => "INVALID_PAGE_NUMBER",
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::InvalidUuid { .. } => "INVALID_UUID",
        }
    }
}

// =============================================================================
// Sort Errors
// =============================================================================

/// Errors raised while composing an ordering
#[derive(Debug, Error)]
pub enum SortError {
    /// An order clause names a field absent from the mapping table
    #[error("Key mapping for {field} is missing.")]
    MissingKeyMapping { field: String },
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to lazy query execution
#[derive(Debug, Error)]
pub enum StorageError {
    /// An ordering references a column the stored type does not have
    #[error("Unknown column '{column}' on {entity_type}")]
    UnknownColumn {
        entity_type: &'static str,
        column: String,
    },

    /// A lock guarding the store was poisoned
    #[error("Failed to acquire {kind} lock: {message}")]
    LockPoisoned { kind: &'static str, message: String },
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to single-resource operations
#[derive(Debug, Error)]
pub enum EntityError {
    /// Entity was not found
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: Uuid },

    /// Entity already exists
    #[error("{entity_type} with id '{id}' already exists")]
    AlreadyExists { entity_type: String, id: Uuid },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for ShapeError {
    fn from(err: serde_json::Error) -> Self {
        ShapeError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ShapeError {
    fn from(err: serde_yaml::Error) -> Self {
        ShapeError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

/// Flatten `validator` errors into field errors sorted by field name
pub fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldValidationError> {
    let mut fields: Vec<FieldValidationError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldValidationError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

impl From<validator::ValidationErrors> for ShapeError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ShapeError::Validation(ValidationError::FieldErrors(field_errors(&errors)))
    }
}

/// A specialized Result type for projection operations
pub type ShapeResult<T> = Result<T, ShapeError>;
