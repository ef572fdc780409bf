//! Axum extractor for validated request bodies
//!
//! `Validated<T>` deserializes a JSON body and runs its `validator` rules
//! before the handler sees it. `ValidatedList<T>` does the same for a JSON
//! array, reporting failures as `[index].field`.

use crate::core::error::{FieldValidationError, ShapeError, ValidationError, field_errors};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Axum extractor that deserializes and validates a JSON payload
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_author(
///     Validated(payload): Validated<AuthorForCreationDto>,
/// ) -> ShapeResult<Response> {
///     // payload is already validated
/// }
/// ```
#[derive(Debug)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    /// Get the inner payload
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ShapeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ValidationError::InvalidJson {
                message: e.body_text(),
            })?;

        payload.validate()?;

        Ok(Validated(payload))
    }
}

/// Axum extractor for a non-empty JSON array whose every item is validated
#[derive(Debug)]
pub struct ValidatedList<T>(pub Vec<T>);

impl<S, T> FromRequest<S> for ValidatedList<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ShapeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(items) = Json::<Vec<T>>::from_request(req, state)
            .await
            .map_err(|e| ValidationError::InvalidJson {
                message: e.body_text(),
            })?;

        if items.is_empty() {
            return Err(ValidationError::FieldErrors(vec![FieldValidationError {
                field: "[]".to_string(),
                message: "At least one item is required".to_string(),
            }])
            .into());
        }

        let failures: Vec<FieldValidationError> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| item.validate().err().map(|errors| (index, errors)))
            .flat_map(|(index, errors)| {
                field_errors(&errors)
                    .into_iter()
                    .map(move |error| FieldValidationError {
                        field: format!("[{}].{}", index, error.field),
                        message: error.message,
                    })
            })
            .collect();

        if !failures.is_empty() {
            return Err(ValidationError::FieldErrors(failures).into());
        }

        Ok(ValidatedList(items))
    }
}
