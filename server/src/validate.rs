//! Request body validation.
//!
//! `ValidJson<T>` replaces `axum::Json<T>` on routes that take a body. It
//! turns every JSON rejection and every failed `Validate` check into the same
//! 400 response carrying a list of field errors.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// One entry of the `errors` array in a 400 response.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Normalises a decoded payload in place and reports what is wrong with it.
pub trait Validate {
    fn validate(&mut self) -> Result<(), Vec<FieldError>>;
}

/// Trims `value` and rejects it if nothing is left.
pub fn required(value: &mut String, field: &str, message: &str) -> Result<(), FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, message));
    }
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
    Ok(())
}

/// `deserialize_with` target for patch fields: an absent field stays `None`
/// through `#[serde(default)]`, while an explicit `null` becomes `Some(None)`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// JSON body extractor that runs `Validate` before the handler sees the value.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::Validation(vec![FieldError::new("body", rejection.body_text())])
            })?;
        value.validate().map_err(AppError::Validation)?;
        Ok(ValidJson(value))
    }
}
