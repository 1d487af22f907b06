use std::collections::BTreeMap;

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use garde::{Report, Validate};
use serde::de::DeserializeOwned;
use sonic_rs::Value;

use crate::error::{AppError, FieldError, Result};

/// Canonicalizes a request body before it is validated.
pub trait Normalize {
    fn normalize(self) -> Self;
}

/// A JSON body that has been deserialized, normalized and validated.
///
/// The body must be a JSON object. Every mistyped field and every rule
/// violation is reported in a single `AppError::Validation`, one entry per
/// field. Request types default their absent fields so that a missing
/// required field surfaces as a rule violation rather than a parse error.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Normalize + Validate + Send,
    T::Context: Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(fields) = Json::<BTreeMap<String, Value>>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::invalid("body", rejection.body_text()))?;

        let (body, mut errors) = deserialize_fields::<T>(fields)?;
        let body = body.normalize();

        if let Err(report) = body.validate() {
            for error in field_errors(&report) {
                if !errors.iter().any(|e| e.field == error.field) {
                    errors.push(error);
                }
            }
        }

        if errors.is_empty() {
            Ok(ValidJson(body))
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Deserializes `T` one field at a time, so that every mistyped field is
/// reported. Mistyped fields are left out and take their default.
fn deserialize_fields<T: DeserializeOwned>(
    fields: BTreeMap<String, Value>,
) -> Result<(T, Vec<FieldError>)> {
    let mut accepted = BTreeMap::new();
    let mut errors = Vec::new();

    for (name, value) in fields {
        let single = BTreeMap::from([(name.as_str(), &value)]);
        match sonic_rs::to_value(&single).and_then(|v| sonic_rs::from_value::<T>(&v)) {
            Ok(_) => {
                accepted.insert(name, value);
            }
            Err(e) => errors.push(FieldError::new(name, e.to_string())),
        }
    }

    let body = sonic_rs::to_value(&accepted)
        .and_then(|v| sonic_rs::from_value::<T>(&v))
        .map_err(|e| AppError::invalid("body", e.to_string()))?;

    Ok((body, errors))
}

/// Runs the garde rules on `value`, collecting every failing field.
pub fn validate<T>(value: &T) -> Result<()>
where
    T: Validate,
    T::Context: Default,
{
    value.validate().map_err(|report| AppError::Validation(field_errors(&report)))
}

fn field_errors(report: &Report) -> Vec<FieldError> {
    report
        .iter()
        .map(|(path, error)| FieldError::new(path.to_string(), error.message()))
        .collect()
}

/// Trims surrounding whitespace.
pub fn trimmed(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}
