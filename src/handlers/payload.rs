use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::database::CategoryDraft;
use crate::error::ApiError;

/// Category body checked against the expected shape: `name` must be a string
/// and `status` a boolean. A client-supplied `id` is ignored.
#[derive(Debug)]
pub struct CategoryPayload(pub CategoryDraft);

#[async_trait]
impl<S> FromRequest<S> for CategoryPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::bad_request("Expected request with `Content-Type: application/json`")
                }
                other => ApiError::invalid_json(other.body_text()),
            })?;

        validate_category(&value).map(Self)
    }
}

pub fn validate_category(value: &Value) -> Result<CategoryDraft, ApiError> {
    let object = value
        .as_object()
        .ok_or_else(|| ApiError::invalid_json("Request body must be a JSON object"))?;

    let mut field_errors = HashMap::new();

    let name = match object.get("name") {
        Some(Value::String(name)) => Some(name.clone()),
        Some(_) => {
            field_errors.insert("name".to_string(), "Expected a string".to_string());
            None
        }
        None => {
            field_errors.insert("name".to_string(), "This field is required".to_string());
            None
        }
    };

    let status = match object.get("status") {
        Some(Value::Bool(status)) => Some(*status),
        Some(_) => {
            field_errors.insert("status".to_string(), "Expected a boolean".to_string());
            None
        }
        None => {
            field_errors.insert("status".to_string(), "This field is required".to_string());
            None
        }
    };

    match (name, status) {
        (Some(name), Some(status)) => Ok(CategoryDraft { name, status }),
        _ => Err(ApiError::validation_error(
            "Invalid category payload",
            Some(field_errors),
        )),
    }
}
