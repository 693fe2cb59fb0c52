use crate::error::{Error, ModelResult};
use error_stack::{ResultExt, report};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::value::Value;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
        }
    }
}

/// Converts a JSON object into form/query pairs sorted by key.
///
/// `null` values are skipped, so optional fields can be passed straight from
/// an `Option` without being sent as empty strings. Non-string scalars are
/// rendered with their JSON representation.
///
/// # Errors
///
/// Returns `Error::ParseError` if `value` is not a JSON object.
pub fn value_to_form_pairs(value: &Value) -> ModelResult<Vec<(String, String)>> {
    let mut pairs: Vec<(String, String)> = match value {
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let value_str = match v {
                    Value::String(s) => s.clone(),
                    _ => v.to_string(),
                };
                (k.clone(), value_str)
            })
            .collect(),
        _ => {
            return Err(report!(Error::ParseError)
                .attach_printable(format!("Invalid JSON Object: {value:?}")));
        }
    };

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(pairs)
}

/// Deserializes a successful JSON response, or turns any non-success status
/// into `Error::ReqwestError` carrying the response body.
pub async fn handle_reqwest_response<T: DeserializeOwned>(response: Response) -> ModelResult<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .change_context(Error::SerdeDeserialize(
                "Failed to deserialize JSON".to_string(),
            ));
    }

    let error_body = response.text().await.change_context(Error::ReqwestError(
        "Failed to get text from response".to_string(),
    ))?;

    error!(status = %status, "Error Body: {}", &error_body);

    Err(report!(Error::ReqwestError(error_body)).attach_printable(format!("HTTP status {status}")))
}
