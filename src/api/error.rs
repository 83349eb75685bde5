//! Error kinds produced by every remote call.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Message used when a request went out but nothing came back.
pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Check your connection.";

/// Classified failure of a remote API call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
  /// The server answered with a non-2xx status (or an undecodable body).
  #[error("{message}")]
  Api { status: u16, message: String },

  /// The request was sent but no response arrived (connectivity, timeout).
  #[error("{}", NO_RESPONSE_MESSAGE)]
  Network,

  /// The request could not be built or sent at all.
  #[error("Configuration error: {0}")]
  Configuration(String),
}

/// Non-empty string under `key` in a JSON error payload.
fn text_field(body: &Value, key: &str) -> Option<String> {
  body
    .get(key)
    .and_then(Value::as_str)
    .filter(|text| !text.is_empty())
    .map(str::to_string)
}

impl ApiError {
  /// Build an `Api` error from a status and the raw response body.
  ///
  /// The body's `message` wins over `error`; without either the message is
  /// synthesized from the status code and its reason phrase.
  pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
    let parsed: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    let message = text_field(&parsed, "message")
      .or_else(|| text_field(&parsed, "error"))
      .unwrap_or_else(|| {
        format!(
          "Error {}: {}",
          status.as_u16(),
          status.canonical_reason().unwrap_or("Unknown")
        )
      });

    ApiError::Api {
      status: status.as_u16(),
      message,
    }
  }

  /// A 2xx response whose body did not match the expected shape.
  pub fn invalid_body(status: StatusCode, err: &serde_json::Error) -> Self {
    ApiError::Api {
      status: status.as_u16(),
      message: format!("Invalid response body: {}", err),
    }
  }

  /// HTTP status for `Api` errors.
  pub fn status(&self) -> Option<u16> {
    match self {
      ApiError::Api { status, .. } => Some(*status),
      _ => None,
    }
  }

  pub fn is_network(&self) -> bool {
    matches!(self, ApiError::Network)
  }
}

impl From<reqwest::Error> for ApiError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_builder() {
      return ApiError::Configuration(err.to_string());
    }
    if let Some(status) = err.status() {
      return ApiError::Api {
        status: status.as_u16(),
        message: format!(
          "Error {}: {}",
          status.as_u16(),
          status.canonical_reason().unwrap_or("Unknown")
        ),
      };
    }
    // connect, timeout, request and body failures all mean "no usable response"
    ApiError::Network
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_message_field_wins() {
    let err = ApiError::from_response(
      StatusCode::BAD_REQUEST,
      br#"{"message":"Email already used","error":"Bad Request"}"#,
    );
    assert_eq!(err.to_string(), "Email already used");
    assert_eq!(err.status(), Some(400));
  }

  #[test]
  fn test_error_field_fallback() {
    let err = ApiError::from_response(StatusCode::FORBIDDEN, br#"{"error":"Forbidden"}"#);
    assert_eq!(err.to_string(), "Forbidden");
  }

  #[test]
  fn test_synthesized_message() {
    let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
    assert_eq!(err.to_string(), "Error 500: Internal Server Error");
  }

  #[test]
  fn test_empty_message_is_ignored() {
    let err = ApiError::from_response(StatusCode::NOT_FOUND, br#"{"message":""}"#);
    assert_eq!(err.to_string(), "Error 404: Not Found");
  }

  #[test]
  fn test_message_survives_structured_error_field() {
    let err = ApiError::from_response(
      StatusCode::UNPROCESSABLE_ENTITY,
      br#"{"message":"Invalid SIREN","error":{"field":"siren","code":12}}"#,
    );
    assert_eq!(err.to_string(), "Invalid SIREN");
  }

  #[test]
  fn test_error_used_when_message_is_not_text() {
    let err = ApiError::from_response(
      StatusCode::BAD_REQUEST,
      br#"{"message":["a","b"],"error":"Bad Request"}"#,
    );
    assert_eq!(err.to_string(), "Bad Request");
  }

  #[test]
  fn test_display_of_other_kinds() {
    assert_eq!(ApiError::Network.to_string(), NO_RESPONSE_MESSAGE);
    assert_eq!(
      ApiError::Configuration("bad url".to_string()).to_string(),
      "Configuration error: bad url"
    );
  }
}
