use crate::api::error::ApiError;
use crate::api::token::TokenStore;
use crate::config::ApiConfig;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// HTTP plumbing shared by every service method.
///
/// One instance per base URL. Requests are JSON in, JSON out; the bearer
/// token (when a store is attached) is read right before each request.
#[derive(Clone)]
pub struct HttpClient {
  http: reqwest::Client,
  base: Url,
  tokens: Option<Arc<dyn TokenStore>>,
}

impl HttpClient {
  pub fn new(
    base_url: &str,
    timeout: Duration,
    tokens: Option<Arc<dyn TokenStore>>,
  ) -> Result<Self, ApiError> {
    let base = Url::parse(base_url)
      .map_err(|e| ApiError::Configuration(format!("invalid base URL '{}': {}", base_url, e)))?;

    let http = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| ApiError::Configuration(e.to_string()))?;

    Ok(Self { http, base, tokens })
  }

  pub fn base_url(&self) -> &Url {
    &self.base
  }

  /// Start a request to `path` (relative to the base, leading slash included).
  pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
    let joined = format!("{}{}", self.base.as_str().trim_end_matches('/'), path);
    let url = Url::parse(&joined)
      .map_err(|e| ApiError::Configuration(format!("invalid URL '{}': {}", joined, e)))?;

    let mut request = self.http.request(method, url);
    if let Some(token) = self.tokens.as_ref().and_then(|store| store.token()) {
      request = request.bearer_auth(token);
    }
    Ok(request)
  }

  /// Send and decode a JSON response.
  pub async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
    let (status, body) = self.send(request).await?;
    serde_json::from_slice(&body).map_err(|e| ApiError::invalid_body(status, &e))
  }

  /// Send and decode a JSON response, mapping an empty body to `null`.
  pub async fn execute_value(
    &self,
    request: RequestBuilder,
  ) -> Result<serde_json::Value, ApiError> {
    let (status, body) = self.send(request).await?;
    if body.iter().all(u8::is_ascii_whitespace) {
      return Ok(serde_json::Value::Null);
    }
    serde_json::from_slice(&body).map_err(|e| ApiError::invalid_body(status, &e))
  }

  /// Send, discarding whatever body comes back.
  pub async fn execute_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
    self.send(request).await.map(|_| ())
  }

  pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
    self.execute(self.request(Method::GET, path)?).await
  }

  pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    self
      .execute(self.request(Method::POST, path)?.json(body))
      .await
  }

  pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    self.execute(self.request(Method::PUT, path)?.json(body)).await
  }

  pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
    self.execute_unit(self.request(Method::DELETE, path)?).await
  }

  async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, Vec<u8>), ApiError> {
    let request = request.build().map_err(ApiError::from)?;
    let method = request.method().clone();
    let url = request.url().clone();
    debug!(%method, %url, "sending request");

    let response = match self.http.execute(request).await {
      Ok(response) => response,
      Err(e) => {
        let err = ApiError::from(e);
        warn!(%method, %url, error = %err, "request failed");
        return Err(err);
      }
    };

    let status = response.status();
    let body = response.bytes().await.map_err(ApiError::from)?.to_vec();

    if !status.is_success() {
      let err = ApiError::from_response(status, &body);
      warn!(%method, %url, status = status.as_u16(), error = %err, "request rejected");
      return Err(err);
    }

    debug!(%method, %url, status = status.as_u16(), bytes = body.len(), "response received");
    Ok((status, body))
  }
}

/// Client for the backoffice REST API.
///
/// Resource-specific methods live next to their DTO usage in the sibling
/// modules (`companies`, `users`, `wallet`, ...).
#[derive(Clone)]
pub struct BackofficeClient {
  pub(crate) api: HttpClient,
  pub(crate) auth: HttpClient,
}

impl BackofficeClient {
  pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
    let root = config.url.trim_end_matches('/');

    let api = HttpClient::new(
      &format!("{}/api", root),
      Duration::from_secs(config.timeout_secs),
      Some(tokens),
    )?;
    // Auth calls never carry a token and use a short ceiling
    let auth = HttpClient::new(
      &format!("{}/api/v1/auth", root),
      Duration::from_secs(config.auth_timeout_secs),
      None,
    )?;

    Ok(Self { api, auth })
  }

  /// Host shown in the header.
  pub fn host(&self) -> &str {
    self.api.base_url().host_str().unwrap_or("")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::token::MemoryTokenStore;

  #[test]
  fn test_invalid_base_url_is_configuration_error() {
    let config = ApiConfig {
      url: "not a url".to_string(),
      ..ApiConfig::default()
    };
    let err = BackofficeClient::new(&config, Arc::new(MemoryTokenStore::new()))
      .err()
      .unwrap();
    assert!(matches!(err, ApiError::Configuration(_)));
    assert!(err.to_string().starts_with("Configuration error:"));
  }

  #[test]
  fn test_bases_and_host() {
    let config = ApiConfig {
      url: "https://example.org/".to_string(),
      ..ApiConfig::default()
    };
    let client = BackofficeClient::new(&config, Arc::new(MemoryTokenStore::new())).unwrap();
    assert_eq!(client.api.base_url().as_str(), "https://example.org/api");
    assert_eq!(client.auth.base_url().as_str(), "https://example.org/api/v1/auth");
    assert_eq!(client.host(), "example.org");
  }

  #[test]
  fn test_request_attaches_token_only_when_present() {
    let base = "https://example.org/api";
    let with = HttpClient::new(
      base,
      Duration::from_secs(1),
      Some(Arc::new(MemoryTokenStore::with_token("abc"))),
    )
    .unwrap();
    let request = with.request(Method::GET, "/companies").unwrap().build().unwrap();
    assert_eq!(request.url().as_str(), "https://example.org/api/companies");
    assert_eq!(
      request.headers().get("authorization").unwrap(),
      "Bearer abc"
    );

    let without = HttpClient::new(base, Duration::from_secs(1), None).unwrap();
    let request = without.request(Method::GET, "/companies").unwrap().build().unwrap();
    assert!(request.headers().get("authorization").is_none());
  }

  #[tokio::test]
  async fn test_timeout_is_network_error() {
    use axum::routing::get;

    let router = axum::Router::new().route(
      "/api/companies",
      get(|| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        "[]"
      }),
    );
    let url = crate::api::testing::serve(router).await;
    let config = ApiConfig {
      url,
      timeout_secs: 1,
      auth_timeout_secs: 1,
    };
    let client = BackofficeClient::new(&config, Arc::new(MemoryTokenStore::new())).unwrap();

    let err = client.get_all_companies().await.unwrap_err();
    assert_eq!(err, ApiError::Network);
    assert_eq!(err.to_string(), crate::api::error::NO_RESPONSE_MESSAGE);
  }
}
