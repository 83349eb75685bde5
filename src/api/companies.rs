use super::api_types::NameQuery;
use super::client::BackofficeClient;
use super::error::ApiError;
use super::types::Company;
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::{debug, info};

impl BackofficeClient {
  /// Every company the platform knows about. Slow on large datasets.
  pub async fn get_all_companies(&self) -> Result<Vec<Company>, ApiError> {
    debug!("fetching all companies");
    let companies: Vec<Company> = self.api.get("/companies").await?;
    info!(count = companies.len(), "fetched companies");
    Ok(companies)
  }

  pub async fn get_company(&self, id: i64) -> Result<Company, ApiError> {
    self.api.get(&format!("/companies/{}", id)).await
  }

  pub async fn search_companies_by_name(&self, name: &str) -> Result<Vec<Company>, ApiError> {
    let request = self
      .api
      .request(Method::GET, "/companies/search-by-name")?
      .query(&NameQuery { name });
    self.api.execute(request).await
  }

  /// Multi-criteria search. Criteria are passed through untouched.
  pub async fn search_companies(
    &self,
    criteria: &Map<String, Value>,
  ) -> Result<Vec<Company>, ApiError> {
    self.api.post("/companies/search", criteria).await
  }
}

#[cfg(test)]
mod tests {
  use super::super::testing::{client, dead_url, serve};
  use super::*;
  use crate::api::error::NO_RESPONSE_MESSAGE;
  use axum::extract::{Path, Query};
  use axum::http::{HeaderMap, StatusCode};
  use axum::routing::{get, post};
  use axum::{Json, Router};
  use serde_json::json;
  use std::collections::HashMap;

  fn echo_auth(headers: &HeaderMap) -> Value {
    headers
      .get("authorization")
      .and_then(|v| v.to_str().ok())
      .map(|v| json!(v))
      .unwrap_or(Value::Null)
  }

  fn router() -> Router {
    Router::new()
      .route(
        "/api/companies",
        get(|headers: HeaderMap| async move {
          Json(json!([
            { "id": 1, "name": "Acme", "auth": echo_auth(&headers) },
            { "id": 2, "name": "Beta" }
          ]))
        }),
      )
      .route(
        "/api/companies/:id",
        get(|Path(id): Path<i64>| async move {
          if id == 404 {
            (StatusCode::NOT_FOUND, Json(json!({ "message": "Company not found" })))
          } else {
            (StatusCode::OK, Json(json!({ "id": id, "name": "Acme" })))
          }
        }),
      )
      .route(
        "/api/companies/search-by-name",
        get(|Query(q): Query<HashMap<String, String>>| async move {
          Json(json!([{ "name": q.get("name").cloned().unwrap_or_default() }]))
        }),
      )
      .route(
        "/api/companies/search",
        post(|Json(body): Json<Value>| async move { Json(json!([{ "criteria": body }])) }),
      )
  }

  #[tokio::test]
  async fn test_get_all_companies_sends_bearer_token() {
    let url = serve(router()).await;
    let companies = client(&url, Some("tok")).get_all_companies().await.unwrap();

    assert_eq!(companies.len(), 2);
    assert_eq!(companies[0].name(), Some("Acme"));
    assert_eq!(companies[0].field("auth"), Some(&json!("Bearer tok")));
  }

  #[tokio::test]
  async fn test_missing_token_omits_header() {
    let url = serve(router()).await;
    let companies = client(&url, None).get_all_companies().await.unwrap();
    assert_eq!(companies[0].field("auth"), None);
  }

  #[tokio::test]
  async fn test_get_company_error_message_from_body() {
    let url = serve(router()).await;
    let c = client(&url, None);

    assert_eq!(c.get_company(7).await.unwrap().id(), Some(7));

    let err = c.get_company(404).await.unwrap_err();
    assert_eq!(
      err,
      ApiError::Api {
        status: 404,
        message: "Company not found".to_string()
      }
    );
  }

  #[tokio::test]
  async fn test_search_by_name_encodes_query() {
    let url = serve(router()).await;
    let found = client(&url, None)
      .search_companies_by_name("Café & Co")
      .await
      .unwrap();
    assert_eq!(found[0].name(), Some("Café & Co"));
  }

  #[tokio::test]
  async fn test_search_posts_criteria_body() {
    let url = serve(router()).await;
    let mut criteria = Map::new();
    criteria.insert("country".to_string(), json!("France"));

    let found = client(&url, None).search_companies(&criteria).await.unwrap();
    assert_eq!(found[0].field("criteria"), Some(&json!({ "country": "France" })));
  }

  #[tokio::test]
  async fn test_unreachable_server_is_network_error() {
    let url = dead_url().await;
    let err = client(&url, None).get_all_companies().await.unwrap_err();
    assert_eq!(err, ApiError::Network);
    assert_eq!(err.to_string(), NO_RESPONSE_MESSAGE);
  }

  #[tokio::test]
  async fn test_undecodable_body_is_api_error() {
    let app = Router::new().route("/api/companies", get(|| async { "not json" }));
    let url = serve(app).await;
    let err = client(&url, None).get_all_companies().await.unwrap_err();
    assert_eq!(err.status(), Some(200));
    assert!(err.to_string().starts_with("Invalid response body"));
  }
}
