//! Remote API client.

pub mod api_types;
pub mod auth;
pub mod cached_client;
pub mod client;
pub mod companies;
pub mod error;
pub mod offers;
pub mod statistics;
pub mod subscriptions;
pub mod token;
pub mod types;
pub mod users;
pub mod wallet;

pub use cached_client::CachedBackofficeClient;
pub use client::BackofficeClient;
pub use error::ApiError;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};

/// In-process fake API for service tests.
#[cfg(test)]
pub(crate) mod testing {
  use super::token::MemoryTokenStore;
  use super::BackofficeClient;
  use crate::config::ApiConfig;
  use axum::Router;
  use std::sync::Arc;

  /// Serve `router` on an ephemeral port and return its root URL.
  pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
  }

  pub fn client(url: &str, token: Option<&str>) -> BackofficeClient {
    let store = match token {
      Some(t) => MemoryTokenStore::with_token(t),
      None => MemoryTokenStore::new(),
    };
    let config = ApiConfig {
      url: url.to_string(),
      timeout_secs: 5,
      auth_timeout_secs: 5,
    };
    BackofficeClient::new(&config, Arc::new(store)).unwrap()
  }

  /// A root URL nothing is listening on.
  pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
  }
}

#[cfg(test)]
mod tests {
  use super::testing::{client, serve};
  use super::types::PlanInput;
  use axum::body::Bytes;
  use axum::extract::State;
  use axum::http::{Method, Uri};
  use axum::{Json, Router};
  use serde_json::{json, Value};
  use std::sync::{Arc, Mutex};

  #[derive(Debug)]
  struct Hit {
    method: Method,
    path: String,
    body: Value,
  }

  type Hits = Arc<Mutex<Vec<Hit>>>;

  /// Record every request and answer with the smallest body its caller decodes.
  async fn record(State(hits): State<Hits>, method: Method, uri: Uri, body: Bytes) -> Json<Value> {
    let path = uri.path().to_string();
    let response = match path.as_str() {
      "/api/v1/auth/reset-password" => json!({ "message": "Password updated" }),
      "/api/v1/statistics/current" => json!({ "year": 2025, "month": 3 }),
      "/api/v1/statistics/detailed" => json!({ "byCity": { "Lyon": 4 } }),
      "/api/v1/subscriptions/plans/4" => json!({ "id": 4, "title": "Pro+", "price": 24.9 }),
      _ => json!([]),
    };
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    hits.lock().unwrap().push(Hit { method, path, body });
    Json(response)
  }

  #[tokio::test]
  async fn test_endpoints_hit_expected_method_and_path() {
    let hits: Hits = Arc::default();
    let url = serve(Router::new().fallback(record).with_state(hits.clone())).await;
    let api = client(&url, Some("tok"));

    api.reset_password("reset-123", "n3w-secret").await.unwrap();
    api.get_active_offers().await.unwrap();
    let current = api.get_current_statistics().await.unwrap();
    api.get_statistics_history().await.unwrap();
    let detailed = api.get_detailed_statistics().await.unwrap();
    let plan = api
      .update_plan(
        4,
        &PlanInput {
          title: Some("Pro+".to_string()),
          price: Some(24.9),
          ..PlanInput::default()
        },
      )
      .await
      .unwrap();
    api.get_favorites().await.unwrap();
    api.get_wallet_history().await.unwrap();
    api.get_wallet_requests().await.unwrap();
    api.reset_wallet(9).await.unwrap();

    assert_eq!((current.year, current.month), (2025, 3));
    assert!(detailed.contains_key("byCity"));
    assert_eq!(plan.title, "Pro+");

    let expected = [
      (Method::POST, "/api/v1/auth/reset-password"),
      (Method::GET, "/api/v1/offers/active"),
      (Method::GET, "/api/v1/statistics/current"),
      (Method::GET, "/api/v1/statistics/history"),
      (Method::GET, "/api/v1/statistics/detailed"),
      (Method::PUT, "/api/v1/subscriptions/plans/4"),
      (Method::GET, "/api/v1/users/favorites"),
      (Method::GET, "/api/v1/wallet/history"),
      (Method::GET, "/api/v1/wallet/requests"),
      (Method::POST, "/api/v1/wallet/admin/reset/9"),
    ];
    let hits = hits.lock().unwrap();
    let seen: Vec<(Method, &str)> = hits
      .iter()
      .map(|hit| (hit.method.clone(), hit.path.as_str()))
      .collect();
    assert_eq!(seen, expected);

    assert_eq!(
      hits[0].body,
      json!({ "token": "reset-123", "password": "n3w-secret" })
    );
    // Unset plan fields stay out of the PUT body
    assert_eq!(hits[5].body, json!({ "title": "Pro+", "price": 24.9 }));
    assert_eq!(hits[9].body, Value::Null);
  }
}
