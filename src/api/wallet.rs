use super::api_types::{CreateWalletRequest, StatusQuery};
use super::client::BackofficeClient;
use super::error::ApiError;
use super::types::{WalletRequest, WalletRequestStatus, WalletTransaction};
use reqwest::Method;
use tracing::info;

impl BackofficeClient {
  /// The signed-in user's own wallet history.
  pub async fn get_wallet_history(&self) -> Result<Vec<WalletTransaction>, ApiError> {
    self.api.get("/v1/wallet/history").await
  }

  /// The signed-in user's own wallet requests.
  pub async fn get_wallet_requests(&self) -> Result<Vec<WalletRequest>, ApiError> {
    self.api.get("/v1/wallet/requests").await
  }

  pub async fn create_wallet_request(
    &self,
    request: &CreateWalletRequest,
  ) -> Result<WalletRequest, ApiError> {
    self.api.post("/v1/wallet/request", request).await
  }

  // Admin endpoints

  pub async fn get_admin_wallet_history(&self) -> Result<Vec<WalletTransaction>, ApiError> {
    self.api.get("/v1/wallet/admin/history").await
  }

  pub async fn get_admin_wallet_requests(&self) -> Result<Vec<WalletRequest>, ApiError> {
    self.api.get("/v1/wallet/admin/requests").await
  }

  /// Move a request to `status`. The status travels in the query string; no body.
  pub async fn update_wallet_request_status(
    &self,
    request_id: i64,
    status: WalletRequestStatus,
  ) -> Result<WalletRequest, ApiError> {
    let request = self
      .api
      .request(
        Method::PUT,
        &format!("/v1/wallet/admin/requests/{}/status", request_id),
      )?
      .query(&StatusQuery {
        status: status.as_str(),
      });
    let updated: WalletRequest = self.api.execute(request).await?;
    info!(request_id, %status, "updated wallet request");
    Ok(updated)
  }

  /// Zero a user's wallet.
  pub async fn reset_wallet(&self, user_id: i64) -> Result<(), ApiError> {
    let request = self
      .api
      .request(Method::POST, &format!("/v1/wallet/admin/reset/{}", user_id))?;
    self.api.execute_unit(request).await?;
    info!(user_id, "reset wallet");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::super::testing::{client, serve};
  use super::*;
  use axum::body::Bytes;
  use axum::extract::{Path, Query};
  use axum::routing::{post, put};
  use axum::{Json, Router};
  use serde_json::json;
  use std::collections::HashMap;

  fn router() -> Router {
    Router::new()
      .route(
        "/api/v1/wallet/admin/requests/:id/status",
        put(
          |Path(id): Path<i64>, Query(q): Query<HashMap<String, String>>, body: Bytes| async move {
            Json(json!({
              "id": id,
              "totalAmount": 10.0,
              "status": q.get("status").cloned().unwrap_or_default(),
              "professionals": "",
              "createdAt": "",
              "bodyLength": body.len()
            }))
          },
        ),
      )
      .route(
        "/api/v1/wallet/request",
        post(|Json(body): Json<serde_json::Value>| async move {
          Json(json!({
            "id": 1,
            "totalAmount": body["amount"],
            "status": "PENDING",
            "professionals": body["professionals"]
          }))
        }),
      )
  }

  #[tokio::test]
  async fn test_status_update_uses_query_and_no_body() {
    let url = serve(router()).await;
    let updated = client(&url, Some("admin"))
      .update_wallet_request_status(8, WalletRequestStatus::Approved)
      .await
      .unwrap();

    assert_eq!(updated.id, 8);
    assert_eq!(updated.status, WalletRequestStatus::Approved);
    assert_eq!(updated.extra.get("bodyLength"), Some(&json!(0)));
  }

  #[tokio::test]
  async fn test_create_request() {
    let url = serve(router()).await;
    let created = client(&url, None)
      .create_wallet_request(&CreateWalletRequest {
        amount: 25.0,
        professionals: "Hairdresser Nice: 10€".to_string(),
      })
      .await
      .unwrap();

    assert_eq!(created.total_amount, 25.0);
    assert_eq!(created.professionals, "Hairdresser Nice: 10€");
    assert_eq!(created.status, WalletRequestStatus::Pending);
  }
}
