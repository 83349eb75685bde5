use super::api_types::FreezeMonth;
use super::client::BackofficeClient;
use super::error::ApiError;
use super::types::{DashboardHistory, DashboardStats, DetailedStatistics, MonthlyStatistics};
use reqwest::Method;
use tracing::info;

impl BackofficeClient {
  /// Global totals for the dashboard cards.
  pub async fn get_dashboard(&self) -> Result<DashboardStats, ApiError> {
    self.api.get("/v1/statistics/dashboard").await
  }

  /// Current month plus history.
  pub async fn get_dashboard_full(&self) -> Result<DashboardHistory, ApiError> {
    self.api.get("/v1/statistics/dashboard/full").await
  }

  pub async fn get_current_statistics(&self) -> Result<MonthlyStatistics, ApiError> {
    self.api.get("/v1/statistics/current").await
  }

  pub async fn get_statistics_history(&self) -> Result<Vec<MonthlyStatistics>, ApiError> {
    self.api.get("/v1/statistics/history").await
  }

  /// Freeze last month's numbers so later edits do not rewrite history.
  pub async fn freeze_previous_month(&self) -> Result<(), ApiError> {
    let request = self
      .api
      .request(Method::POST, "/v1/statistics/freeze-previous")?;
    self.api.execute_unit(request).await?;
    info!("froze previous month");
    Ok(())
  }

  pub async fn freeze_month(&self, month: FreezeMonth) -> Result<(), ApiError> {
    let request = self
      .api
      .request(Method::POST, "/v1/statistics/freeze")?
      .query(&month);
    self.api.execute_unit(request).await?;
    info!(year = month.year, month = month.month, "froze month");
    Ok(())
  }

  pub async fn get_detailed_statistics(&self) -> Result<DetailedStatistics, ApiError> {
    self.api.get("/v1/statistics/detailed").await
  }
}

#[cfg(test)]
mod tests {
  use super::super::testing::{client, serve};
  use super::*;
  use axum::extract::RawQuery;
  use axum::http::StatusCode;
  use axum::routing::{get, post};
  use axum::{Json, Router};
  use serde_json::json;

  #[tokio::test]
  async fn test_dashboard_decodes_partial_payload() {
    let app = Router::new().route(
      "/api/v1/statistics/dashboard",
      get(|| async {
        Json(json!({
          "totalUsers": 120,
          "currentMonthRevenue": 450.5,
          "usersBySubscriptionType": { "FREE": 100, "PREMIUM": 20 },
          "professionalsByCategory": { "FOOD_PLAISIRS": 7 }
        }))
      }),
    );
    let url = serve(app).await;

    let stats = client(&url, None).get_dashboard().await.unwrap();
    assert_eq!(stats.total_users, 120);
    assert_eq!(stats.active_users, 0);
    assert_eq!(stats.users_by_subscription_type.premium, 20);
    assert_eq!(stats.professionals_by_category.get("FOOD_PLAISIRS"), Some(&7));
  }

  #[tokio::test]
  async fn test_freeze_month_sends_query() {
    let app = Router::new().route(
      "/api/v1/statistics/freeze",
      post(|RawQuery(q): RawQuery| async move {
        if q.as_deref() == Some("year=2025&month=2") {
          StatusCode::OK
        } else {
          StatusCode::BAD_REQUEST
        }
      }),
    );
    let url = serve(app).await;

    client(&url, None)
      .freeze_month(FreezeMonth {
        year: 2025,
        month: 2,
      })
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn test_freeze_failure_synthesizes_message() {
    let app = Router::new().route(
      "/api/v1/statistics/freeze-previous",
      post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let url = serve(app).await;

    let err = client(&url, None).freeze_previous_month().await.unwrap_err();
    assert_eq!(err.to_string(), "Error 503: Service Unavailable");
  }
}
