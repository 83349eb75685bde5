use super::client::BackofficeClient;
use super::error::ApiError;
use super::types::{Payment, PlanInput, SubscriptionPlan};
use reqwest::Method;
use tracing::info;

impl BackofficeClient {
  pub async fn get_plans(&self) -> Result<Vec<SubscriptionPlan>, ApiError> {
    self.api.get("/v1/subscriptions/plans").await
  }

  /// Subscribe the signed-in user to `plan_id`.
  pub async fn subscribe(&self, plan_id: i64) -> Result<Payment, ApiError> {
    let request = self
      .api
      .request(Method::POST, &format!("/v1/subscriptions/subscribe/{}", plan_id))?;
    self.api.execute(request).await
  }

  pub async fn get_my_payments(&self) -> Result<Vec<Payment>, ApiError> {
    self.api.get("/v1/subscriptions/my-payments").await
  }

  pub async fn create_plan(&self, plan: &PlanInput) -> Result<SubscriptionPlan, ApiError> {
    let created: SubscriptionPlan = self.api.post("/v1/subscriptions/plans", plan).await?;
    info!(plan_id = created.id, title = %created.title, "created plan");
    Ok(created)
  }

  pub async fn update_plan(
    &self,
    plan_id: i64,
    plan: &PlanInput,
  ) -> Result<SubscriptionPlan, ApiError> {
    self
      .api
      .put(&format!("/v1/subscriptions/plans/{}", plan_id), plan)
      .await
  }

  pub async fn delete_plan(&self, plan_id: i64) -> Result<(), ApiError> {
    self
      .api
      .delete(&format!("/v1/subscriptions/plans/{}", plan_id))
      .await?;
    info!(plan_id, "deleted plan");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::super::testing::{client, serve};
  use super::super::types::{PaymentStatus, PlanDuration};
  use super::*;
  use axum::extract::Path;
  use axum::http::StatusCode;
  use axum::routing::{delete, post};
  use axum::{Json, Router};
  use serde_json::{json, Value};

  fn router() -> Router {
    Router::new()
      .route(
        "/api/v1/subscriptions/subscribe/:plan",
        post(|Path(plan): Path<i64>| async move {
          Json(json!({
            "id": plan + 1,
            "amount": 9.99,
            "paymentDate": "2025-01-01",
            "status": "SUCCEEDED"
          }))
        }),
      )
      .route(
        "/api/v1/subscriptions/plans",
        post(|Json(body): Json<Value>| async move {
          Json(json!({
            "id": 12,
            "title": body["title"],
            "description": "",
            "price": body["price"],
            "duration": body["duration"]
          }))
        }),
      )
      .route(
        "/api/v1/subscriptions/plans/:id",
        delete(|Path(id): Path<i64>| async move {
          if id == 1 {
            (StatusCode::CONFLICT, Json(json!({ "message": "Plan in use" })))
          } else {
            (StatusCode::OK, Json(Value::Null))
          }
        }),
      )
  }

  #[tokio::test]
  async fn test_subscribe_returns_payment() {
    let url = serve(router()).await;
    let payment = client(&url, Some("t")).subscribe(2).await.unwrap();
    assert_eq!(payment.id, 3);
    assert_eq!(payment.status, PaymentStatus::Succeeded);
  }

  #[tokio::test]
  async fn test_create_plan_sends_partial_body() {
    let url = serve(router()).await;
    let input = PlanInput {
      title: Some("Annual".to_string()),
      price: Some(99.0),
      duration: Some(PlanDuration::Annual),
      ..Default::default()
    };

    let plan = client(&url, None).create_plan(&input).await.unwrap();
    assert_eq!(plan.id, 12);
    assert_eq!(plan.title, "Annual");
    assert_eq!(plan.duration, Some(PlanDuration::Annual));
    assert_eq!(plan.category, None);
  }

  #[tokio::test]
  async fn test_delete_plan_surfaces_conflict() {
    let url = serve(router()).await;
    let c = client(&url, None);

    c.delete_plan(2).await.unwrap();
    let err = c.delete_plan(1).await.unwrap_err();
    assert_eq!(err.to_string(), "Plan in use");
  }
}
