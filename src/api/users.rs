use super::api_types::{ChangePassword, SearchProfessionals, UpdateProfile};
use super::client::BackofficeClient;
use super::error::ApiError;
use super::types::User;
use reqwest::Method;

impl BackofficeClient {
  /// Clients, professionals and admins alike.
  pub async fn get_all_users(&self) -> Result<Vec<User>, ApiError> {
    self.api.get("/v1/users").await
  }

  pub async fn get_professionals(&self) -> Result<Vec<User>, ApiError> {
    self.api.get("/v1/users/professionals").await
  }

  pub async fn search_professionals(
    &self,
    params: &SearchProfessionals,
  ) -> Result<Vec<User>, ApiError> {
    let request = self
      .api
      .request(Method::GET, "/v1/users/professionals/search")?
      .query(params);
    self.api.execute(request).await
  }

  pub async fn get_favorites(&self) -> Result<Vec<User>, ApiError> {
    self.api.get("/v1/users/favorites").await
  }

  /// Update the signed-in user's profile.
  pub async fn update_profile(&self, update: &UpdateProfile) -> Result<User, ApiError> {
    self.api.put("/v1/users/profile", update).await
  }

  pub async fn change_password(&self, change: &ChangePassword) -> Result<(), ApiError> {
    let request = self
      .api
      .request(Method::POST, "/v1/users/change-password")?
      .json(change);
    self.api.execute_unit(request).await
  }

  pub async fn get_professional_categories(&self) -> Result<Vec<String>, ApiError> {
    self.api.get("/v1/users/professionals/categories").await
  }

  /// Users who signed up with `user_id`'s referral code.
  pub async fn get_referrals(&self, user_id: i64) -> Result<Vec<User>, ApiError> {
    self.api.get(&format!("/v1/users/{}/referrals", user_id)).await
  }
}

#[cfg(test)]
mod tests {
  use super::super::testing::{client, serve};
  use super::*;
  use axum::extract::{Path, RawQuery};
  use axum::routing::{get, post, put};
  use axum::{Json, Router};
  use serde_json::{json, Value};

  fn user(id: i64, first: &str) -> Value {
    json!({ "id": id, "email": format!("{}@x.fr", first.to_lowercase()), "firstName": first, "lastName": "Test" })
  }

  fn router() -> Router {
    Router::new()
      .route(
        "/api/v1/users/professionals/search",
        get(|RawQuery(q): RawQuery| async move {
          Json(json!([{ "id": 1, "email": q.unwrap_or_default() }]))
        }),
      )
      .route(
        "/api/v1/users/profile",
        put(|Json(body): Json<Value>| async move {
          let mut u = user(1, "Old");
          u["firstName"] = body["firstName"].clone();
          Json(u)
        }),
      )
      .route(
        "/api/v1/users/change-password",
        post(|Json(body): Json<Value>| async move {
          if body.get("currentPassword").is_some() && body.get("confirmPassword").is_none() {
            axum::http::StatusCode::OK
          } else {
            axum::http::StatusCode::BAD_REQUEST
          }
        }),
      )
      .route(
        "/api/v1/users/:id/referrals",
        get(|Path(id): Path<i64>| async move { Json(json!([user(id + 100, "Ref")])) }),
      )
      .route(
        "/api/v1/users/professionals/categories",
        get(|| async { Json(json!(["BEAUTE_ESTHETIQUE", "FOOD_PLAISIRS"])) }),
      )
  }

  #[tokio::test]
  async fn test_search_professionals_only_sends_set_criteria() {
    let url = serve(router()).await;
    let params = SearchProfessionals {
      city: Some("Nice".to_string()),
      first_name: Some("Ana".to_string()),
      ..Default::default()
    };

    let found = client(&url, None).search_professionals(&params).await.unwrap();
    assert_eq!(found[0].email, "city=Nice&firstName=Ana");
  }

  #[tokio::test]
  async fn test_update_profile_returns_user() {
    let url = serve(router()).await;
    let update = UpdateProfile {
      first_name: Some("New".to_string()),
      ..Default::default()
    };

    let user = client(&url, None).update_profile(&update).await.unwrap();
    assert_eq!(user.first_name, "New");
  }

  #[tokio::test]
  async fn test_change_password_omits_missing_confirmation() {
    let url = serve(router()).await;
    let change = ChangePassword {
      current_password: "old".to_string(),
      new_password: "new".to_string(),
      confirm_password: None,
    };
    client(&url, None).change_password(&change).await.unwrap();
  }

  #[tokio::test]
  async fn test_referrals_and_categories() {
    let url = serve(router()).await;
    let c = client(&url, None);

    let referrals = c.get_referrals(5).await.unwrap();
    assert_eq!(referrals[0].id, 105);

    let categories = c.get_professional_categories().await.unwrap();
    assert_eq!(categories, vec!["BEAUTE_ESTHETIQUE", "FOOD_PLAISIRS"]);
  }
}
