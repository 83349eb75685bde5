use super::client::BackofficeClient;
use super::error::ApiError;
use super::types::Offer;

impl BackofficeClient {
  pub async fn get_all_offers(&self) -> Result<Vec<Offer>, ApiError> {
    self.api.get("/v1/offers").await
  }

  pub async fn get_active_offers(&self) -> Result<Vec<Offer>, ApiError> {
    self.api.get("/v1/offers/active").await
  }

  pub async fn get_offers_by_professional(
    &self,
    professional_id: i64,
  ) -> Result<Vec<Offer>, ApiError> {
    self
      .api
      .get(&format!("/v1/offers/professional/{}", professional_id))
      .await
  }
}
