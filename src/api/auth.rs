use super::api_types::{
  ForgotPasswordRequest, RegistrationRequest, ResetPasswordRequest, SigninRequest, SigninResponse,
};
use super::client::BackofficeClient;
use super::error::ApiError;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

impl BackofficeClient {
  /// Create an account. The backend's reply shape varies, so it is returned raw.
  pub async fn signup(&self, registration: &RegistrationRequest) -> Result<Value, ApiError> {
    debug!(email = %registration.email, user_type = ?registration.user_type, "registering user");
    let request = self.auth.request(Method::POST, "/register")?.json(registration);
    self.auth.execute_value(request).await
  }

  pub async fn signin(&self, email: &str, password: &str) -> Result<SigninResponse, ApiError> {
    debug!(%email, "signing in");
    let response: SigninResponse = self
      .auth
      .post("/authenticate", &SigninRequest { email, password })
      .await
      .inspect_err(|e| warn!(%email, error = %e, "sign-in failed"))?;

    info!(
      %email,
      has_token = response.token.is_some(),
      user_id = response.user.as_ref().map(|u| u.id),
      "signed in"
    );
    Ok(response)
  }

  pub async fn forgot_password(&self, email: &str) -> Result<Value, ApiError> {
    let request = self
      .auth
      .request(Method::POST, "/forgot-password")?
      .json(&ForgotPasswordRequest { email });
    self.auth.execute_value(request).await
  }

  pub async fn reset_password(&self, token: &str, password: &str) -> Result<Value, ApiError> {
    let request = self
      .auth
      .request(Method::POST, "/reset-password")?
      .json(&ResetPasswordRequest { token, password });
    self.auth.execute_value(request).await
  }
}
