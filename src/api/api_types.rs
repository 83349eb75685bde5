//! Request and response bodies that only exist on the wire.

use super::types::{SubscriptionType, User, UserType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct SigninRequest<'a> {
  pub email: &'a str,
  pub password: &'a str,
}

/// Response to `/authenticate`. The backend may add fields freely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigninResponse {
  pub token: Option<String>,
  pub user: Option<User>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
  pub email: String,
  pub password: String,
  pub first_name: String,
  pub last_name: String,
  pub user_type: UserType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub city: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub birth_date: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subscription_type: Option<SubscriptionType>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subscription_plan_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub profession: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub referral_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest<'a> {
  pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest<'a> {
  pub token: &'a str,
  pub password: &'a str,
}

/// Partial profile update; unset fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub first_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub city: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone_number: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub profession: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub establishment_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub establishment_description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub website: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instagram: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub opening_hours: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
  pub current_password: String,
  pub new_password: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub confirm_password: Option<String>,
}

/// Query for `/v1/users/professionals/search`. Unset criteria are not sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProfessionals {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub city: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub first_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWalletRequest {
  pub amount: f64,
  /// Free-form breakdown, e.g. "Hairdresser Nice: 10€"
  pub professionals: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FreezeMonth {
  pub year: i32,
  pub month: u32,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NameQuery<'a> {
  pub name: &'a str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct StatusQuery<'a> {
  pub status: &'a str,
}
