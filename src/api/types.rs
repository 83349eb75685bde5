//! Entity shapes returned by the backoffice API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ============================================================================
// Companies
// ============================================================================

/// Nested field groups inside a company record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
  /// Administrative registry data (SIRENE)
  Registry,
  /// Strategic analysis data
  Analysis,
}

impl Namespace {
  pub const ALL: [Namespace; 2] = [Namespace::Registry, Namespace::Analysis];

  /// Field name of the sub-object on the wire.
  pub fn field(self) -> &'static str {
    match self {
      Namespace::Registry => "sireneData",
      Namespace::Analysis => "chatGptData",
    }
  }

  pub fn from_field(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|ns| ns.field() == name)
  }

  pub fn label(self) -> &'static str {
    match self {
      Namespace::Registry => "Registry data",
      Namespace::Analysis => "Analysis",
    }
  }
}

impl fmt::Display for Namespace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.field())
  }
}

/// One company, kept as the raw JSON mapping the API sends.
///
/// Records are heterogeneous: any field may be missing, and the two nested
/// namespaces carry open-ended sets of fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Company {
  fields: Map<String, Value>,
}

impl Company {
  pub fn from_map(fields: Map<String, Value>) -> Self {
    Self { fields }
  }

  /// All top-level fields, namespaces included.
  pub fn fields(&self) -> &Map<String, Value> {
    &self.fields
  }

  /// Top-level field, with JSON `null` treated as absent.
  pub fn field(&self, name: &str) -> Option<&Value> {
    self.fields.get(name).filter(|v| !v.is_null())
  }

  /// Numeric identifier; absent for unsaved records.
  pub fn id(&self) -> Option<i64> {
    self.field("id").and_then(Value::as_i64)
  }

  pub fn name(&self) -> Option<&str> {
    self.field("name").and_then(Value::as_str)
  }

  pub fn short_tag(&self) -> Option<&str> {
    self.field("shortTag").and_then(Value::as_str)
  }

  pub fn logo_url(&self) -> Option<&str> {
    self.field("logoUrl").and_then(Value::as_str)
  }

  /// The nested sub-object for `ns`, if present and an object.
  pub fn namespace(&self, ns: Namespace) -> Option<&Map<String, Value>> {
    self.fields.get(ns.field()).and_then(Value::as_object)
  }
}

impl From<Value> for Company {
  /// Non-object values become an empty record.
  fn from(value: Value) -> Self {
    match value {
      Value::Object(fields) => Self { fields },
      _ => Self::default(),
    }
  }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
  Client,
  Professional,
  MegaAdmin,
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionType {
  Free,
  Premium,
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: i64,
  pub email: String,
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name: String,
  pub address: Option<String>,
  pub city: Option<String>,
  pub latitude: Option<f64>,
  pub longitude: Option<f64>,
  pub birth_date: Option<String>,
  pub user_type: Option<UserType>,
  pub subscription_type: Option<SubscriptionType>,
  pub subscription_date: Option<String>,
  pub renewal_date: Option<String>,
  pub subscription_amount: Option<f64>,
  pub profession: Option<String>,
  pub category: Option<String>,
  pub establishment_name: Option<String>,
  pub establishment_description: Option<String>,
  pub phone_number: Option<String>,
  pub website: Option<String>,
  pub instagram: Option<String>,
  pub opening_hours: Option<String>,
  pub referral_code: Option<String>,
  pub wallet_balance: Option<f64>,
  pub has_connected_before: Option<bool>,
}

impl User {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
      .trim()
      .to_string()
  }
}

// ============================================================================
// Subscriptions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanCategory {
  Individual,
  Family,
  Professional,
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanDuration {
  Monthly,
  Annual,
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
  pub id: i64,
  pub title: String,
  #[serde(default)]
  pub description: String,
  pub price: f64,
  pub category: Option<PlanCategory>,
  pub duration: Option<PlanDuration>,
  #[serde(default)]
  pub referral_reward: f64,
}

/// Fields accepted when creating or editing a plan. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub price: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<PlanCategory>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration: Option<PlanDuration>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub referral_reward: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
  Pending,
  Succeeded,
  Failed,
  Cancelled,
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
  pub id: i64,
  pub amount: f64,
  #[serde(default)]
  pub payment_date: String,
  pub status: PaymentStatus,
  pub stripe_payment_intent_id: Option<String>,
}

// ============================================================================
// Offers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferType {
  Offre,
  Evenement,
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
  Active,
  Inactive,
  Draft,
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
  pub id: Option<i64>,
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub price: f64,
  #[serde(default)]
  pub start_date: String,
  #[serde(default)]
  pub end_date: String,
  pub image_url: Option<String>,
  #[serde(rename = "type")]
  pub offer_type: OfferType,
  pub status: OfferStatus,
  #[serde(default)]
  pub is_featured: bool,
}

// ============================================================================
// Wallet
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletUser {
  pub id: i64,
  pub email: String,
}

/// One wallet movement. Negative amounts are spending, positive are gains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
  pub id: i64,
  pub amount: f64,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub date: String,
  pub user: Option<WalletUser>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletRequestStatus {
  Pending,
  Approved,
  Rejected,
  Completed,
}

impl WalletRequestStatus {
  pub const ALL: [WalletRequestStatus; 4] = [
    WalletRequestStatus::Pending,
    WalletRequestStatus::Approved,
    WalletRequestStatus::Rejected,
    WalletRequestStatus::Completed,
  ];

  /// Wire value, as sent in the `status` query parameter.
  pub fn as_str(self) -> &'static str {
    match self {
      WalletRequestStatus::Pending => "PENDING",
      WalletRequestStatus::Approved => "APPROVED",
      WalletRequestStatus::Rejected => "REJECTED",
      WalletRequestStatus::Completed => "COMPLETED",
    }
  }
}

impl fmt::Display for WalletRequestStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A user's request to spend their wallet with professionals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRequest {
  pub id: i64,
  pub total_amount: f64,
  pub status: WalletRequestStatus,
  /// Free-form breakdown, e.g. "Hairdresser Nice: 10€"
  #[serde(default)]
  pub professionals: String,
  #[serde(default)]
  pub created_at: String,
  pub user: Option<WalletUser>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

// ============================================================================
// Statistics
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionTypeCounts {
  #[serde(rename = "FREE", default)]
  pub free: u64,
  #[serde(rename = "PREMIUM", default)]
  pub premium: u64,
}

/// Global dashboard totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  #[serde(default)]
  pub total_users: u64,
  #[serde(default)]
  pub active_users: u64,
  #[serde(default)]
  pub total_professionals: u64,
  #[serde(default)]
  pub total_offers: u64,
  #[serde(default)]
  pub current_month_revenue: f64,
  #[serde(default)]
  pub users_by_subscription_type: SubscriptionTypeCounts,
  /// Category name (e.g. BEAUTE_ESTHETIQUE) to count
  #[serde(default)]
  pub professionals_by_category: std::collections::BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCounts {
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub new: u64,
  #[serde(default)]
  pub active: u64,
  pub active_users: Option<u64>,
  pub total_users: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferCounts {
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub active: u64,
  #[serde(default)]
  pub inactive: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
  #[serde(default)]
  pub total: f64,
  #[serde(default)]
  pub average: f64,
  #[serde(default)]
  pub changes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletStats {
  #[serde(default)]
  pub total: f64,
  #[serde(default)]
  pub transactions: u64,
  #[serde(default)]
  pub average: f64,
}

/// Statistics for one calendar month. Past months can be frozen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatistics {
  pub year: i32,
  pub month: u32,
  #[serde(default)]
  pub users: UserCounts,
  #[serde(default)]
  pub offers: OfferCounts,
  #[serde(default)]
  pub prices: PriceStats,
  #[serde(default)]
  pub cagnotte: WalletStats,
  pub revenue: Option<f64>,
  pub frozen: Option<bool>,
  pub frozen_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardHistory {
  pub current: MonthlyStatistics,
  #[serde(default)]
  pub history: Vec<MonthlyStatistics>,
}

/// Detailed breakdowns. Kept loosely typed: the backend adds sections freely.
pub type DetailedStatistics = Map<String, Value>;

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_company_accessors() {
    let company = Company::from(json!({
      "id": 7,
      "name": "Acme",
      "shortTag": "ACM",
      "logoUrl": null,
      "sireneData": { "siret": "123" },
      "chatGptData": "not an object"
    }));

    assert_eq!(company.id(), Some(7));
    assert_eq!(company.name(), Some("Acme"));
    assert_eq!(company.short_tag(), Some("ACM"));
    assert_eq!(company.logo_url(), None);
    assert_eq!(
      company
        .namespace(Namespace::Registry)
        .and_then(|m| m.get("siret")),
      Some(&json!("123"))
    );
    assert!(company.namespace(Namespace::Analysis).is_none());
  }

  #[test]
  fn test_namespace_field_names() {
    assert_eq!(Namespace::from_field("sireneData"), Some(Namespace::Registry));
    assert_eq!(Namespace::from_field("chatGptData"), Some(Namespace::Analysis));
    assert_eq!(Namespace::from_field("other"), None);
  }

  #[test]
  fn test_unknown_enum_values_are_tolerated() {
    let user: User = serde_json::from_value(json!({
      "id": 1,
      "email": "a@b.c",
      "firstName": "Ana",
      "lastName": "Bel",
      "userType": "SUPPORT",
      "subscriptionType": "PREMIUM"
    }))
    .unwrap();

    assert_eq!(user.user_type, Some(UserType::Unknown));
    assert_eq!(user.subscription_type, Some(SubscriptionType::Premium));
    assert_eq!(user.full_name(), "Ana Bel");
  }

  #[test]
  fn test_wallet_request_keeps_extra_fields() {
    let request: WalletRequest = serde_json::from_value(json!({
      "id": 3,
      "totalAmount": 25.0,
      "status": "PENDING",
      "professionals": "Hairdresser Nice: 10€",
      "createdAt": "2025-01-02",
      "user": { "id": 9, "email": "u@x.fr" },
      "note": "urgent"
    }))
    .unwrap();

    assert_eq!(request.status, WalletRequestStatus::Pending);
    assert_eq!(request.extra.get("note"), Some(&json!("urgent")));
  }

  #[test]
  fn test_plan_input_omits_unset_fields() {
    let input = PlanInput {
      title: Some("Family".to_string()),
      price: Some(9.99),
      ..Default::default()
    };
    assert_eq!(
      serde_json::to_value(&input).unwrap(),
      json!({ "title": "Family", "price": 9.99 })
    );
  }
}
