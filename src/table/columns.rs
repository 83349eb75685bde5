//! Column discovery and value lookup over heterogeneous company records.

use crate::api::types::{Company, Namespace};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// High-value columns, shown first and in this order when present.
pub const PRIORITY_COLUMNS: &[&str] = &[
  "name",
  "sireneData.siret",
  "chatGptData.mainSector",
  "chatGptData.businessSegment",
  "chatGptData.ownership",
  "chatGptData.isInCollectiveProcedure",
  "sireneData.activitePrincipaleNAF25UniteLegale",
  "sireneData.activitePrincipaleNAF25Etablissement",
  "chatGptData.subSector",
  "chatGptData.employees",
  "chatGptData.employeeCount",
  "chatGptData.extraKeywords",
  "chatGptData.isInternational",
  "chatGptData.continent",
  "chatGptData.country",
  "chatGptData.region",
  "chatGptData.department",
  "chatGptData.annualRevenue",
  "chatGptData.companyAgeYears",
  "chatGptData.seniorityYears",
  "chatGptData.registeredTrademarks",
  "chatGptData.patentsInnovations",
  "chatGptData.specificExpertise",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnKeyError {
  #[error("unknown namespace '{0}'")]
  UnknownNamespace(String),
  #[error("empty column key")]
  Empty,
}

/// A displayable field: top-level, or inside one of the nested namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
  Top(String),
  Nested(Namespace, String),
}

impl ColumnKey {
  /// Parse the dotted form (`name`, `sireneData.siret`).
  ///
  /// A prefix before the first dot must be a known namespace.
  pub fn parse(key: &str) -> Result<Self, ColumnKeyError> {
    if key.is_empty() {
      return Err(ColumnKeyError::Empty);
    }
    match key.split_once('.') {
      Some((prefix, field)) => {
        let ns = Namespace::from_field(prefix)
          .ok_or_else(|| ColumnKeyError::UnknownNamespace(prefix.to_string()))?;
        if field.is_empty() {
          return Err(ColumnKeyError::Empty);
        }
        Ok(ColumnKey::Nested(ns, field.to_string()))
      }
      None => Ok(ColumnKey::Top(key.to_string())),
    }
  }

  pub fn field(&self) -> &str {
    match self {
      ColumnKey::Top(field) | ColumnKey::Nested(_, field) => field,
    }
  }

  pub fn namespace(&self) -> Option<Namespace> {
    match self {
      ColumnKey::Top(_) => None,
      ColumnKey::Nested(ns, _) => Some(*ns),
    }
  }
}

impl fmt::Display for ColumnKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ColumnKey::Top(field) => f.write_str(field),
      ColumnKey::Nested(ns, field) => write!(f, "{}.{}", ns.field(), field),
    }
  }
}

/// The priority list as keys.
pub fn priority_columns() -> Vec<ColumnKey> {
  PRIORITY_COLUMNS
    .iter()
    .filter_map(|key| ColumnKey::parse(key).ok())
    .collect()
}

/// Every column seen across `records`, priority columns first.
///
/// The union covers all records, not just the first. The namespace fields
/// themselves are not columns; their contents are. Non-priority columns
/// follow in lexicographic order of their dotted form.
pub fn derive_columns(records: &[Company]) -> Vec<ColumnKey> {
  let mut seen: BTreeMap<String, ColumnKey> = BTreeMap::new();

  for record in records {
    for (name, value) in record.fields() {
      match Namespace::from_field(name) {
        Some(ns) => {
          if let Some(nested) = value.as_object() {
            for field in nested.keys() {
              let key = ColumnKey::Nested(ns, field.clone());
              seen.entry(key.to_string()).or_insert(key);
            }
          }
        }
        None => {
          seen
            .entry(name.clone())
            .or_insert_with(|| ColumnKey::Top(name.clone()));
        }
      }
    }
  }

  let mut columns = Vec::with_capacity(seen.len());
  for key in PRIORITY_COLUMNS {
    if let Some(column) = seen.remove(*key) {
      columns.push(column);
    }
  }
  columns.extend(seen.into_values());
  columns
}

/// Value of `column` in `record`. Missing fields and JSON `null` are absent.
pub fn get_value<'a>(record: &'a Company, column: &ColumnKey) -> Option<&'a Value> {
  match column {
    ColumnKey::Top(field) => record.field(field),
    ColumnKey::Nested(ns, field) => record
      .namespace(*ns)?
      .get(field)
      .filter(|value| !value.is_null()),
  }
}

/// Lookup by dotted key. Unknown namespaces are an error, not an absence.
pub fn lookup<'a>(record: &'a Company, key: &str) -> Result<Option<&'a Value>, ColumnKeyError> {
  let column = ColumnKey::parse(key)?;
  Ok(get_value(record, &column))
}
