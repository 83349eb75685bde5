//! Search, filter and sort over the loaded records.

use super::columns::{get_value, ColumnKey};
use super::format::{compare_values, contains_ignore_case};
use crate::api::types::{Company, Namespace};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
  Ascending,
  Descending,
}

impl SortDirection {
  pub fn arrow(self) -> &'static str {
    match self {
      SortDirection::Ascending => "▲",
      SortDirection::Descending => "▼",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
  pub column: ColumnKey,
  pub direction: SortDirection,
}

/// Search, filter and sort inputs owned by the companies view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
  /// Matched against every column
  pub search: String,
  pub filter_column: Option<ColumnKey>,
  pub filter_value: String,
  pub sort: Option<Sort>,
}

impl ViewState {
  /// Cycle the sort on `column`: ascending, descending, then unsorted.
  /// A different column always starts at ascending.
  pub fn toggle_sort(&mut self, column: &ColumnKey) {
    self.sort = match self.sort.take() {
      Some(Sort {
        column: current,
        direction,
      }) if current == *column => match direction {
        SortDirection::Ascending => Some(Sort {
          column: current,
          direction: SortDirection::Descending,
        }),
        SortDirection::Descending => None,
      },
      _ => Some(Sort {
        column: column.clone(),
        direction: SortDirection::Ascending,
      }),
    };
  }

  pub fn sort_direction(&self, column: &ColumnKey) -> Option<SortDirection> {
    self
      .sort
      .as_ref()
      .filter(|s| s.column == *column)
      .map(|s| s.direction)
  }

  pub fn set_filter(&mut self, column: ColumnKey, value: impl Into<String>) {
    self.filter_column = Some(column);
    self.filter_value = value.into();
  }

  pub fn clear_filter(&mut self) {
    self.filter_column = None;
    self.filter_value.clear();
  }

  pub fn clear(&mut self) {
    *self = ViewState::default();
  }

  /// Whether anything narrows or reorders the rows.
  pub fn has_active_filters(&self) -> bool {
    !self.search.is_empty() || self.filter_column.is_some() || self.sort.is_some()
  }

  /// The column filter, only when both column and value are set.
  pub fn active_filter(&self) -> Option<(&ColumnKey, &str)> {
    match &self.filter_column {
      Some(column) if !self.filter_value.is_empty() => Some((column, self.filter_value.as_str())),
      _ => None,
    }
  }
}

fn matches(value: Option<&Value>, needle: &str) -> bool {
  value.is_some_and(|v| contains_ignore_case(v, needle))
}

/// Absent values sort last whatever the direction.
fn compare_present_first(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
  match (a, b) {
    (None, None) => Ordering::Equal,
    (None, Some(_)) => Ordering::Greater,
    (Some(_), None) => Ordering::Less,
    (Some(a), Some(b)) => {
      let ord = compare_values(a, b);
      match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
      }
    }
  }
}

/// Indices into `records` of the visible rows, in display order.
///
/// Search and filter run first, then a stable sort. `records` is never
/// reordered.
pub fn compute_view_indices(
  records: &[Company],
  columns: &[ColumnKey],
  state: &ViewState,
) -> Vec<usize> {
  let mut indices: Vec<usize> = (0..records.len()).collect();

  if !state.search.is_empty() {
    indices.retain(|&i| {
      columns
        .iter()
        .any(|column| matches(get_value(&records[i], column), &state.search))
    });
  }

  if let Some((column, value)) = state.active_filter() {
    indices.retain(|&i| matches(get_value(&records[i], column), value));
  }

  if let Some(sort) = &state.sort {
    indices.sort_by(|&a, &b| {
      compare_present_first(
        get_value(&records[a], &sort.column),
        get_value(&records[b], &sort.column),
        sort.direction,
      )
    });
  }

  indices
}

/// The visible rows, in display order.
pub fn compute_view<'a>(
  records: &'a [Company],
  columns: &[ColumnKey],
  state: &ViewState,
) -> Vec<&'a Company> {
  compute_view_indices(records, columns, state)
    .into_iter()
    .map(|i| &records[i])
    .collect()
}

/// Sum of numeric annual revenue over `rows`. Non-numeric values are skipped.
pub fn total_annual_revenue<'a>(rows: impl IntoIterator<Item = &'a Company>) -> f64 {
  let column = ColumnKey::Nested(Namespace::Analysis, "annualRevenue".to_string());
  rows
    .into_iter()
    .filter_map(|record| get_value(record, &column).and_then(Value::as_f64))
    .filter(|v| v.is_finite())
    .sum()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::table::columns::derive_columns;
  use serde_json::json;

  fn records(values: Vec<Value>) -> Vec<Company> {
    values.into_iter().map(Company::from).collect()
  }

  fn top(name: &str) -> ColumnKey {
    ColumnKey::Top(name.to_string())
  }

  fn values_of<'a>(rows: &[&'a Company], column: &str) -> Vec<Option<&'a Value>> {
    rows.iter().map(|r| r.field(column)).collect()
  }

  #[test]
  fn test_search_is_case_insensitive_substring() {
    let data = records(vec![json!({ "name": "Acme" }), json!({ "name": "beta" })]);
    let columns = derive_columns(&data);
    let state = ViewState {
      search: "ACM".to_string(),
      ..Default::default()
    };

    let view = compute_view(&data, &columns, &state);
    assert_eq!(view, vec![&data[0]]);
  }

  #[test]
  fn test_search_matches_any_column() {
    let data = records(vec![
      json!({ "name": "Acme", "chatGptData": { "country": "France" } }),
      json!({ "name": "Beta", "chatGptData": { "country": "Spain" } }),
      json!({ "name": "Gamma" }),
    ]);
    let columns = derive_columns(&data);
    let state = ViewState {
      search: "spa".to_string(),
      ..Default::default()
    };

    assert_eq!(compute_view_indices(&data, &columns, &state), vec![1]);
  }

  #[test]
  fn test_absent_values_never_match() {
    let data = records(vec![json!({ "name": null }), json!({ "name": "null" })]);
    let columns = derive_columns(&data);
    let state = ViewState {
      search: "nul".to_string(),
      ..Default::default()
    };

    assert_eq!(compute_view_indices(&data, &columns, &state), vec![1]);
  }

  #[test]
  fn test_column_filter_needs_column_and_value() {
    let data = records(vec![
      json!({ "name": "Acme", "city": "Nice" }),
      json!({ "name": "Nicely", "city": "Lyon" }),
    ]);
    let columns = derive_columns(&data);

    let mut state = ViewState::default();
    state.set_filter(top("city"), "");
    assert_eq!(compute_view_indices(&data, &columns, &state), vec![0, 1]);

    state.set_filter(top("city"), "NIC");
    assert_eq!(compute_view_indices(&data, &columns, &state), vec![0]);
  }

  #[test]
  fn test_filter_applies_with_search() {
    let data = records(vec![
      json!({ "name": "Acme Nice", "city": "Nice" }),
      json!({ "name": "Acme Lyon", "city": "Lyon" }),
      json!({ "name": "Beta", "city": "Nice" }),
    ]);
    let columns = derive_columns(&data);
    let mut state = ViewState {
      search: "acme".to_string(),
      ..Default::default()
    };
    state.set_filter(top("city"), "nice");

    assert_eq!(compute_view_indices(&data, &columns, &state), vec![0]);
  }

  #[test]
  fn test_sort_absent_last_both_directions() {
    let data = records(vec![json!({ "n": 1 }), json!({ "n": null }), json!({ "n": 2 })]);
    let columns = derive_columns(&data);
    let mut state = ViewState::default();

    state.toggle_sort(&top("n"));
    let asc = compute_view(&data, &columns, &state);
    assert_eq!(values_of(&asc, "n"), vec![Some(&json!(1)), Some(&json!(2)), None]);

    state.toggle_sort(&top("n"));
    let desc = compute_view(&data, &columns, &state);
    assert_eq!(values_of(&desc, "n"), vec![Some(&json!(2)), Some(&json!(1)), None]);
  }

  #[test]
  fn test_numbers_sort_numerically() {
    let data = records(vec![json!({ "n": 10 }), json!({ "n": 9 }), json!({ "n": 100.5 })]);
    let columns = derive_columns(&data);
    let mut state = ViewState::default();
    state.toggle_sort(&top("n"));

    assert_eq!(compute_view_indices(&data, &columns, &state), vec![1, 0, 2]);
  }

  #[test]
  fn test_strings_sort_case_and_accent_insensitively() {
    let data = records(vec![
      json!({ "name": "zeta" }),
      json!({ "name": "Étoile" }),
      json!({ "name": "alpha" }),
      json!({ "name": "Beta" }),
    ]);
    let columns = derive_columns(&data);
    let mut state = ViewState::default();
    state.toggle_sort(&top("name"));

    assert_eq!(compute_view_indices(&data, &columns, &state), vec![2, 3, 1, 0]);
  }

  #[test]
  fn test_sort_is_stable() {
    let data = records(vec![
      json!({ "id": 1, "k": "b" }),
      json!({ "id": 2, "k": "a" }),
      json!({ "id": 3, "k": "b" }),
      json!({ "id": 4, "k": "a" }),
    ]);
    let columns = derive_columns(&data);
    let mut state = ViewState::default();

    state.toggle_sort(&top("k"));
    assert_eq!(compute_view_indices(&data, &columns, &state), vec![1, 3, 0, 2]);

    state.toggle_sort(&top("k"));
    assert_eq!(compute_view_indices(&data, &columns, &state), vec![0, 2, 1, 3]);
  }

  #[test]
  fn test_sort_cycle_restores_original_order() {
    let data = records(vec![json!({ "n": 3 }), json!({ "n": 1 }), json!({ "n": 2 })]);
    let columns = derive_columns(&data);
    let mut state = ViewState::default();

    state.toggle_sort(&top("n"));
    assert_eq!(state.sort_direction(&top("n")), Some(SortDirection::Ascending));
    state.toggle_sort(&top("n"));
    assert_eq!(state.sort_direction(&top("n")), Some(SortDirection::Descending));
    state.toggle_sort(&top("n"));
    assert_eq!(state.sort, None);

    assert_eq!(compute_view_indices(&data, &columns, &state), vec![0, 1, 2]);
  }

  #[test]
  fn test_toggling_another_column_restarts_ascending() {
    let mut state = ViewState::default();
    state.toggle_sort(&top("a"));
    state.toggle_sort(&top("a"));
    state.toggle_sort(&top("b"));

    assert_eq!(
      state.sort,
      Some(Sort {
        column: top("b"),
        direction: SortDirection::Ascending
      })
    );
  }

  #[test]
  fn test_input_is_not_mutated() {
    let data = records(vec![json!({ "n": 2 }), json!({ "n": 1 })]);
    let before = data.clone();
    let columns = derive_columns(&data);
    let mut state = ViewState::default();
    state.toggle_sort(&top("n"));

    compute_view(&data, &columns, &state);
    assert_eq!(data, before);
  }

  #[test]
  fn test_clear_and_active_flags() {
    let mut state = ViewState::default();
    assert!(!state.has_active_filters());

    state.toggle_sort(&top("n"));
    assert!(state.has_active_filters());

    state.search = "x".to_string();
    state.set_filter(top("n"), "1");
    state.clear();
    assert_eq!(state, ViewState::default());
  }

  #[test]
  fn test_total_annual_revenue_skips_non_numbers() {
    let data = records(vec![
      json!({ "chatGptData": { "annualRevenue": 1000.5 } }),
      json!({ "chatGptData": { "annualRevenue": "n/a" } }),
      json!({ "chatGptData": { "annualRevenue": 500 } }),
      json!({ "name": "no analysis" }),
    ]);

    assert_eq!(total_annual_revenue(&data), 1500.5);
  }
}
