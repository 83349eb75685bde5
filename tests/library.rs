//! The api, cache and table modules used from outside the binary.

use backoffice::api::types::{Company, Namespace};
use backoffice::table::{compute_view, derive_columns, lookup, ColumnKeyError};
use backoffice::{ApiError, CacheSource, ColumnKey, FetchCache, ViewState};
use serde_json::{json, Value};
use std::time::Duration;

fn company(value: Value) -> Company {
  match value {
    Value::Object(map) => Company::from_map(map),
    other => panic!("not an object: {}", other),
  }
}

#[test]
fn test_filter_and_sort_companies_by_dotted_key() {
  let records = vec![
    company(json!({ "id": 1, "name": "Zeta", "chatGptData": { "region": "Bretagne" } })),
    company(json!({ "id": 2, "name": "Alpha", "chatGptData": { "region": "Bretagne" } })),
    company(json!({ "id": 3, "name": "Mid", "chatGptData": { "region": "Occitanie" } })),
  ];
  let columns = derive_columns(&records);

  let region = ColumnKey::parse("chatGptData.region").unwrap();
  assert_eq!(region.namespace(), Some(Namespace::Analysis));
  assert!(columns.contains(&region));

  let mut state = ViewState::default();
  state.set_filter(region, "bretagne");
  state.toggle_sort(&ColumnKey::parse("name").unwrap());

  let names: Vec<&str> = compute_view(&records, &columns, &state)
    .into_iter()
    .filter_map(Company::name)
    .collect();
  assert_eq!(names, vec!["Alpha", "Zeta"]);
}

#[test]
fn test_lookup_rejects_unknown_namespace() {
  let record = company(json!({ "sireneData": { "siret": "123" } }));
  assert_eq!(
    lookup(&record, "sireneData.siret").unwrap(),
    Some(&json!("123"))
  );
  assert_eq!(
    lookup(&record, "inseeData.siret"),
    Err(ColumnKeyError::UnknownNamespace("inseeData".to_string()))
  );
}

#[tokio::test]
async fn test_fetch_cache_serves_stale_slot_when_offline() {
  let cache: FetchCache<Vec<u32>> = FetchCache::new(Duration::ZERO);

  let first = cache
    .fetch(|| async { Ok::<_, ApiError>(vec![1, 2]) })
    .await
    .unwrap();
  assert_eq!(first.source, CacheSource::Network);

  let second = cache
    .fetch(|| async { Err::<Vec<u32>, _>(ApiError::Network) })
    .await
    .unwrap();
  assert!(second.source.is_stale());
  assert_eq!(second.map(|data| data.len()).data, 2);
}

#[test]
fn test_api_error_accessors() {
  let rejected = ApiError::Api {
    status: 404,
    message: "Company not found".to_string(),
  };
  assert_eq!(rejected.status(), Some(404));
  assert!(!rejected.is_network());
  assert!(ApiError::Network.is_network());
  assert_eq!(ApiError::Network.status(), None);
}
