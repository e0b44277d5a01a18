use chrono::Utc;

use crate::movie::{ApiMovie, CUSTOM_ID_PREFIX, CustomMovie, MovieId, MovieRecord};

/// Concatenate user-entered records ahead of API records, preserving each side's order.
pub fn compose(user: &[MovieRecord], api: &[MovieRecord]) -> Vec<MovieRecord> {
  let mut all = Vec::with_capacity(user.len() + api.len());
  all.extend_from_slice(user);
  all.extend_from_slice(api);
  all
}

/// Hands out time-based identifiers for user-entered records.
///
/// Millisecond timestamps alone can repeat when two records are added within the
/// same millisecond, so the generator never issues a value at or below the last one.
#[derive(Debug, Default)]
pub struct IdGenerator {
  last: i64,
}

impl IdGenerator {
  pub fn next_id(&mut self) -> MovieId {
    self.next_at(Utc::now().timestamp_millis())
  }

  fn next_at(&mut self, now_millis: i64) -> MovieId {
    let value = now_millis.max(self.last + 1);
    self.last = value;
    MovieId::Custom(format!("{}{}", CUSTOM_ID_PREFIX, value))
  }
}

/// Session catalog: user-entered records (newest first) plus the current API page.
#[derive(Debug, Default)]
pub struct Catalog {
  custom: Vec<MovieRecord>,
  api: Vec<MovieRecord>,
  entries: Vec<MovieRecord>,
}

impl Catalog {
  /// Combined view, user records first.
  pub fn entries(&self) -> &[MovieRecord] {
    &self.entries
  }

  pub fn custom_count(&self) -> usize {
    self.custom.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn add_custom(&mut self, movie: CustomMovie) {
    self.custom.insert(0, MovieRecord::Custom(movie));
    self.rebuild();
  }

  /// Replace the API side with a freshly fetched page. User records are kept.
  pub fn replace_api(&mut self, results: Vec<ApiMovie>) {
    self.api = results.into_iter().map(MovieRecord::Api).collect();
    self.rebuild();
  }

  pub fn get(&self, id: &MovieId) -> Option<&MovieRecord> {
    self.entries.iter().find(|r| &r.id() == id)
  }

  fn rebuild(&mut self) {
    self.entries = compose(&self.custom, &self.api);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn api_record(id: u64) -> MovieRecord {
    MovieRecord::Api(ApiMovie { id, title: Some(format!("Movie {}", id)), ..Default::default() })
  }

  fn custom_movie(id: &str, title: &str) -> CustomMovie {
    CustomMovie {
      id: MovieId::Custom(id.to_string()),
      title: title.to_string(),
      year: 2001,
      description: None,
      poster: "https://example.com/p.jpg".to_string(),
      trailer: None,
    }
  }

  // --- compose ---

  #[test]
  fn compose_puts_user_records_first() {
    let user = vec![MovieRecord::Custom(custom_movie("custom-2", "B")), MovieRecord::Custom(custom_movie("custom-1", "A"))];
    let api = vec![api_record(10), api_record(11), api_record(12)];
    let all = compose(&user, &api);
    assert_eq!(all.len(), 5);
    assert!(all[..2].iter().all(MovieRecord::is_custom));
    assert!(all[2..].iter().all(|r| !r.is_custom()));
    let ids: Vec<String> = all.iter().map(|r| r.id().to_string()).collect();
    assert_eq!(ids, ["custom-2", "custom-1", "10", "11", "12"]);
  }

  #[test]
  fn compose_with_empty_sides() {
    let api = vec![api_record(1)];
    assert_eq!(compose(&[], &api), api);
    assert_eq!(compose(&api, &[]), api);
    assert!(compose(&[], &[]).is_empty());
  }

  // --- IdGenerator ---

  #[test]
  fn ids_are_unique_within_same_millisecond() {
    let mut ids = IdGenerator::default();
    let a = ids.next_at(1_000);
    let b = ids.next_at(1_000);
    let c = ids.next_at(999);
    assert_eq!(a, MovieId::Custom("custom-1000".to_string()));
    assert_eq!(b, MovieId::Custom("custom-1001".to_string()));
    assert_eq!(c, MovieId::Custom("custom-1002".to_string()));
  }

  #[test]
  fn generated_ids_round_trip_through_parse() {
    let mut ids = IdGenerator::default();
    let id = ids.next_id();
    assert_eq!(MovieId::parse(&id.to_string()), Some(id));
  }

  // --- Catalog ---

  #[test]
  fn custom_records_survive_api_refresh() {
    let mut catalog = Catalog::default();
    catalog.replace_api(vec![ApiMovie { id: 1, ..Default::default() }]);
    catalog.add_custom(custom_movie("custom-1", "First"));
    catalog.add_custom(custom_movie("custom-2", "Second"));
    catalog.replace_api(vec![ApiMovie { id: 7, ..Default::default() }, ApiMovie { id: 8, ..Default::default() }]);

    let ids: Vec<String> = catalog.entries().iter().map(|r| r.id().to_string()).collect();
    assert_eq!(ids, ["custom-2", "custom-1", "7", "8"]);
    assert_eq!(catalog.custom_count(), 2);
    assert!(catalog.get(&MovieId::Tmdb(1)).is_none());
    assert!(catalog.get(&MovieId::Custom("custom-1".to_string())).is_some());
  }
}
