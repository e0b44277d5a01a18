//! Detail view state: the selected record plus its trailer lookup.
//!
//! Loading happens in two stages. Stage one resolves the record (remote for
//! TMDb ids, from the session catalog for custom ids). Stage two searches for a
//! trailer and runs again only when the record's display title or year changes.

use tracing::{debug, warn};

use crate::movie::{ApiMovie, MovieId, MovieRecord};
use crate::youtube::{extract_video_id, trailer_query};

pub const DETAIL_FAILED: &str = "Failed to fetch movie details.";
pub const NO_TRAILER: &str = "No trailer found.";
pub const TRAILER_FAILED: &str = "Failed to fetch trailer.";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailStatus {
  Loading,
  Loaded(MovieRecord),
  Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrailerState {
  pub video_id: Option<String>,
  pub loading: bool,
  pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
  pub id: u64,
  pub seq: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailerRequest {
  pub query: String,
  pub seq: u64,
}

#[derive(Debug)]
pub struct DetailView {
  id: MovieId,
  status: DetailStatus,
  trailer: TrailerState,
  /// (title, year) the current trailer belongs to.
  trailer_key: Option<(String, String)>,
  detail_seq: u64,
  trailer_seq: u64,
}

impl DetailView {
  /// Open the detail view for `id`. `local` is the catalog's copy of the
  /// record, used directly for custom entries.
  pub fn open(id: MovieId, local: Option<MovieRecord>) -> (Self, Option<DetailRequest>) {
    let mut view = Self {
      id: id.clone(),
      status: DetailStatus::Loading,
      trailer: TrailerState::default(),
      trailer_key: None,
      detail_seq: 0,
      trailer_seq: 0,
    };
    let request = match id {
      MovieId::Tmdb(tmdb_id) => {
        view.detail_seq += 1;
        Some(DetailRequest { id: tmdb_id, seq: view.detail_seq })
      }
      MovieId::Custom(_) => {
        view.status = match local {
          Some(record) => DetailStatus::Loaded(record),
          None => {
            warn!(id = %view.id, "custom record not in catalog");
            DetailStatus::Failed(DETAIL_FAILED.to_string())
          }
        };
        None
      }
    };
    (view, request)
  }

  pub fn id(&self) -> &MovieId {
    &self.id
  }

  pub fn status(&self) -> &DetailStatus {
    &self.status
  }

  pub fn record(&self) -> Option<&MovieRecord> {
    match &self.status {
      DetailStatus::Loaded(record) => Some(record),
      _ => None,
    }
  }

  pub fn trailer(&self) -> &TrailerState {
    &self.trailer
  }

  /// Apply the stage-one response. Returns whether it was current.
  pub fn apply_detail<E: std::fmt::Display>(&mut self, seq: u64, outcome: Result<ApiMovie, E>) -> bool {
    if seq != self.detail_seq || self.status != DetailStatus::Loading {
      debug!(seq, current = self.detail_seq, "dropping stale detail response");
      return false;
    }
    self.status = match outcome {
      Ok(movie) => DetailStatus::Loaded(MovieRecord::Api(movie)),
      Err(e) => {
        warn!(id = %self.id, err = %e, "detail fetch failed");
        DetailStatus::Failed(DETAIL_FAILED.to_string())
      }
    };
    true
  }

  /// Stage two. Returns a search to run when the record's (title, year) differs
  /// from the one the current trailer state belongs to.
  pub fn trailer_request(&mut self) -> Option<TrailerRequest> {
    let record = self.record()?;
    let title = record.display_title();
    let year = record.display_year();
    if title.is_empty() || year.is_empty() {
      return None;
    }
    let key = (title, year);
    if self.trailer_key.as_ref() == Some(&key) {
      return None;
    }

    // A trailer link typed into the add form short-circuits the search.
    if let Some(video_id) = record.trailer_hint().and_then(extract_video_id) {
      self.trailer_key = Some(key);
      self.trailer_seq += 1;
      self.trailer = TrailerState { video_id: Some(video_id), loading: false, error: None };
      return None;
    }

    let query = trailer_query(&key.0, &key.1);
    self.trailer_key = Some(key);
    self.trailer_seq += 1;
    self.trailer = TrailerState { video_id: None, loading: true, error: None };
    Some(TrailerRequest { query, seq: self.trailer_seq })
  }

  /// Apply the stage-two response. Returns whether it was current.
  pub fn apply_trailer<E: std::fmt::Display>(&mut self, seq: u64, outcome: Result<Option<String>, E>) -> bool {
    if seq != self.trailer_seq || !self.trailer.loading {
      debug!(seq, current = self.trailer_seq, "dropping stale trailer response");
      return false;
    }
    self.trailer = match outcome {
      Ok(Some(video_id)) => TrailerState { video_id: Some(video_id), loading: false, error: None },
      Ok(None) => TrailerState { video_id: None, loading: false, error: Some(NO_TRAILER.to_string()) },
      Err(e) => {
        warn!(id = %self.id, err = %e, "trailer fetch failed");
        TrailerState { video_id: None, loading: false, error: Some(TRAILER_FAILED.to_string()) }
      }
    };
    true
  }
}
