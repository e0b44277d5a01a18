//! Search and pagination state.
//!
//! The controller never performs I/O. Every state change that needs a fetch
//! returns a [`SearchRequest`]; the caller runs it and feeds the outcome back
//! through [`SearchController::apply`]. Each request carries a sequence number
//! and only the most recently issued one may change state, so a slow response
//! for an old query can never overwrite a newer one.

use tracing::{debug, warn};

use crate::movie::ApiMovie;

/// User-facing message for any failed search.
pub const SEARCH_FAILED: &str = "Failed to fetch movies.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
  Idle,
  Fetching,
  Loaded,
  Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
  pub term: String,
  pub page: u32,
  pub seq: u64,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
  pub results: Vec<ApiMovie>,
  pub total_pages: u32,
}

#[derive(Debug)]
pub struct SearchController {
  seed: String,
  term: String,
  page: u32,
  total_pages: u32,
  phase: SearchPhase,
  error: Option<String>,
  seq: u64,
}

impl SearchController {
  pub fn new(seed: impl Into<String>) -> Self {
    let seed = seed.into();
    Self {
      term: seed.clone(),
      seed,
      page: 1,
      total_pages: 1,
      phase: SearchPhase::Idle,
      error: None,
      seq: 0,
    }
  }

  pub fn term(&self) -> &str {
    &self.term
  }

  pub fn page(&self) -> u32 {
    self.page
  }

  pub fn total_pages(&self) -> u32 {
    self.total_pages
  }

  pub fn phase(&self) -> SearchPhase {
    self.phase
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn has_prev(&self) -> bool {
    self.page > 1
  }

  pub fn has_next(&self) -> bool {
    self.page < self.total_pages
  }

  /// Initial load for the current term and page.
  pub fn start(&mut self) -> Option<SearchRequest> {
    self.issue()
  }

  /// New search: always restarts at page 1.
  pub fn set_search_term(&mut self, term: &str) -> Option<SearchRequest> {
    self.term = term.trim().to_string();
    self.page = 1;
    self.issue()
  }

  /// Jump to `target`. Out-of-range targets are ignored.
  pub fn set_page(&mut self, target: u32) -> Option<SearchRequest> {
    if target < 1 || target > self.total_pages {
      debug!(target, total_pages = self.total_pages, "page change ignored");
      return None;
    }
    self.page = target;
    self.issue()
  }

  pub fn next_page(&mut self) -> Option<SearchRequest> {
    self.set_page(self.page.saturating_add(1))
  }

  pub fn prev_page(&mut self) -> Option<SearchRequest> {
    self.set_page(self.page.saturating_sub(1))
  }

  /// Home action: back to the seed query on page 1.
  pub fn reset_home(&mut self) -> Option<SearchRequest> {
    let seed = self.seed.clone();
    self.set_search_term(&seed)
  }

  /// Apply the outcome of request `seq`. Returns the page to display when the
  /// outcome was current and successful; stale outcomes are dropped.
  pub fn apply<E: std::fmt::Display>(&mut self, seq: u64, outcome: Result<SearchPage, E>) -> Option<Vec<ApiMovie>> {
    if seq != self.seq || self.phase != SearchPhase::Fetching {
      debug!(seq, current = self.seq, "dropping stale search response");
      return None;
    }
    match outcome {
      Ok(page) => {
        self.total_pages = page.total_pages.max(1);
        self.phase = SearchPhase::Loaded;
        self.error = None;
        Some(page.results)
      }
      Err(e) => {
        warn!(term = %self.term, page = self.page, err = %e, "search failed");
        self.phase = SearchPhase::Failed;
        self.error = Some(SEARCH_FAILED.to_string());
        None
      }
    }
  }

  fn issue(&mut self) -> Option<SearchRequest> {
    // Any outstanding request belongs to an older term or page.
    self.seq += 1;
    if self.term.is_empty() {
      self.phase = SearchPhase::Idle;
      return None;
    }
    self.phase = SearchPhase::Fetching;
    self.error = None;
    Some(SearchRequest { term: self.term.clone(), page: self.page, seq: self.seq })
  }
}
