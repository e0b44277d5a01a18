//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it is always available:
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  /// Query issued on startup and by the Home action.
  pub seed_query: String,

  // TMDb
  pub tmdb_base_url: String,
  pub tmdb_image_base: String,
  pub fallback_poster: String,

  // YouTube Data API v3
  pub youtube_api_base: String,
  pub youtube_embed_base: String,
  pub youtube_watch_base: String,
  pub trailer_suffix: String,

  // Detail view
  pub top_cast_limit: usize,

  // HTTP
  pub http_timeout_secs: u64,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert_eq!(c.seed_query, "Avengers");
    assert_eq!(c.top_cast_limit, 5);
    assert!(c.tmdb_image_base.starts_with("https://"));
  }
}
