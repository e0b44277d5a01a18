//! TMDb (The Movie Database) API v3 client.

use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::constants::constants;
use crate::movie::ApiMovie;
use crate::search::SearchPage;

#[derive(Debug, Deserialize)]
struct SearchResponse {
  #[serde(default)]
  results: Vec<ApiMovie>,
  total_pages: Option<u32>,
}

impl From<SearchResponse> for SearchPage {
  fn from(r: SearchResponse) -> Self {
    SearchPage { results: r.results, total_pages: r.total_pages.filter(|&n| n > 0).unwrap_or(1) }
  }
}

#[derive(Clone)]
pub struct TmdbClient {
  client: Client,
  base_url: String,
  api_key: Option<String>,
}

impl TmdbClient {
  pub fn new(client: Client, api_key: Option<String>) -> Self {
    Self { client, base_url: constants().tmdb_base_url.clone(), api_key }
  }

  fn api_key(&self) -> Result<&str> {
    self.api_key.as_deref().ok_or_else(|| anyhow!("TMDb API key is not configured (set TMDB_API_KEY)"))
  }

  async fn get<T: serde::de::DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
    let mut query = vec![("api_key", self.api_key()?)];
    query.extend_from_slice(params);

    let url = Url::parse_with_params(&format!("{}{}", self.base_url, path), &query)
      .with_context(|| format!("Invalid TMDb URL for {}", path))?;
    debug!(path, "TMDb request");

    let response =
      self.client.get(url).send().await.with_context(|| format!("TMDb request to {} failed", path))?;
    let status = response.status();
    if !status.is_success() {
      bail!("TMDb returned {} for {}", status, path);
    }
    response.json().await.with_context(|| format!("Failed to parse TMDb response for {}", path))
  }

  /// One page of `/search/movie` results.
  pub async fn search_movies(&self, query: &str, page: u32) -> Result<SearchPage> {
    let page = page.to_string();
    let response: SearchResponse = self.get("/search/movie", &[("query", query), ("page", &page)]).await?;
    Ok(response.into())
  }

  /// Full movie record with cast and crew embedded.
  pub async fn movie_details(&self, id: u64) -> Result<ApiMovie> {
    self.get(&format!("/movie/{}", id), &[("append_to_response", "credits")]).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(json: &str) -> SearchPage {
    serde_json::from_str::<SearchResponse>(json).unwrap().into()
  }

  #[test]
  fn search_response_decodes_results_in_order() {
    let page = parse(
      r#"{
        "page": 1,
        "results": [
          {"id": 24428, "title": "The Avengers", "release_date": "2012-04-25", "poster_path": "/RYMX.jpg", "genre_ids": [878]},
          {"id": 299536, "title": "Avengers: Infinity War", "release_date": "2018-04-25", "poster_path": null}
        ],
        "total_pages": 7,
        "total_results": 140
      }"#,
    );
    assert_eq!(page.total_pages, 7);
    assert_eq!(page.results.iter().map(|m| m.id).collect::<Vec<_>>(), [24428, 299536]);
    assert_eq!(page.results[1].poster_path, None);
  }

  #[test]
  fn search_response_defaults() {
    let page = parse(r#"{"page": 1}"#);
    assert!(page.results.is_empty());
    assert_eq!(page.total_pages, 1);

    let page = parse(r#"{"results": [], "total_pages": 0}"#);
    assert_eq!(page.total_pages, 1);
  }

  #[test]
  fn detail_response_with_credits() {
    let movie: ApiMovie = serde_json::from_str(
      r#"{
        "id": 27205,
        "title": "Inception",
        "original_title": "Inception",
        "release_date": "2010-07-15",
        "overview": "Cobb steals secrets.",
        "genres": [{"id": 28, "name": "Action"}],
        "runtime": 148,
        "credits": {
          "cast": [{"id": 6193, "name": "Leonardo DiCaprio", "character": "Cobb"}],
          "crew": [{"id": 525, "name": "Christopher Nolan", "job": "Director", "department": "Directing"}]
        }
      }"#,
    )
    .unwrap();
    let credits = movie.credits.unwrap();
    assert_eq!(credits.cast[0].name, "Leonardo DiCaprio");
    assert_eq!(credits.crew[0].job.as_deref(), Some("Director"));
  }

  #[tokio::test]
  async fn missing_key_fails_at_call_time() {
    let client = TmdbClient::new(Client::new(), None);
    let err = client.search_movies("Avengers", 1).await.unwrap_err();
    assert!(err.to_string().contains("not configured"));
  }
}
