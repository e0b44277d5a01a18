use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::constants::constants;

/// `id.kind` of a playable video in search results.
const VIDEO_KIND: &str = "youtube#video";

#[derive(Debug, Deserialize)]
struct SearchResponse {
  #[serde(default)]
  items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
  id: ItemId,
}

#[derive(Debug, Deserialize)]
struct ItemId {
  #[serde(default)]
  kind: String,
  #[serde(rename = "videoId")]
  video_id: Option<String>,
}

impl SearchResponse {
  /// The first item's video id, if that item is a video.
  fn first_video_id(self) -> Option<String> {
    let first = self.items.into_iter().next()?;
    if first.id.kind != VIDEO_KIND {
      return None;
    }
    first.id.video_id.filter(|id| !id.is_empty())
  }
}

/// Free-text query used to find a trailer: `"<title> <year> Official Trailer"`.
pub fn trailer_query(title: &str, year: &str) -> String {
  format!("{} {} {}", title, year, constants().trailer_suffix)
}

pub fn embed_url(video_id: &str) -> String {
  format!("{}/{}", constants().youtube_embed_base, video_id)
}

pub fn watch_url(video_id: &str) -> String {
  format!("{}{}", constants().youtube_watch_base, video_id)
}

/// Pull the video id out of a watch, short, embed or shorts URL.
pub fn extract_video_id(input: &str) -> Option<String> {
  let url = Url::parse(input.trim()).ok()?;
  let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

  let candidate = match host {
    "youtu.be" => url.path_segments()?.next().map(str::to_string),
    "youtube.com" | "youtube-nocookie.com" => {
      let mut segments = url.path_segments()?;
      match segments.next() {
        Some("watch") => url.query_pairs().find(|(k, _)| k == "v").map(|(_, v)| v.into_owned()),
        Some("embed") | Some("shorts") | Some("v") => segments.next().map(str::to_string),
        _ => None,
      }
    }
    _ => None,
  }?;

  let valid = !candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
  valid.then_some(candidate)
}

#[derive(Clone)]
pub struct YoutubeClient {
  client: Client,
  base_url: String,
  api_key: Option<String>,
}

impl YoutubeClient {
  pub fn new(client: Client, api_key: Option<String>) -> Self {
    Self { client, base_url: constants().youtube_api_base.clone(), api_key }
  }

  /// Search for a single video matching `query`. `Ok(None)` means the search
  /// succeeded but the top hit is missing or not a video.
  pub async fn search_trailer(&self, query: &str) -> Result<Option<String>> {
    let key =
      self.api_key.as_deref().ok_or_else(|| anyhow!("YouTube API key is not configured (set YOUTUBE_API_KEY)"))?;
    let url = Url::parse_with_params(
      &format!("{}/search", self.base_url),
      &[("part", "snippet"), ("maxResults", "1"), ("q", query), ("key", key)],
    )
    .context("Invalid YouTube search URL")?;
    debug!(query, "YouTube trailer search");

    let response = self.client.get(url).send().await.context("YouTube search request failed")?;
    let status = response.status();
    if !status.is_success() {
      bail!("YouTube search returned {}", status);
    }
    let body: SearchResponse = response.json().await.context("Failed to parse YouTube search response")?;
    Ok(body.first_video_id())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn first(json: &str) -> Option<String> {
    serde_json::from_str::<SearchResponse>(json).unwrap().first_video_id()
  }

  // --- trailer_query ---

  #[test]
  fn trailer_query_format() {
    assert_eq!(trailer_query("Inception", "2010"), "Inception 2010 Official Trailer");
  }

  #[test]
  fn embed_and_watch_urls() {
    assert_eq!(embed_url("YoHD9XEInc0"), "https://www.youtube.com/embed/YoHD9XEInc0");
    assert_eq!(watch_url("YoHD9XEInc0"), "https://www.youtube.com/watch?v=YoHD9XEInc0");
  }

  // --- search response ---

  #[test]
  fn first_item_video() {
    let id = first(
      r#"{"kind":"youtube#searchListResponse","items":[{"kind":"youtube#searchResult","id":{"kind":"youtube#video","videoId":"YoHD9XEInc0"},"snippet":{}}]}"#,
    );
    assert_eq!(id.as_deref(), Some("YoHD9XEInc0"));
  }

  #[test]
  fn first_item_not_a_video() {
    let id = first(r#"{"items":[{"id":{"kind":"youtube#channel","channelId":"UC123"}}]}"#);
    assert_eq!(id, None);
  }

  #[test]
  fn no_items() {
    assert_eq!(first(r#"{"items":[]}"#), None);
    assert_eq!(first(r#"{}"#), None);
  }

  // --- extract_video_id ---

  #[test]
  fn extract_from_common_url_shapes() {
    assert_eq!(extract_video_id("https://www.youtube.com/watch?v=YoHD9XEInc0").as_deref(), Some("YoHD9XEInc0"));
    assert_eq!(extract_video_id("https://youtube.com/watch?t=10&v=abc_-1").as_deref(), Some("abc_-1"));
    assert_eq!(extract_video_id("https://youtu.be/YoHD9XEInc0?t=3").as_deref(), Some("YoHD9XEInc0"));
    assert_eq!(extract_video_id("https://www.youtube.com/embed/YoHD9XEInc0").as_deref(), Some("YoHD9XEInc0"));
    assert_eq!(extract_video_id("https://m.youtube.com/shorts/abc123").as_deref(), Some("abc123"));
  }

  #[test]
  fn extract_rejects_other_input() {
    assert_eq!(extract_video_id(""), None);
    assert_eq!(extract_video_id("not a url"), None);
    assert_eq!(extract_video_id("https://vimeo.com/12345"), None);
    assert_eq!(extract_video_id("https://www.youtube.com/@channel"), None);
    assert_eq!(extract_video_id("https://www.youtube.com/watch?list=PL1"), None);
  }

  #[tokio::test]
  async fn missing_key_fails_at_call_time() {
    let client = YoutubeClient::new(Client::new(), None);
    let err = client.search_trailer("Inception 2010 Official Trailer").await.unwrap_err();
    assert!(err.to_string().contains("not configured"));
  }
}
