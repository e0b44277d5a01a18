use anyhow::{Context, Result, bail};
use image::DynamicImage;
use reqwest::Client;
use std::future::Future;
use tracing::debug;

use crate::movie::fallback_poster;

pub async fn fetch_image(client: &Client, url: &str) -> Result<DynamicImage> {
  let response = client.get(url).send().await.with_context(|| format!("Failed to request image {}", url))?;
  if !response.status().is_success() {
    bail!("Image request returned {} for {}", response.status(), url);
  }
  let bytes = response.bytes().await.with_context(|| format!("Failed to read image bytes from {}", url))?;
  image::load_from_memory(&bytes).with_context(|| format!("Failed to decode image from memory (URL: {})", url))
}

/// Try `url`; if it fails, try `fallback` exactly once. Failures are never surfaced.
pub async fn load_with_fallback<T, F, Fut>(url: &str, fallback: &str, fetch: F) -> Option<T>
where
  F: Fn(String) -> Fut,
  Fut: Future<Output = Result<T>>,
{
  match fetch(url.to_string()).await {
    Ok(image) => Some(image),
    Err(e) => {
      debug!(url, err = %format!("{:#}", e), "poster failed to load, substituting fallback");
      if url == fallback {
        return None;
      }
      fetch(fallback.to_string()).await.ok()
    }
  }
}

/// Load the poster at `url`, substituting the placeholder image on failure.
pub async fn load_poster(client: &Client, url: &str) -> Option<DynamicImage> {
  load_with_fallback(url, fallback_poster(), |u| {
    let client = client.clone();
    async move { fetch_image(&client, &u).await }
  })
  .await
}

#[cfg(test)]
mod tests {
  use super::*;
  use anyhow::anyhow;
  use std::sync::Mutex;

  async fn run(url: &str, fallback: &str, ok: &[&str]) -> (Option<String>, Vec<String>) {
    let attempts = Mutex::new(Vec::new());
    let result = load_with_fallback(url, fallback, |u| {
      attempts.lock().unwrap().push(u.clone());
      let hit = ok.contains(&u.as_str());
      async move { if hit { Ok(u) } else { Err(anyhow!("404")) } }
    })
    .await;
    (result, attempts.into_inner().unwrap())
  }

  #[tokio::test]
  async fn primary_success_does_not_touch_fallback() {
    let (got, attempts) = run("https://p/1.jpg", "https://fb", &["https://p/1.jpg"]).await;
    assert_eq!(got.as_deref(), Some("https://p/1.jpg"));
    assert_eq!(attempts, ["https://p/1.jpg"]);
  }

  #[tokio::test]
  async fn failure_substitutes_fallback_once() {
    let (got, attempts) = run("https://p/broken.jpg", "https://fb", &["https://fb"]).await;
    assert_eq!(got.as_deref(), Some("https://fb"));
    assert_eq!(attempts, ["https://p/broken.jpg", "https://fb"]);
  }

  #[tokio::test]
  async fn fallback_failure_gives_up() {
    let (got, attempts) = run("https://p/broken.jpg", "https://fb", &[]).await;
    assert_eq!(got, None);
    assert_eq!(attempts.len(), 2);
  }

  #[tokio::test]
  async fn failing_fallback_is_not_retried() {
    let (got, attempts) = run("https://fb", "https://fb", &[]).await;
    assert_eq!(got, None);
    assert_eq!(attempts, ["https://fb"]);
  }
}
