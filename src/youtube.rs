//! Minimal YouTube Data API client for topic-based video recommendations.
//!
//! One call: search for videos matching a study query, mapped down to the
//! `Video` DTO the frontend renders. Missing fields degrade to empty
//! strings rather than dropping the result, except for the video id, which
//! the watch URL needs.

use std::time::Duration;

use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::{instrument, info};

use crate::domain::Video;

#[derive(Clone)]
pub struct YouTube {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
}

impl YouTube {
  /// Construct the client if we find YOUTUBE_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("YOUTUBE_API_KEY").ok()?;
    let base_url = std::env::var("YOUTUBE_BASE_URL")
      .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(15))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url })
  }

  #[instrument(level = "info", skip(self), fields(%query, max_results))]
  pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Video>, String> {
    let url = format!("{}/search", self.base_url);
    let max_results = max_results.to_string();
    let res = self.client.get(&url)
      .header(USER_AGENT, "edumate-backend/0.1")
      .query(&[
        ("part", "snippet"),
        ("type", "video"),
        ("q", query),
        ("key", self.api_key.as_str()),
        ("maxResults", max_results.as_str()),
      ])
      .send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      return Err(format!("YouTube HTTP {}: {}", status, body));
    }

    let body: SearchResponse = res.json().await.map_err(|e| e.to_string())?;
    let videos: Vec<Video> = body.items.into_iter()
      .filter_map(|item| {
        let video_id = item.id.video_id?;
        Some(Video {
          title: item.snippet.title,
          url: format!("https://www.youtube.com/watch?v={}", video_id),
          channel: item.snippet.channel_title.unwrap_or_else(|| "Unknown".into()),
          thumbnail: item.snippet.thumbnails
            .and_then(|t| t.high)
            .map(|h| h.url)
            .unwrap_or_default(),
        })
      })
      .collect();

    info!(count = videos.len(), "YouTube search mapped");
    Ok(videos)
  }
}

// --- Search DTOs ---

#[derive(Deserialize)]
struct SearchResponse {
  #[serde(default)] items: Vec<SearchItem>,
}
#[derive(Deserialize)]
struct SearchItem {
  id: SearchItemId,
  snippet: Snippet,
}
#[derive(Deserialize)]
struct SearchItemId {
  #[serde(default, rename = "videoId")] video_id: Option<String>,
}
#[derive(Deserialize)]
struct Snippet {
  #[serde(default)] title: String,
  #[serde(default, rename = "channelTitle")] channel_title: Option<String>,
  #[serde(default)] thumbnails: Option<Thumbnails>,
}
#[derive(Deserialize)]
struct Thumbnails {
  #[serde(default)] high: Option<Thumbnail>,
}
#[derive(Deserialize)]
struct Thumbnail {
  url: String,
}
