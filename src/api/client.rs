/// Typed client for the remote ranking service
///
/// Thin request/response wrapper over the service's six operations plus the
/// image endpoint. All calls are async and may be issued concurrently; the
/// client imposes no ordering of its own — that is the session controller's
/// job. Failures collapse into a single transport error: structured error
/// bodies are not parsed, and nothing here retries.

use serde::Serialize;
use thiserror::Error;

use crate::state::data::{ImageSize, Pair, ProgressStats, Wallpaper};

/// Default service address; override with the env var below
const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const BASE_URL_ENV: &str = "WALLRANK_API_BASE";

/// Remote service failure. Network errors and non-2xx responses look the
/// same to callers; every recovery is a subsequent explicit user action.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ScanRequest {
    path: String,
}

#[derive(Serialize)]
struct VoteRequest {
    winner_id: i64,
    loser_id: i64,
}

#[derive(Serialize)]
struct MoveRequest {
    wallpaper_id: i64,
    destination_folder: String,
}

/// Handle to the remote service; cheap to clone into background tasks
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Build a client from `WALLRANK_API_BASE`, falling back to localhost
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /scan`: index a directory server-side, returning how many
    /// supported images were found. Zero is a valid outcome, not an error.
    pub async fn scan(&self, path: String) -> ApiResult<i64> {
        let count = self
            .http
            .post(self.url("/scan"))
            .json(&ScanRequest { path })
            .send()
            .await?
            .error_for_status()?
            .json::<i64>()
            .await?;
        Ok(count)
    }

    /// `GET /pair`: a fresh comparison pair. Fails if the service has fewer
    /// than two items, or if it hands back two copies of the same item.
    pub async fn get_pair(&self) -> ApiResult<Pair> {
        let (left, right) = self
            .http
            .get(self.url("/pair"))
            .send()
            .await?
            .error_for_status()?
            .json::<(Wallpaper, Wallpaper)>()
            .await?;

        Pair::new(left, right)
            .ok_or_else(|| ApiError::Transport("service returned a pair with duplicate ids".into()))
    }

    /// `POST /vote`: record a preference. Either recorded or not; there is
    /// no partial-success state.
    pub async fn vote(&self, winner_id: i64, loser_id: i64) -> ApiResult<()> {
        self.http
            .post(self.url("/vote"))
            .json(&VoteRequest {
                winner_id,
                loser_id,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// `GET /progress`: the current aggregate progress snapshot
    pub async fn get_progress(&self) -> ApiResult<ProgressStats> {
        let stats = self
            .http
            .get(self.url("/progress"))
            .send()
            .await?
            .error_for_status()?
            .json::<ProgressStats>()
            .await?;
        Ok(stats)
    }

    /// `GET /review?limit=N`: up to `limit` lowest-rated items
    pub async fn get_review_list(&self, limit: u32) -> ApiResult<Vec<Wallpaper>> {
        let list = self
            .http
            .get(self.url("/review"))
            .query(&[("limit", limit)])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Wallpaper>>()
            .await?;
        Ok(list)
    }

    /// `POST /move`: relocate a file and drop it from the ranking pool
    pub async fn move_wallpaper(
        &self,
        wallpaper_id: i64,
        destination_folder: String,
    ) -> ApiResult<()> {
        self.http
            .post(self.url("/move"))
            .json(&MoveRequest {
                wallpaper_id,
                destination_folder,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// `GET /images/{id}?size=...`: raw image bytes at the given tier
    pub async fn fetch_image(&self, id: i64, size: ImageSize) -> ApiResult<Vec<u8>> {
        let bytes = self
            .http
            .get(self.image_url(id, size))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }

    fn image_url(&self, id: i64, size: ImageSize) -> String {
        format!("{}/images/{}?size={}", self.base_url, id, size.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/pair"), "http://localhost:8000/pair");
    }

    #[test]
    fn test_image_url_carries_size_tier() {
        let client = ApiClient::new("http://localhost:8000");
        assert_eq!(
            client.image_url(7, ImageSize::Medium),
            "http://localhost:8000/images/7?size=medium"
        );
        assert_eq!(
            client.image_url(7, ImageSize::Full),
            "http://localhost:8000/images/7?size=full"
        );
    }

    #[test]
    fn test_vote_request_wire_shape() {
        let body = serde_json::to_value(VoteRequest {
            winner_id: 5,
            loser_id: 9,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "winner_id": 5, "loser_id": 9 }));
    }

    #[test]
    fn test_move_request_wire_shape() {
        let body = serde_json::to_value(MoveRequest {
            wallpaper_id: 9,
            destination_folder: "./rejected".into(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "wallpaper_id": 9, "destination_folder": "./rejected" })
        );
    }
}
