//! reqwest-backed [`Gateway`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::Gateway;
use crate::error::{GatewayError, GatewayResult};
use crate::types::{
    Analysis, ChatReply, ChatRequest, HealthStatus, Turn, UploadReceipt, Video, VideoUpload,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Connection settings for [`HttpGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the backend, without the `/api` suffix.
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout: None }
    }
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Deserialize)]
struct VideoList {
    #[serde(default)]
    videos: Vec<Video>,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    analysis: Analysis,
}

#[derive(Deserialize)]
struct ChatHistory {
    #[serde(default)]
    chats: Vec<Turn>,
}

/// FastAPI error envelope. `detail` is a string for `HTTPException` and a list of
/// objects for request-validation failures.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// HTTP client for the backend.
pub struct HttpGateway {
    http: Client,
    base: Url,
    base_url: String,
}

impl HttpGateway {
    /// Builds the reqwest client and parses the base URL once.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if the base URL does not parse, cannot
    /// carry a path (`mailto:` and the like), or the TLS backend fails to
    /// initialise.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            GatewayError::Transport(format!("invalid backend URL {:?}: {e}", config.base_url))
        })?;
        if base.cannot_be_a_base() {
            return Err(GatewayError::Transport(format!(
                "backend URL {:?} cannot carry a path",
                config.base_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { http, base, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `segments` to the base path. Each segment is percent-encoded, so a
    /// server-issued id can never add path components or a query.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Decodes a success body into `T`, or turns a non-success response into the
/// matching [`GatewayError`].
async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Transport(format!("invalid response body: {e}")));
    }

    let body = response.text().await.unwrap_or_default();
    match extract_detail(&body) {
        Some(detail) => {
            warn!(status = status.as_u16(), %detail, "backend returned an error");
            Err(GatewayError::Server { status: status.as_u16(), detail })
        }
        None => {
            warn!(status = status.as_u16(), "backend returned an error without detail");
            Err(GatewayError::Transport(format!("server responded with {status}")))
        }
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let detail = serde_json::from_str::<ErrorBody>(body).ok()?.detail?;
    match detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn health(&self) -> GatewayResult<HealthStatus> {
        let response = self.http.get(self.url(&["api", "health"])).send().await?;
        decode(response).await
    }

    async fn list_videos(&self) -> GatewayResult<Vec<Video>> {
        debug!("listing videos");
        let response = self.http.get(self.url(&["api", "videos"])).send().await?;
        let list: VideoList = decode(response).await?;
        Ok(list.videos)
    }

    async fn fetch_video(&self, video_id: &str) -> GatewayResult<Video> {
        let response = self.http.get(self.url(&["api", "video", video_id])).send().await?;
        decode(response).await
    }

    async fn upload_video(&self, upload: &VideoUpload) -> GatewayResult<UploadReceipt> {
        debug!(filename = %upload.filename, size = upload.size(), "uploading video");
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.filename.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| GatewayError::Transport(format!("invalid media type: {e}")))?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.url(&["api", "upload-video"]))
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    async fn analyze_video(&self, video_id: &str) -> GatewayResult<Analysis> {
        debug!(%video_id, "requesting analysis");
        let response = self
            .http
            .post(self.url(&["api", "analyze-video", video_id]))
            .send()
            .await?;
        let body: AnalyzeResponse = decode(response).await?;
        Ok(body.analysis)
    }

    async fn chat_history(
        &self,
        video_id: &str,
        session_id: Option<&str>,
    ) -> GatewayResult<Vec<Turn>> {
        let mut request = self.http.get(self.url(&["api", "chats", video_id]));
        if let Some(session_id) = session_id {
            request = request.query(&[("session_id", session_id)]);
        }
        let history: ChatHistory = decode(request.send().await?).await?;
        Ok(history.chats)
    }

    async fn send_message(&self, request: &ChatRequest) -> GatewayResult<ChatReply> {
        debug!(video_id = %request.video_id, session = ?request.session_id, "sending chat message");
        let response = self.http.post(self.url(&["api", "chat"])).json(request).send().await?;
        decode(response).await
    }
}
