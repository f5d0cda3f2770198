//! Request/response contract with the video chat backend.
//!
//! The [`Gateway`] trait is the only way the rest of the crate reaches the network.
//! Implementations hold no client-side state and never retry: each call either
//! returns a decoded success payload or a [`GatewayError`](crate::GatewayError),
//! and retry policy belongs to whoever issued the call.

mod http;

pub use http::{GatewayConfig, HttpGateway, DEFAULT_BASE_URL};

use async_trait::async_trait;

use crate::error::GatewayResult;
use crate::types::{
    Analysis, ChatReply, ChatRequest, HealthStatus, Turn, UploadReceipt, Video, VideoUpload,
};

#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET /api/health`
    async fn health(&self) -> GatewayResult<HealthStatus>;

    /// `GET /api/videos`, in server order.
    async fn list_videos(&self) -> GatewayResult<Vec<Video>>;

    /// `GET /api/video/{id}`
    async fn fetch_video(&self, video_id: &str) -> GatewayResult<Video>;

    /// `POST /api/upload-video` as a multipart form with a single `file` field.
    async fn upload_video(&self, upload: &VideoUpload) -> GatewayResult<UploadReceipt>;

    /// `POST /api/analyze-video/{id}`
    async fn analyze_video(&self, video_id: &str) -> GatewayResult<Analysis>;

    /// `GET /api/chats/{id}`, optionally narrowed to one server session.
    async fn chat_history(
        &self,
        video_id: &str,
        session_id: Option<&str>,
    ) -> GatewayResult<Vec<Turn>>;

    /// `POST /api/chat`
    async fn send_message(&self, request: &ChatRequest) -> GatewayResult<ChatReply>;
}
