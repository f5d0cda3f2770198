//! Side-effect requests issued by the controller and the completions they produce.
//!
//! The controller never awaits anything. Its entry points return [`Request`]
//! values; something else runs them against a [`Gateway`] with [`execute`] and
//! feeds the resulting [`Completion`] back through `Controller::apply`. Every
//! request carries whatever tag its completion needs to be checked for staleness.

use crate::error::GatewayResult;
use crate::gateway::Gateway;
use crate::types::{
    Analysis, ChatReply, ChatRequest, HealthStatus, Turn, UploadReceipt, Video, VideoUpload,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    CheckHealth,
    ListVideos { seq: u64 },
    Upload(VideoUpload),
    Analyze { video_id: String },
    FetchVideo { video_id: String, generation: u64, seq: u64 },
    LoadHistory { video_id: String, generation: u64 },
    SendMessage { request: ChatRequest, generation: u64 },
}

impl Request {
    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Request::CheckHealth => "health",
            Request::ListVideos { .. } => "list_videos",
            Request::Upload(_) => "upload",
            Request::Analyze { .. } => "analyze",
            Request::FetchVideo { .. } => "fetch_video",
            Request::LoadHistory { .. } => "load_history",
            Request::SendMessage { .. } => "send_message",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Health(GatewayResult<HealthStatus>),
    VideosListed {
        seq: u64,
        result: GatewayResult<Vec<Video>>,
    },
    Uploaded(GatewayResult<UploadReceipt>),
    Analyzed {
        video_id: String,
        result: GatewayResult<Analysis>,
    },
    VideoFetched {
        video_id: String,
        generation: u64,
        seq: u64,
        result: GatewayResult<Video>,
    },
    HistoryLoaded {
        video_id: String,
        generation: u64,
        result: GatewayResult<Vec<Turn>>,
    },
    ReplyReceived {
        video_id: String,
        generation: u64,
        message: String,
        result: GatewayResult<ChatReply>,
    },
}

/// Runs one request to completion. Never retries and never panics on a failed call:
/// failures travel inside the returned completion.
pub async fn execute(gateway: &dyn Gateway, request: Request) -> Completion {
    match request {
        Request::CheckHealth => Completion::Health(gateway.health().await),
        Request::ListVideos { seq } => Completion::VideosListed {
            seq,
            result: gateway.list_videos().await,
        },
        Request::Upload(upload) => Completion::Uploaded(gateway.upload_video(&upload).await),
        Request::Analyze { video_id } => {
            let result = gateway.analyze_video(&video_id).await;
            Completion::Analyzed { video_id, result }
        }
        Request::FetchVideo { video_id, generation, seq } => {
            let result = gateway.fetch_video(&video_id).await;
            Completion::VideoFetched { video_id, generation, seq, result }
        }
        Request::LoadHistory { video_id, generation } => {
            let result = gateway.chat_history(&video_id, None).await;
            Completion::HistoryLoaded { video_id, generation, result }
        }
        Request::SendMessage { request, generation } => {
            let result = gateway.send_message(&request).await;
            Completion::ReplyReceived {
                video_id: request.video_id,
                generation,
                message: request.message,
                result,
            }
        }
    }
}
