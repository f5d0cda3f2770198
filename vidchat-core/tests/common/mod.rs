//! In-memory backend used by the integration tests.
//!
//! `FakeBackend` keeps a server-side video list and answers the [`Gateway`] calls
//! from it. Analyze and chat outcomes can be scripted per call; unscripted calls
//! succeed with canned payloads. Every call is recorded so tests can count network
//! traffic.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use vidchat_core::{
    execute, Analysis, ChatReply, ChatRequest, Completion, Controller, Gateway, GatewayError,
    GatewayResult, HealthStatus, Request, Turn, UploadReceipt, Video, VideoStatus, VideoUpload,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Health,
    ListVideos,
    FetchVideo(String),
    Upload(String),
    Analyze(String),
    History(String),
    Chat(ChatRequest),
}

#[derive(Default)]
pub struct FakeBackend {
    videos: Mutex<Vec<Video>>,
    analyze_results: Mutex<VecDeque<GatewayResult<Analysis>>>,
    chat_results: Mutex<VecDeque<GatewayResult<ChatReply>>>,
    upload_results: Mutex<VecDeque<GatewayError>>,
    list_failures: Mutex<VecDeque<GatewayError>>,
    history_failures: Mutex<VecDeque<GatewayError>>,
    histories: Mutex<HashMap<String, Vec<Turn>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the server with an already-stored video and returns its id.
    pub fn seed(&self, filename: &str, status: VideoStatus) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.videos.lock().unwrap().push(Video {
            id: id.clone(),
            filename: filename.into(),
            size: 1024,
            status,
            analysis: None,
        });
        id
    }

    pub fn script_analysis(&self, result: GatewayResult<Analysis>) {
        self.analyze_results.lock().unwrap().push_back(result);
    }

    pub fn script_reply(&self, result: GatewayResult<ChatReply>) {
        self.chat_results.lock().unwrap().push_back(result);
    }

    pub fn fail_next_upload(&self, err: GatewayError) {
        self.upload_results.lock().unwrap().push_back(err);
    }

    pub fn fail_next_list(&self, err: GatewayError) {
        self.list_failures.lock().unwrap().push_back(err);
    }

    pub fn fail_next_history(&self, err: GatewayError) {
        self.history_failures.lock().unwrap().push_back(err);
    }

    /// Deletes a video server-side, as another client would.
    pub fn remove(&self, video_id: &str) {
        self.videos.lock().unwrap().retain(|v| v.id != video_id);
    }

    pub fn set_history(&self, video_id: &str, turns: Vec<Turn>) {
        self.histories.lock().unwrap().insert(video_id.into(), turns);
    }

    pub fn server_status(&self, video_id: &str) -> Option<VideoStatus> {
        self.videos.lock().unwrap().iter().find(|v| v.id == video_id).map(|v| v.status)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn chat_calls(&self) -> Vec<ChatRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Chat(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn reply(text: &str, session: &str) -> GatewayResult<ChatReply> {
    Ok(ChatReply { reply: text.into(), session_id: session.into(), video_id: None })
}

pub fn server_error(detail: &str) -> GatewayError {
    GatewayError::Server { status: 500, detail: detail.into() }
}

#[async_trait]
impl Gateway for FakeBackend {
    async fn health(&self) -> GatewayResult<HealthStatus> {
        self.record(Call::Health);
        Ok(HealthStatus { status: "healthy".into(), message: None })
    }

    async fn list_videos(&self) -> GatewayResult<Vec<Video>> {
        self.record(Call::ListVideos);
        if let Some(err) = self.list_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(self.videos.lock().unwrap().clone())
    }

    async fn fetch_video(&self, video_id: &str) -> GatewayResult<Video> {
        self.record(Call::FetchVideo(video_id.into()));
        self.videos
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == video_id)
            .cloned()
            .ok_or_else(|| GatewayError::Server { status: 404, detail: "Video not found".into() })
    }

    async fn upload_video(&self, upload: &VideoUpload) -> GatewayResult<UploadReceipt> {
        self.record(Call::Upload(upload.filename.clone()));
        if let Some(err) = self.upload_results.lock().unwrap().pop_front() {
            return Err(err);
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.videos.lock().unwrap().push(Video {
            id: id.clone(),
            filename: upload.filename.clone(),
            size: upload.size(),
            status: VideoStatus::Uploaded,
            analysis: None,
        });
        Ok(UploadReceipt {
            id,
            filename: Some(upload.filename.clone()),
            status: VideoStatus::Uploaded,
            message: Some("Video uploaded successfully".into()),
        })
    }

    async fn analyze_video(&self, video_id: &str) -> GatewayResult<Analysis> {
        self.record(Call::Analyze(video_id.into()));
        let result = self
            .analyze_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Analysis::text("an analysis")));
        let mut videos = self.videos.lock().unwrap();
        if let Some(video) = videos.iter_mut().find(|v| v.id == video_id) {
            match &result {
                Ok(analysis) => {
                    video.status = VideoStatus::Analyzed;
                    video.analysis = Some(analysis.clone());
                }
                Err(_) => video.status = VideoStatus::Failed,
            }
        }
        result
    }

    async fn chat_history(
        &self,
        video_id: &str,
        _session_id: Option<&str>,
    ) -> GatewayResult<Vec<Turn>> {
        self.record(Call::History(video_id.into()));
        if let Some(err) = self.history_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(self.histories.lock().unwrap().get(video_id).cloned().unwrap_or_default())
    }

    async fn send_message(&self, request: &ChatRequest) -> GatewayResult<ChatReply> {
        self.record(Call::Chat(request.clone()));
        self.chat_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| reply("ok", "s-default"))
    }
}

/// Executes `requests` and every follow-up they produce, applying each completion
/// in issue order.
pub async fn drive(controller: &mut Controller, gateway: &dyn Gateway, requests: Vec<Request>) {
    let mut queue: VecDeque<Request> = requests.into();
    while let Some(request) = queue.pop_front() {
        let completion = execute(gateway, request).await;
        queue.extend(controller.apply(completion));
    }
}

/// Executes one request without applying it, so tests can reorder completions.
pub async fn run(gateway: &dyn Gateway, request: Request) -> Completion {
    execute(gateway, request).await
}

pub fn clip(megabytes: usize) -> VideoUpload {
    VideoUpload::new("clip.mp4", "video/mp4", vec![0; megabytes * 1024 * 1024])
}
