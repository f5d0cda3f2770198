//! The owned state container and every user-facing entry point.
//!
//! [`Controller`] bundles the catalog, the upload/analysis workflow, the current
//! selection, and the conversation session. Entry points validate synchronously,
//! commit whatever state change is immediate, and hand back the [`Request`]s to run.
//! Network results come back through [`Controller::apply`], which commits the
//! outcome and may return follow-up requests (the refresh and auto-analysis after
//! an upload, the refresh after an analysis).
//!
//! All mutation happens through `&mut self`, one call at a time, so the only races
//! are completions arriving out of order. Those are handled by the selection
//! generation (history, replies, single-video fetches) and the catalog's
//! sequence numbers (lists and single-video fetches).

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::effect::{Completion, Request};
use crate::error::{ClientError, ClientResult, GatewayResult};
use crate::notify::{Notice, Observers, StateChange};
use crate::session::{HistoryOutcome, SendOutcome, SessionManager};
use crate::types::{
    Analysis, ChatReply, HealthStatus, Turn, UploadReceipt, Video, VideoStatus, VideoUpload,
};
use crate::workflow::{VideoPhase, Workflow};

/// Snapshot of the three pending-operation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingFlags {
    pub uploading: bool,
    pub analyzing: bool,
    pub awaiting_reply: bool,
}

#[derive(Debug, Default)]
pub struct Controller {
    catalog: Catalog,
    workflow: Workflow,
    session: SessionManager,
    selected: Option<Video>,
    generation: u64,
    server_online: Option<bool>,
    observers: Observers,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StateChange> {
        self.observers.subscribe()
    }

    fn publish(&mut self, change: StateChange) {
        self.observers.publish(change);
    }

    fn notice(&mut self, notice: Notice) {
        self.observers.publish(StateChange::Notice(notice));
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    /// Requests issued once at startup: a health probe and the first catalog fetch.
    pub fn start(&mut self) -> Vec<Request> {
        vec![Request::CheckHealth, self.refresh_catalog()]
    }

    pub fn refresh_catalog(&mut self) -> Request {
        Request::ListVideos { seq: self.catalog.next_request_seq() }
    }

    /// Stores the file to upload after checking its declared media type.
    pub fn select_file(&mut self, upload: VideoUpload) -> ClientResult<()> {
        self.workflow.select_file(upload)?;
        self.publish(StateChange::Flags);
        Ok(())
    }

    pub fn clear_file(&mut self) -> ClientResult<()> {
        self.workflow.clear_file()?;
        self.publish(StateChange::Flags);
        Ok(())
    }

    pub fn upload(&mut self) -> ClientResult<Request> {
        let upload = self.workflow.begin_upload()?;
        info!(filename = %upload.filename, size = upload.size(), "upload started");
        self.publish(StateChange::Flags);
        Ok(Request::Upload(upload))
    }

    /// Starts an analysis of `video_id`. A second call for the same id while the
    /// first is outstanding is rejected without a request.
    pub fn analyze(&mut self, video_id: &str) -> ClientResult<Request> {
        self.workflow.begin_analysis(video_id)?;
        info!(%video_id, "analysis started");
        self.publish(StateChange::Flags);
        Ok(Request::Analyze { video_id: video_id.to_string() })
    }

    /// Selects a video and starts a fresh conversation for it.
    ///
    /// Re-selecting the current video is a no-op (`Ok(None)`); the conversation is
    /// kept. Otherwise the session is reset synchronously and the history fetch
    /// for the new selection is returned.
    pub fn select_video(&mut self, video_id: &str) -> ClientResult<Option<Request>> {
        if self.selected_id() == Some(video_id) {
            return Ok(None);
        }
        let video = self
            .catalog
            .get(video_id)
            .cloned()
            .ok_or_else(|| ClientError::validation(format!("unknown video {video_id}")))?;

        self.generation += 1;
        self.selected = Some(video);
        self.session.reset(video_id, self.generation);
        info!(%video_id, generation = self.generation, "video selected");
        self.publish(StateChange::Selection);
        self.publish(StateChange::Conversation);

        Ok(Some(Request::LoadHistory {
            video_id: video_id.to_string(),
            generation: self.generation,
        }))
    }

    pub fn clear_selection(&mut self) {
        if self.selected.is_none() {
            return;
        }
        self.generation += 1;
        self.selected = None;
        self.session.clear();
        self.publish(StateChange::Selection);
        self.publish(StateChange::Conversation);
    }

    /// Re-fetches the selected video's server document.
    pub fn refresh_selected(&mut self) -> ClientResult<Request> {
        let video_id = self
            .selected_id()
            .ok_or_else(|| ClientError::validation("select a video first"))?
            .to_string();
        let seq = self.catalog.next_request_seq();
        Ok(Request::FetchVideo { video_id, generation: self.generation, seq })
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.session.set_draft(text);
        self.publish(StateChange::Draft);
    }

    pub fn push_draft(&mut self, c: char) {
        self.session.draft_mut().push(c);
        self.publish(StateChange::Draft);
    }

    pub fn pop_draft(&mut self) {
        if self.session.draft_mut().pop().is_some() {
            self.publish(StateChange::Draft);
        }
    }

    /// Replaces the draft with `text` and sends it.
    pub fn send_message(&mut self, text: &str) -> ClientResult<Request> {
        self.set_draft(text);
        self.send_draft()
    }

    /// Sends the current draft. The draft is only cleared once the reply arrives.
    pub fn send_draft(&mut self) -> ClientResult<Request> {
        let (request, generation) = self.session.begin_send(self.selected.as_ref())?;
        info!(video_id = %request.video_id, session = ?request.session_id, "message sent");
        self.publish(StateChange::Flags);
        Ok(Request::SendMessage { request, generation })
    }

    // -----------------------------------------------------------------------
    // Completions
    // -----------------------------------------------------------------------

    /// Commits the outcome of a finished request and returns any follow-ups.
    pub fn apply(&mut self, completion: Completion) -> Vec<Request> {
        match completion {
            Completion::Health(result) => {
                self.apply_health(result);
                Vec::new()
            }
            Completion::VideosListed { seq, result } => {
                self.apply_video_list(seq, result);
                Vec::new()
            }
            Completion::Uploaded(result) => self.apply_upload(result),
            Completion::Analyzed { video_id, result } => self.apply_analysis(&video_id, result),
            Completion::VideoFetched { video_id, generation, seq, result } => {
                self.apply_video_fetch(&video_id, generation, seq, result);
                Vec::new()
            }
            Completion::HistoryLoaded { video_id, generation, result } => {
                self.apply_history(&video_id, generation, result);
                Vec::new()
            }
            Completion::ReplyReceived { video_id, generation, message, result } => {
                self.apply_reply(&video_id, generation, message, result);
                Vec::new()
            }
        }
    }

    fn apply_health(&mut self, result: GatewayResult<HealthStatus>) {
        match result {
            Ok(health) if health.is_healthy() => self.server_online = Some(true),
            Ok(health) => {
                warn!(status = %health.status, "backend reports unhealthy");
                self.server_online = Some(false);
                self.notice(Notice::warning(format!("Backend status: {}", health.status)));
            }
            Err(err) => {
                warn!(error = %err, "backend unreachable");
                self.server_online = Some(false);
                self.notice(Notice::warning(format!("Backend unreachable: {err}")));
            }
        }
        self.publish(StateChange::Health);
    }

    fn apply_video_list(&mut self, seq: u64, result: GatewayResult<Vec<Video>>) {
        match result {
            Ok(videos) => {
                if !self.catalog.replace(seq, videos) {
                    return;
                }
                info!(count = self.catalog.len(), "catalog refreshed");
                self.publish(StateChange::Catalog);
                self.sync_selection_from_catalog();
            }
            Err(err) => {
                warn!(error = %err, "catalog refresh failed; keeping previous list");
                self.notice(Notice::warning(format!("Could not refresh videos: {err}")));
            }
        }
    }

    /// Copies the catalog's entry for the selected id into the selection snapshot.
    fn sync_selection_from_catalog(&mut self) {
        let Some(selected) = self.selected.as_ref() else {
            return;
        };
        if let Some(fresh) = self.catalog.get(&selected.id) {
            if fresh != selected {
                self.selected = Some(fresh.clone());
                self.publish(StateChange::Selection);
            }
        }
    }

    fn apply_upload(&mut self, result: GatewayResult<UploadReceipt>) -> Vec<Request> {
        let succeeded = result.is_ok();
        let uploaded = self.workflow.finish_upload(succeeded);
        self.publish(StateChange::Flags);

        let receipt = match result {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(error = %err, "upload failed; pending file kept");
                self.notice(Notice::error(format!("Upload failed: {err}")));
                return Vec::new();
            }
        };

        info!(video_id = %receipt.id, "upload finished");
        let (filename, size) = match &uploaded {
            Some(file) => (file.filename.clone(), file.size()),
            None => (receipt.filename.clone().unwrap_or_default(), 0),
        };
        let video = Video {
            id: receipt.id.clone(),
            filename: receipt.filename.clone().unwrap_or(filename),
            size,
            status: receipt.status,
            analysis: None,
        };
        if self.catalog.insert_uploaded(video) {
            self.publish(StateChange::Catalog);
        }
        self.notice(Notice::info("Video uploaded successfully!"));

        let mut follow_ups = vec![self.refresh_catalog()];
        match self.analyze(&receipt.id) {
            Ok(request) => follow_ups.push(request),
            Err(err) => warn!(video_id = %receipt.id, error = %err, "auto-analysis skipped"),
        }
        follow_ups
    }

    fn apply_analysis(&mut self, video_id: &str, result: GatewayResult<Analysis>) -> Vec<Request> {
        self.workflow.finish_analysis(video_id);
        self.publish(StateChange::Flags);

        let analysis = match result {
            Ok(analysis) => analysis,
            Err(err) => {
                warn!(%video_id, error = %err, "analysis failed; status unchanged");
                self.notice(Notice::error(format!("Analysis failed: {err}")));
                return Vec::new();
            }
        };

        info!(%video_id, "analysis finished");
        if self.catalog.upsert_status(video_id, VideoStatus::Analyzed, Some(analysis.clone())) {
            self.publish(StateChange::Catalog);
        }
        if let Some(selected) = self.selected.as_mut().filter(|v| v.id == video_id) {
            selected.status = VideoStatus::Analyzed;
            selected.analysis = Some(analysis);
            self.publish(StateChange::Selection);
        }
        self.notice(Notice::info("Video analyzed successfully!"));
        vec![self.refresh_catalog()]
    }

    fn apply_video_fetch(
        &mut self,
        video_id: &str,
        generation: u64,
        seq: u64,
        result: GatewayResult<Video>,
    ) {
        let video = match result {
            Ok(video) if video.id == video_id => video,
            Ok(video) => {
                warn!(expected = %video_id, got = %video.id, "fetched video id mismatch");
                return;
            }
            Err(err) => {
                warn!(%video_id, error = %err, "video refresh failed");
                self.notice(Notice::warning(format!("Could not refresh video: {err}")));
                return;
            }
        };

        // The copy predates a local edit or a newer list; applying it would roll
        // that state back.
        if !self.catalog.is_current(seq) {
            debug!(%video_id, seq, "discarding superseded video fetch");
            return;
        }
        if self.catalog.replace_entry(seq, video.clone()) {
            self.publish(StateChange::Catalog);
        }
        if generation == self.generation && self.selected_id() == Some(video_id) {
            self.selected = Some(video);
            self.publish(StateChange::Selection);
        }
    }

    fn apply_history(&mut self, video_id: &str, generation: u64, result: GatewayResult<Vec<Turn>>) {
        match self.session.apply_history(video_id, generation, result) {
            HistoryOutcome::Loaded(count) => {
                info!(%video_id, count, "chat history loaded");
                self.publish(StateChange::Conversation);
            }
            HistoryOutcome::Failed(err) => {
                warn!(%video_id, error = %err, "chat history unavailable");
                self.publish(StateChange::Conversation);
                self.notice(Notice::warning(format!("Could not load chat history: {err}")));
            }
            HistoryOutcome::Stale => {}
        }
    }

    fn apply_reply(
        &mut self,
        video_id: &str,
        generation: u64,
        message: String,
        result: GatewayResult<ChatReply>,
    ) {
        match self.session.complete_send(video_id, generation, message, result) {
            SendOutcome::Appended => {
                self.publish(StateChange::Flags);
                self.publish(StateChange::Conversation);
                self.publish(StateChange::Draft);
            }
            SendOutcome::Failed(err) => {
                warn!(%video_id, error = %err, "chat failed; draft kept");
                self.publish(StateChange::Flags);
                self.notice(Notice::error(format!("Chat failed: {err}")));
            }
            SendOutcome::Stale => {}
        }
    }

    // -----------------------------------------------------------------------
    // Snapshot accessors
    // -----------------------------------------------------------------------

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selected(&self) -> Option<&Video> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|v| v.id.as_str())
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn pending_file(&self) -> Option<&VideoUpload> {
        self.workflow.pending_file()
    }

    pub fn flags(&self) -> PendingFlags {
        PendingFlags {
            uploading: self.workflow.is_uploading(),
            analyzing: self.workflow.any_analyzing(),
            awaiting_reply: self.session.is_awaiting_reply(),
        }
    }

    pub fn is_analyzing(&self, video_id: &str) -> bool {
        self.workflow.is_analyzing(video_id)
    }

    /// Phase of a catalog entry, or `None` for an unknown id.
    pub fn phase(&self, video_id: &str) -> Option<VideoPhase> {
        let status = self.catalog.get(video_id)?.status;
        Some(self.workflow.phase(video_id, status))
    }

    pub fn server_online(&self) -> Option<bool> {
        self.server_online
    }

    /// Current selection generation; advances on every selection change.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
