//! Upload and analysis bookkeeping.
//!
//! Holds the pending file, the single-flight upload flag, and the set of video ids
//! with an analyze call in flight. The in-flight set is what produces the
//! client-only `Analyzing` phase: the server never stores it, and the catalog status
//! is left untouched while a call is outstanding so a failure needs no rollback.

use std::collections::HashSet;

use crate::error::{ClientError, ClientResult, Rejection};
use crate::media::is_video_media_type;
use crate::types::{VideoStatus, VideoUpload};

/// Per-video phase as presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoPhase {
    Uploaded,
    Analyzing,
    Analyzed,
    Failed,
}

impl VideoPhase {
    pub fn label(self) -> &'static str {
        match self {
            VideoPhase::Uploaded => "uploaded",
            VideoPhase::Analyzing => "analyzing",
            VideoPhase::Analyzed => "analyzed",
            VideoPhase::Failed => "failed",
        }
    }
}

#[derive(Debug, Default)]
pub struct Workflow {
    pending_file: Option<VideoUpload>,
    uploading: bool,
    analyzing: HashSet<String>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores the file chosen for upload.
    ///
    /// A non-video media type is a validation error and leaves any previously
    /// chosen file in place. Choosing a file while an upload is outstanding is
    /// refused so the in-flight upload keeps describing the pending file.
    pub fn select_file(&mut self, upload: VideoUpload) -> ClientResult<()> {
        if self.uploading {
            return Err(Rejection::UploadInProgress.into());
        }
        if !is_video_media_type(&upload.content_type) {
            return Err(ClientError::validation(format!(
                "{} is not a video file ({})",
                upload.filename, upload.content_type
            )));
        }
        self.pending_file = Some(upload);
        Ok(())
    }

    /// Drops the pending file. Refused while it is being uploaded.
    pub fn clear_file(&mut self) -> ClientResult<()> {
        if self.uploading {
            return Err(Rejection::UploadInProgress.into());
        }
        self.pending_file = None;
        Ok(())
    }

    /// Marks an upload as started and returns a copy of the file to send.
    pub fn begin_upload(&mut self) -> ClientResult<VideoUpload> {
        if self.uploading {
            return Err(Rejection::UploadInProgress.into());
        }
        let upload = self
            .pending_file
            .clone()
            .ok_or_else(|| ClientError::validation("choose a video file first"))?;
        self.uploading = true;
        Ok(upload)
    }

    /// Ends the outstanding upload. On success the pending file is taken and
    /// returned; on failure it stays for a retry.
    pub fn finish_upload(&mut self, succeeded: bool) -> Option<VideoUpload> {
        self.uploading = false;
        if succeeded {
            self.pending_file.take()
        } else {
            None
        }
    }

    /// Records an analyze call for `video_id`, refusing a duplicate.
    pub fn begin_analysis(&mut self, video_id: &str) -> ClientResult<()> {
        if !self.analyzing.insert(video_id.to_string()) {
            return Err(Rejection::AnalysisInFlight(video_id.to_string()).into());
        }
        Ok(())
    }

    /// Clears the in-flight mark. Returns `false` when none was recorded.
    pub fn finish_analysis(&mut self, video_id: &str) -> bool {
        self.analyzing.remove(video_id)
    }

    pub fn pending_file(&self) -> Option<&VideoUpload> {
        self.pending_file.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_analyzing(&self, video_id: &str) -> bool {
        self.analyzing.contains(video_id)
    }

    /// `true` while any analyze call is outstanding.
    pub fn any_analyzing(&self) -> bool {
        !self.analyzing.is_empty()
    }

    /// Combines the server status with the in-flight set.
    pub fn phase(&self, video_id: &str, status: VideoStatus) -> VideoPhase {
        if self.is_analyzing(video_id) {
            return VideoPhase::Analyzing;
        }
        match status {
            VideoStatus::Uploaded => VideoPhase::Uploaded,
            VideoStatus::Analyzed => VideoPhase::Analyzed,
            VideoStatus::Failed => VideoPhase::Failed,
        }
    }
}
