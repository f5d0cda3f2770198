//! In-memory mirror of the server's video list.
//!
//! The catalog is replaced wholesale by each applied list response and only ever
//! edited in place from server-confirmed results. It never sorts, filters, or
//! guesses a status on its own.

use std::collections::HashSet;

use tracing::debug;

use crate::types::{Analysis, Video, VideoStatus};

/// Ordered collection of videos keyed by id.
///
/// List requests are numbered by [`Catalog::next_request_seq`]; a response is only
/// applied if it is newer than the last one applied, so a slow refresh cannot
/// overwrite a fresher list.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    videos: Vec<Video>,
    issued_seq: u64,
    applied_seq: u64,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the sequence number for a new list request.
    pub fn next_request_seq(&mut self) -> u64 {
        self.issued_seq += 1;
        self.issued_seq
    }

    /// Replaces the whole collection with a list response issued as `seq`.
    ///
    /// Duplicate ids keep their first occurrence. Returns `false` (catalog untouched)
    /// when a newer response has already been applied.
    pub fn replace(&mut self, seq: u64, videos: Vec<Video>) -> bool {
        if seq <= self.applied_seq {
            debug!(seq, applied = self.applied_seq, "discarding out-of-order video list");
            return false;
        }
        self.applied_seq = seq;

        let mut seen = HashSet::with_capacity(videos.len());
        self.videos = videos.into_iter().filter(|v| seen.insert(v.id.clone())).collect();
        true
    }

    /// Sets the status (and, when given, the analysis) of an existing entry.
    ///
    /// No-op returning `false` when `id` is no longer in the catalog.
    pub fn upsert_status(
        &mut self,
        id: &str,
        status: VideoStatus,
        analysis: Option<Analysis>,
    ) -> bool {
        let Some(video) = self.videos.iter_mut().find(|v| v.id == id) else {
            return false;
        };
        video.status = status;
        if analysis.is_some() {
            video.analysis = analysis;
        }
        self.supersede_in_flight();
        true
    }

    /// Appends a freshly uploaded video unless the id is already listed.
    pub fn insert_uploaded(&mut self, video: Video) -> bool {
        if self.contains(&video.id) {
            return false;
        }
        self.videos.push(video);
        self.supersede_in_flight();
        true
    }

    /// Whether a response issued as `seq` is newer than everything applied since.
    pub fn is_current(&self, seq: u64) -> bool {
        seq > self.applied_seq
    }

    /// Swaps in the server's copy of a single entry fetched as `seq`, keeping its
    /// position. No-op when the id is absent or the fetch has been superseded.
    pub fn replace_entry(&mut self, seq: u64, video: Video) -> bool {
        if !self.is_current(seq) {
            debug!(seq, applied = self.applied_seq, id = %video.id, "discarding superseded video");
            return false;
        }
        match self.videos.iter_mut().find(|v| v.id == video.id) {
            Some(slot) => {
                *slot = video;
                self.supersede_in_flight();
                true
            }
            None => false,
        }
    }

    /// A local edit is newer than any list already requested; those responses
    /// would roll it back, so they are treated as applied.
    fn supersede_in_flight(&mut self) {
        self.applied_seq = self.issued_seq;
    }

    pub fn get(&self, id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.videos.iter().position(|v| v.id == id)
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}
