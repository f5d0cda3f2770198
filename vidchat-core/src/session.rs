//! Conversation state for the selected video.
//!
//! The session manager owns the transcript, the server session id, the chat draft,
//! and the awaiting-reply flag. Every conversation is stamped with the selection
//! generation current when it was created; completions carry the generation they
//! were issued under and are dropped when the two no longer match.

use tracing::{debug, info};

use crate::error::{ClientError, ClientResult, GatewayResult, Rejection};
use crate::types::{ChatReply, ChatRequest, Turn, Video, VideoStatus};

/// Transcript and server session for one video.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub video_id: String,
    pub session_id: Option<String>, // assigned by the first reply
    pub turns: Vec<Turn>,
    generation: u64,
}

impl Conversation {
    fn new(video_id: &str, generation: u64) -> Self {
        Self { video_id: video_id.to_string(), session_id: None, turns: Vec::new(), generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of applying a chat reply.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// A new turn was appended.
    Appended,
    /// The server refused or the call failed; transcript and draft are untouched.
    Failed(ClientError),
    /// The conversation it belonged to is gone.
    Stale,
}

/// Result of applying a history fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryOutcome {
    Loaded(usize),
    Failed(ClientError),
    Stale,
}

#[derive(Debug, Default)]
pub struct SessionManager {
    conversation: Option<Conversation>,
    draft: String,
    awaiting_reply: bool,
    history_loading: bool,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an empty conversation for `video_id` and marks history as loading.
    ///
    /// The previous conversation, including its awaiting-reply state, is dropped;
    /// its outstanding calls will resolve as stale. The draft survives.
    pub fn reset(&mut self, video_id: &str, generation: u64) {
        self.conversation = Some(Conversation::new(video_id, generation));
        self.awaiting_reply = false;
        self.history_loading = true;
    }

    /// Drops the conversation entirely (no video selected).
    pub fn clear(&mut self) {
        self.conversation = None;
        self.awaiting_reply = false;
        self.history_loading = false;
    }

    fn is_current(&self, video_id: &str, generation: u64) -> bool {
        self.conversation
            .as_ref()
            .is_some_and(|c| c.generation == generation && c.video_id == video_id)
    }

    /// Applies prior history fetched for the conversation.
    ///
    /// History goes in front of any turns already appended locally, so a reply that
    /// landed before the fetch is kept.
    pub fn apply_history(
        &mut self,
        video_id: &str,
        generation: u64,
        result: GatewayResult<Vec<Turn>>,
    ) -> HistoryOutcome {
        if !self.is_current(video_id, generation) {
            debug!(%video_id, generation, "discarding stale chat history");
            return HistoryOutcome::Stale;
        }
        self.history_loading = false;
        let Some(conversation) = self.conversation.as_mut() else {
            return HistoryOutcome::Stale;
        };
        match result {
            Ok(mut history) => {
                let loaded = history.len();
                history.append(&mut conversation.turns);
                conversation.turns = history;
                HistoryOutcome::Loaded(loaded)
            }
            Err(err) => HistoryOutcome::Failed(err.into()),
        }
    }

    /// Checks the send preconditions against `selected` and builds the request.
    ///
    /// On success the awaiting-reply flag is set; the draft is kept until the reply
    /// arrives.
    pub fn begin_send(&mut self, selected: Option<&Video>) -> ClientResult<(ChatRequest, u64)> {
        let video = selected.ok_or_else(|| ClientError::validation("select a video first"))?;
        if video.status != VideoStatus::Analyzed {
            return Err(ClientError::validation(
                "video needs to be analyzed before you can chat about it",
            ));
        }
        if self.awaiting_reply {
            return Err(Rejection::ReplyPending.into());
        }
        if self.draft.trim().is_empty() {
            return Err(ClientError::validation("type a message first"));
        }
        let conversation = self
            .conversation
            .as_ref()
            .filter(|c| c.video_id == video.id)
            .ok_or_else(|| ClientError::validation("select a video first"))?;

        let request = ChatRequest {
            video_id: video.id.clone(),
            message: self.draft.clone(),
            session_id: conversation.session_id.clone(),
        };
        self.awaiting_reply = true;
        Ok((request, conversation.generation))
    }

    /// Applies the reply to a message sent under `generation`.
    pub fn complete_send(
        &mut self,
        video_id: &str,
        generation: u64,
        message: String,
        result: GatewayResult<ChatReply>,
    ) -> SendOutcome {
        if !self.is_current(video_id, generation) {
            debug!(%video_id, generation, "discarding reply for a previous selection");
            return SendOutcome::Stale;
        }
        self.awaiting_reply = false;
        let Some(conversation) = self.conversation.as_mut() else {
            return SendOutcome::Stale;
        };
        match result {
            Ok(reply) => {
                // Only clear what was sent; a draft typed while waiting survives.
                if self.draft == message {
                    self.draft.clear();
                }
                conversation.turns.push(Turn::now(message, reply.reply));
                conversation.session_id = Some(reply.session_id);
                info!(%video_id, turns = conversation.turns.len(), "reply appended");
                SendOutcome::Appended
            }
            Err(err) => SendOutcome::Failed(err.into()),
        }
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    pub fn turns(&self) -> &[Turn] {
        self.conversation.as_ref().map(|c| c.turns.as_slice()).unwrap_or_default()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.conversation.as_ref().and_then(|c| c.session_id.as_deref())
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn is_history_loading(&self) -> bool {
        self.history_loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;

    fn analyzed(id: &str) -> Video {
        Video {
            id: id.into(),
            filename: "clip.mp4".into(),
            size: 1,
            status: VideoStatus::Analyzed,
            analysis: None,
        }
    }

    fn reply(text: &str, session: &str) -> GatewayResult<ChatReply> {
        Ok(ChatReply { reply: text.into(), session_id: session.into(), video_id: None })
    }

    #[test]
    fn draft_survives_a_failed_send() {
        let mut sm = SessionManager::new();
        let video = analyzed("v");
        sm.reset("v", 1);
        sm.set_draft("hello");
        let (req, gen) = sm.begin_send(Some(&video)).unwrap();
        let outcome = sm.complete_send(
            "v",
            gen,
            req.message,
            Err(GatewayError::Server { status: 500, detail: "boom".into() }),
        );
        assert!(matches!(outcome, SendOutcome::Failed(ClientError::Server { .. })));
        assert_eq!(sm.draft(), "hello");
        assert!(sm.turns().is_empty());
        assert!(!sm.is_awaiting_reply());
    }

    #[test]
    fn unanalyzed_video_cannot_chat() {
        let mut sm = SessionManager::new();
        let mut video = analyzed("v");
        video.status = VideoStatus::Uploaded;
        sm.reset("v", 1);
        sm.set_draft("hi");
        assert!(matches!(sm.begin_send(Some(&video)), Err(ClientError::Validation(_))));
        assert!(!sm.is_awaiting_reply());
    }

    #[test]
    fn blank_draft_is_rejected() {
        let mut sm = SessionManager::new();
        sm.reset("v", 1);
        sm.set_draft("   \n");
        assert!(matches!(sm.begin_send(Some(&analyzed("v"))), Err(ClientError::Validation(_))));
    }

    #[test]
    fn history_goes_before_locally_appended_turns() {
        let mut sm = SessionManager::new();
        let video = analyzed("v");
        sm.reset("v", 3);
        sm.set_draft("new question");
        let (req, gen) = sm.begin_send(Some(&video)).unwrap();
        sm.complete_send("v", gen, req.message, reply("new answer", "s9"));

        let old = Turn { user_message: "old".into(), ai_response: "older".into(), timestamp: None };
        assert_eq!(sm.apply_history("v", 3, Ok(vec![old])), HistoryOutcome::Loaded(1));
        let msgs: Vec<_> = sm.turns().iter().map(|t| t.user_message.as_str()).collect();
        assert_eq!(msgs, ["old", "new question"]);
        assert!(!sm.is_history_loading());
    }

    #[test]
    fn reply_after_reset_is_stale() {
        let mut sm = SessionManager::new();
        let video = analyzed("v");
        sm.reset("v", 1);
        sm.set_draft("q");
        let (req, gen) = sm.begin_send(Some(&video)).unwrap();
        sm.reset("w", 2);
        assert_eq!(sm.complete_send("v", gen, req.message, reply("a", "s1")), SendOutcome::Stale);
        assert!(sm.turns().is_empty());
        assert_eq!(sm.draft(), "q");
    }
}
