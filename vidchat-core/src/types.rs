//! Owned data types shared by the gateway, the catalog, and the controller.
//!
//! Field names follow the server's JSON documents through `serde` renames so the
//! same types decode wire payloads and back the in-memory state.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-confirmed lifecycle status of a video.
///
/// `Analyzing` is deliberately absent: it is a client-only phase tracked by the
/// workflow (see [`crate::workflow::VideoPhase`]), never a value the server stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    /// Stored on the server, not yet analyzed.
    #[default]
    Uploaded,
    /// Analysis finished; chat is available.
    Analyzed,
    /// The server recorded an analysis failure (it stores this as `"error"`).
    #[serde(alias = "error")]
    Failed,
}

impl VideoStatus {
    /// Lowercase label matching the wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            VideoStatus::Uploaded => "uploaded",
            VideoStatus::Analyzed => "analyzed",
            VideoStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque analysis payload produced by the server.
///
/// The server currently returns prose, but nothing in the client depends on that;
/// any JSON value is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Analysis(pub serde_json::Value);

impl Analysis {
    pub fn text(text: impl Into<String>) -> Self {
        Self(serde_json::Value::String(text.into()))
    }

    /// Renders the payload for display: strings verbatim, anything else as pretty JSON.
    pub fn display_text(&self) -> String {
        match &self.0 {
            serde_json::Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_default(),
        }
    }
}

/// A server-known video, as listed by `GET /api/videos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(rename = "video_id")]
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub size: u64, // bytes
    #[serde(default)]
    pub status: VideoStatus,
    #[serde(default)]
    pub analysis: Option<Analysis>,
}

impl Video {
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / 1024.0 / 1024.0
    }
}

/// One user message paired with its reply.
///
/// Turns loaded from history may lack a timestamp because the server does not
/// always record one; turns appended locally always carry the client clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub user_message: String,
    pub ai_response: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Accepts RFC 3339 or an offset-less ISO timestamp (read as UTC). Anything else,
/// including `null`, decodes as no timestamp rather than failing the whole history.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(serde_json::Value::String(raw)) = Option::<serde_json::Value>::deserialize(deserializer)?
    else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    Ok(NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc()))
}

impl Turn {
    pub fn now(user_message: impl Into<String>, ai_response: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            ai_response: ai_response.into(),
            timestamp: Some(Utc::now()),
        }
    }
}

/// A file chosen for upload: name, declared media type, and contents.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl VideoUpload {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self { filename: filename.into(), content_type: content_type.into(), bytes }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// Manual Debug so a multi-megabyte payload never lands in a log line.
impl fmt::Debug for VideoUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Success payload of `POST /api/upload-video`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadReceipt {
    #[serde(rename = "video_id")]
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub status: VideoStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/chat`. `session_id` is serialized as `null` until the server
/// has assigned one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub video_id: String,
    pub message: String,
    pub session_id: Option<String>,
}

/// Success payload of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(rename = "response")]
    pub reply: String,
    pub session_id: String,
    #[serde(default)]
    pub video_id: Option<String>,
}

/// Payload of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok")
    }
}
