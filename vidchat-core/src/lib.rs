//! Client-side workflow and conversation state for the video chat backend.
//!
//! The crate is headless: [`Controller`] owns every piece of mutable state and
//! exposes synchronous entry points that return [`Request`]s, the [`Gateway`]
//! trait describes the backend, and [`Dispatcher`] runs requests and feeds their
//! [`Completion`]s back to whoever owns the controller.

pub mod catalog;
pub mod controller;
pub mod dispatch;
pub mod effect;
pub mod error;
pub mod gateway;
pub mod media;
pub mod notify;
pub mod session;
pub mod types;
pub mod workflow;

pub use catalog::Catalog;
pub use controller::{Controller, PendingFlags};
pub use dispatch::Dispatcher;
pub use effect::{execute, Completion, Request};
pub use error::{ClientError, ClientResult, GatewayError, GatewayResult, Rejection};
pub use gateway::{Gateway, GatewayConfig, HttpGateway};
pub use notify::{Notice, NoticeLevel, StateChange};
pub use session::{Conversation, SessionManager};
pub use types::{
    Analysis, ChatReply, ChatRequest, HealthStatus, Turn, UploadReceipt, Video, VideoStatus,
    VideoUpload,
};
pub use workflow::VideoPhase;
