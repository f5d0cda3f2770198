//! Error taxonomy for the gateway and the controller.

use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure of a single gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No usable response: connection failure, timeout, undecodable body, or a
    /// non-success response without a `detail` field.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-success status and a `detail` string.
    #[error("{detail}")]
    Server { status: u16, detail: String },
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

/// An action refused locally because the same action is already outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("an upload is already in progress")]
    UploadInProgress,

    #[error("video {0} is already being analyzed")]
    AnalysisInFlight(String),

    #[error("still waiting for the previous reply")]
    ReplyPending,
}

/// Everything an action entry point or a completion can surface to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Local validation failure; never reaches the network.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("{0}")]
    Transport(String),

    #[error("{detail}")]
    Server { status: u16, detail: String },
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// The human-readable text shown to the user.
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

impl From<GatewayError> for ClientError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Transport(message) => ClientError::Transport(message),
            GatewayError::Server { status, detail } => ClientError::Server { status, detail },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_detail_is_shown_verbatim() {
        let err: ClientError = GatewayError::Server {
            status: 500,
            detail: "model timeout".into(),
        }
        .into();
        assert_eq!(err.detail(), "model timeout");
    }
}
