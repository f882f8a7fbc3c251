//! Live tracking session lifecycle and status-notice vocabulary.
//!
//! Kept free of I/O so the API crate's WebSocket session and any future
//! client tooling agree on the same transitions and notice texts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status notices
// ---------------------------------------------------------------------------

/// Broadcast once a session has registered with the hub.
pub const NOTICE_STARTED: &str = "tracking has started";

/// Broadcast after a map point (and optional aggregates) was persisted.
pub const NOTICE_UPDATED: &str = "tracking data updated";

/// Broadcast when a client message could not be persisted.
pub const NOTICE_NOT_UPDATED: &str = "tracking data not updated";

/// Broadcast when a session closes.
pub const NOTICE_STOPPED: &str = "tracking has stopped";

/// `{ "status": bool, "message": string }` frame sent to every listener of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusNotice {
    pub status: bool,
    pub message: String,
}

impl StatusNotice {
    pub fn started() -> Self {
        Self::new(true, NOTICE_STARTED)
    }

    pub fn updated() -> Self {
        Self::new(true, NOTICE_UPDATED)
    }

    pub fn not_updated() -> Self {
        Self::new(false, NOTICE_NOT_UPDATED)
    }

    pub fn stopped() -> Self {
        Self::new(false, NOTICE_STOPPED)
    }

    fn new(status: bool, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Lifecycle of one live tracking connection.
///
/// ```text
/// Idle --Registered--> Open --Announced--> Awaiting <--Handled-- Processing
///                                             |  --Received-->      |
///   (any non-terminal) --Disconnected--> Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Open,
    Awaiting,
    Processing,
    Closed,
}

/// Inputs that drive [`SessionState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Handshake done and the connection is in the hub.
    Registered,
    /// The start notice went out.
    Announced,
    /// A client frame arrived.
    MessageReceived,
    /// The frame was persisted or its failure reported.
    MessageHandled,
    /// Client close, network error, or protocol violation.
    Disconnected,
}

impl SessionState {
    /// Apply `event`, returning the next state or a validation error for an
    /// illegal transition. `Closed` accepts nothing.
    pub fn on(self, event: SessionEvent) -> Result<SessionState, CoreError> {
        use SessionEvent::*;
        use SessionState::*;

        let next = match (self, event) {
            (Closed, _) => None,
            (_, Disconnected) => Some(Closed),
            (Idle, Registered) => Some(Open),
            (Open, Announced) => Some(Awaiting),
            (Awaiting, MessageReceived) => Some(Processing),
            (Processing, MessageHandled) => Some(Awaiting),
            _ => None,
        };

        next.ok_or_else(|| {
            CoreError::Validation(format!("Invalid session transition: {self} on {event:?}"))
        })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "Idle",
            SessionState::Open => "Open",
            SessionState::Awaiting => "Awaiting",
            SessionState::Processing => "Processing",
            SessionState::Closed => "Closed",
        };
        f.write_str(name)
    }
}
