//! Backend-to-UI events and error modeling for the console controller.

use client_core::GatewayError;
use shared::{
    domain::{HostRecord, ObjUuid},
    error::ErrorCode,
    protocol::ContextMenu,
};

/// Monotonic number stamped on each load-and-edit request.
pub type LoadTicket = u64;

#[derive(Debug)]
pub enum UiEvent {
    ObjectLoaded {
        ticket: LoadTicket,
        record: HostRecord,
    },
    ObjectLoadFailed {
        ticket: LoadTicket,
        objuuid: ObjUuid,
        error: UiError,
    },
    WakeCompleted {
        objuuid: ObjUuid,
        outcome: Result<(), UiError>,
    },
    ContextMenuLoaded {
        objuuid: ObjUuid,
        menu: ContextMenu,
    },
    ObjectSaved {
        record: HostRecord,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    NotFound,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadObject,
    Wake,
    ContextMenu,
    SaveObject,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("404") || message_lower.contains("not found") {
            UiErrorCategory::NotFound
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("read-only")
            || message_lower.contains("expects")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_gateway(context: UiErrorContext, err: &GatewayError) -> Self {
        let api = err.api_error();
        let category = match api.code {
            ErrorCode::NotFound => UiErrorCategory::NotFound,
            ErrorCode::Validation => UiErrorCategory::Validation,
            ErrorCode::Unavailable => UiErrorCategory::Transport,
            ErrorCode::Internal => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: api.message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_line(&self) -> String {
        let hint = match self.category {
            UiErrorCategory::Transport => "Server unreachable; check URL/network and retry.",
            UiErrorCategory::NotFound => "Object no longer exists in the inventory.",
            UiErrorCategory::Validation => "Rejected input.",
            UiErrorCategory::Unknown => "Request failed.",
        };
        format!("{hint} ({:?}: {})", self.context, self.message)
    }
}
