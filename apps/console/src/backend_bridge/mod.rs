//! Bridge between the UI thread and the async inventory gateway.

pub mod commands;
pub mod runtime;
