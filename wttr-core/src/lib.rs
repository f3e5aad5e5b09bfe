//! Core library for the `wttr` chat-bot weather commands.
//!
//! This crate defines:
//! - The wttr.in client and the decoded weather model
//! - Emoji tables and the text formatter
//! - Command parsing and the per-message dispatcher
//! - The chat-platform seam a host bot implements
//!
//! It is used by `wttr-bot`, but any chat host implementing [`ChatPlatform`]
//! can drive the [`Dispatcher`].

pub mod chat;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod emoji;
pub mod error;
pub mod format;
pub mod model;
pub mod provider;

#[cfg(test)]
mod test_support;

pub use chat::{Channel, ChatPlatform, Guild, InboundMessage};
pub use command::{Command, CommandKind};
pub use config::Config;
pub use dispatch::{Dispatcher, Outcome};
pub use error::{ChatError, WeatherError};
pub use format::{format_current, format_forecast};
pub use model::{ImageBackend, RequestKind, WeatherPayload, WeatherReport, WeatherRequest};
pub use provider::{WeatherProvider, WttrInProvider};
