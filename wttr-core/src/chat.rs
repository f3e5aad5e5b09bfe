//! The host chat platform, as seen by the dispatcher.

use async_trait::async_trait;

use crate::error::ChatError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: String,
    pub channel_id: String,
    pub author: String,
    /// Raw text, with user mentions already rendered as names.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub guild_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: String,
    pub name: String,
}

/// Session state lookups and the two outbound primitives the bot needs.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Name the bot is addressed by in this session.
    fn bot_username(&self) -> &str;

    fn channel(&self, channel_id: &str) -> Result<Channel, ChatError>;

    fn guild(&self, guild_id: &str) -> Result<Guild, ChatError>;

    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), ChatError>;

    async fn send_file(
        &self,
        channel_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(), ChatError>;
}
