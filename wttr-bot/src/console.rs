//! A single-channel chat platform backed by the terminal.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;
use wttr_core::{Channel, ChatError, ChatPlatform, Guild};

pub const CHANNEL_ID: &str = "console";
const GUILD_ID: &str = "local";

/// Text replies go to stdout; image replies are written under `output_dir`.
#[derive(Debug, Clone)]
pub struct ConsoleChat {
    bot_username: String,
    output_dir: PathBuf,
}

impl ConsoleChat {
    pub fn new(bot_username: String, output_dir: PathBuf) -> Self {
        Self {
            bot_username,
            output_dir,
        }
    }
}

#[async_trait]
impl ChatPlatform for ConsoleChat {
    fn bot_username(&self) -> &str {
        &self.bot_username
    }

    fn channel(&self, channel_id: &str) -> Result<Channel, ChatError> {
        if channel_id != CHANNEL_ID {
            return Err(ChatError::UnknownChannel(channel_id.to_string()));
        }
        Ok(Channel {
            id: CHANNEL_ID.to_string(),
            guild_id: GUILD_ID.to_string(),
            name: "console".to_string(),
        })
    }

    fn guild(&self, guild_id: &str) -> Result<Guild, ChatError> {
        if guild_id != GUILD_ID {
            return Err(ChatError::UnknownGuild(guild_id.to_string()));
        }
        Ok(Guild {
            id: GUILD_ID.to_string(),
            name: "local".to_string(),
        })
    }

    async fn send_text(&self, _channel_id: &str, text: &str) -> Result<(), ChatError> {
        println!("{text}");
        Ok(())
    }

    async fn send_file(
        &self,
        channel_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(), ChatError> {
        // Attachment names come from user input; keep only the final component.
        let name = PathBuf::from(file_name)
            .file_name()
            .map(|n| n.to_owned())
            .ok_or_else(|| ChatError::Send {
                channel_id: channel_id.to_string(),
                reason: format!("invalid file name {file_name:?}"),
            })?;
        let path = self.output_dir.join(name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| ChatError::Send {
                channel_id: channel_id.to_string(),
                reason: format!("{}: {err}", path.display()),
            })?;

        info!(path = %path.display(), bytes = bytes.len(), "wrote image reply");
        println!("[image saved to {}]", path.display());
        Ok(())
    }
}
