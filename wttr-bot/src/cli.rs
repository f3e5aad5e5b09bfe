use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use std::{path::PathBuf, sync::Arc};
use wttr_core::{CommandKind, Config, Dispatcher, InboundMessage, Outcome, WttrInProvider};

use crate::console::{CHANNEL_ID, ConsoleChat};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wttr", version, about = "wttr.in weather commands, chat-bot style")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Handle one chat message, e.g. `wttr say '!wttrf Berlin'`.
    Say {
        /// Message text; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        message: Vec<String>,
    },

    /// Read messages interactively until an empty line.
    Chat,

    /// Interactively edit the stored configuration.
    Configure,

    /// Print the configuration file path.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Say { message } => {
                let session = Session::from_config(Config::load()?)?;
                session.handle(1, message.join(" ")).await;
            }
            Command::Chat => {
                let session = Session::from_config(Config::load()?)?;
                chat_loop(&session).await?;
            }
            Command::Configure => configure()?,
            Command::ConfigPath => println!("{}", Config::config_file_path()?.display()),
        }

        Ok(())
    }
}

/// Dispatcher plus the console it answers into.
struct Session {
    dispatcher: Dispatcher,
    chat: ConsoleChat,
}

impl Session {
    fn from_config(config: Config) -> anyhow::Result<Self> {
        let provider =
            WttrInProvider::new(&config).context("Failed to create wttr.in client")?;
        let output_dir = config.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            dispatcher: Dispatcher::new(Arc::new(provider)),
            chat: ConsoleChat::new(config.bot_username, output_dir),
        })
    }

    async fn handle(&self, id: u64, content: String) -> Outcome {
        let message = InboundMessage {
            id: id.to_string(),
            channel_id: CHANNEL_ID.to_string(),
            author: whoami(),
            content,
        };
        self.dispatcher.handle_message(&self.chat, &message).await
    }
}

async fn chat_loop(session: &Session) -> anyhow::Result<()> {
    let triggers: Vec<&str> = CommandKind::all().iter().map(|k| k.trigger()).collect();
    println!("Commands: {} <location>. Empty line quits.", triggers.join(", "));

    for id in 1.. {
        let line = match Text::new(">").prompt_skippable() {
            Ok(Some(line)) if !line.trim().is_empty() => line,
            Ok(_) => break,
            Err(inquire::InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read message"),
        };

        if session.handle(id, line).await == Outcome::Ignored {
            println!("(not a weather command)");
        }
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.bot_username = Text::new("Bot username:")
        .with_default(&config.bot_username)
        .prompt()?;

    config.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.timeout_secs)
        .prompt()?;
    anyhow::ensure!(config.timeout_secs > 0, "Request timeout must be greater than zero");

    let current_dir = config
        .output_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let output_dir = Text::new("Directory for image replies (empty = current dir):")
        .with_initial_value(&current_dir)
        .prompt()?;
    config.output_dir = Some(output_dir.trim())
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from);

    config.save()?;
    println!("Saved {}", Config::config_file_path()?.display());
    Ok(())
}

fn whoami() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "console".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn say_joins_words() {
        let cli = Cli::try_parse_from(["wttr", "say", "!wttr", "New", "York"]).unwrap();
        match cli.command {
            Command::Say { message } => assert_eq!(message.join(" "), "!wttr New York"),
            other => panic!("expected say, got {other:?}"),
        }
    }

    #[test]
    fn say_requires_a_message() {
        assert!(Cli::try_parse_from(["wttr", "say"]).is_err());
    }
}
