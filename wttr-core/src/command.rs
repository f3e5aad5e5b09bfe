//! Recognises weather commands in raw chat text.

use std::fmt;

use crate::model::{ImageBackend, RequestKind, WeatherRequest};

/// Stand-in for the bot's own name so mentions don't shift the tokens.
pub const MENTION_PLACEHOLDER: &str = "username";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// `!wttr`: current conditions as text.
    Current,
    /// `!wttrf`: multi-day forecast as text.
    Forecast,
    /// `!wttrs`: wttr.in's own one-line summary.
    OneLine,
    /// `!wttrp` / `!wttrp2`: PNG snapshot.
    Image(ImageBackend),
}

impl CommandKind {
    pub fn trigger(&self) -> &'static str {
        match self {
            CommandKind::Current => "!wttr",
            CommandKind::Forecast => "!wttrf",
            CommandKind::OneLine => "!wttrs",
            CommandKind::Image(ImageBackend::V1) => "!wttrp",
            CommandKind::Image(ImageBackend::V2) => "!wttrp2",
        }
    }

    pub const fn all() -> &'static [CommandKind] {
        &[
            CommandKind::Current,
            CommandKind::Forecast,
            CommandKind::OneLine,
            CommandKind::Image(ImageBackend::V1),
            CommandKind::Image(ImageBackend::V2),
        ]
    }

    /// Case-insensitive match of a first token.
    pub fn from_trigger(token: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.trigger().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.trigger())
    }
}

/// A recognised command with its location argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub location: String,
    /// Rendering options after `?`, image commands only.
    pub style: Option<String>,
    tokens: Vec<String>,
}

impl Command {
    /// Parse a message. `None` means "not for us": unknown command, or no location.
    pub fn parse(text: &str, bot_username: &str) -> Option<Self> {
        let mut tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if let Some(mention) = tokens.iter_mut().find(|t| is_mention(t, bot_username)) {
            *mention = MENTION_PLACEHOLDER.to_string();
        }

        let kind = CommandKind::from_trigger(tokens.first()?)?;

        let args = tokens[1..].join(" ");
        let (location, style) = match kind {
            CommandKind::Image(_) => match args.split_once('?') {
                Some((location, style)) => (location.trim(), Some(style.trim().to_string())),
                None => (args.as_str(), None),
            },
            _ => (args.as_str(), None),
        };

        if location.is_empty() {
            return None;
        }

        Some(Self {
            kind,
            location: location.to_string(),
            style: style.filter(|s| !s.is_empty()),
            tokens,
        })
    }

    /// Attachment name for image replies: the original tokens run together.
    pub fn attachment_name(&self) -> String {
        format!("{}.png", self.tokens.concat())
    }

    pub fn request(&self) -> WeatherRequest {
        let kind = match self.kind {
            CommandKind::Current | CommandKind::Forecast => RequestKind::Report,
            CommandKind::OneLine => RequestKind::OneLine,
            CommandKind::Image(backend) => RequestKind::Image {
                backend,
                style: self.style.clone(),
            },
        };
        WeatherRequest::new(self.location.clone(), kind)
    }
}

/// `bot`, `@bot`, and either followed by punctuation such as `@bot,` or `@bot:`.
fn is_mention(token: &str, bot_username: &str) -> bool {
    if bot_username.is_empty() {
        return false;
    }
    let name = token.strip_prefix('@').unwrap_or(token);
    name == bot_username
        || name.trim_end_matches(|c: char| c.is_ascii_punctuation()) == bot_username
}
