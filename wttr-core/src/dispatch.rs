//! Turns one inbound chat message into at most one reply.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::{
    chat::{ChatPlatform, InboundMessage},
    command::{Command, CommandKind},
    error::WeatherError,
    format::{format_current, format_forecast},
    model::WeatherPayload,
    provider::WeatherProvider,
};

/// What happened to a message, mostly for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not a weather command, or a command without a location.
    Ignored,
    /// Channel or guild could not be resolved; nothing was sent.
    Aborted,
    /// The weather reply was delivered.
    Replied,
    /// The fetch failed and the error reply was delivered.
    Failed,
    /// A reply was attempted but the platform rejected it.
    SendFailed,
}

enum Reply {
    Text(String),
    File { name: String, bytes: Vec<u8> },
}

/// Stateless message handler, shareable across tasks.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    provider: Arc<dyn WeatherProvider>,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    #[instrument(skip_all, fields(message_id = %message.id, channel_id = %message.channel_id))]
    pub async fn handle_message(
        &self,
        chat: &dyn ChatPlatform,
        message: &InboundMessage,
    ) -> Outcome {
        let Some(command) = Command::parse(&message.content, chat.bot_username()) else {
            return Outcome::Ignored;
        };

        let channel = match chat.channel(&message.channel_id) {
            Ok(channel) => channel,
            Err(err) => {
                error!(error = %err, "failed to grab channel");
                return Outcome::Aborted;
            }
        };
        let guild = match chat.guild(&channel.guild_id) {
            Ok(guild) => guild,
            Err(err) => {
                error!(guild_id = %channel.guild_id, error = %err, "failed to grab guild");
                return Outcome::Aborted;
            }
        };

        info!(
            command = %command.kind,
            location = %command.location,
            author = %message.author,
            guild = %guild.name,
            "handling weather command"
        );

        let (reply, outcome) = match self.provider.fetch_weather(&command.request()).await {
            Ok(payload) => match render(&command, payload) {
                Ok(reply) => (reply, Outcome::Replied),
                Err(err) => error_reply(&command, &err),
            },
            Err(err) => error_reply(&command, &err),
        };

        let sent = match &reply {
            Reply::Text(text) => chat.send_text(&channel.id, text).await,
            Reply::File { name, bytes } => chat.send_file(&channel.id, name, bytes).await,
        };

        match sent {
            Ok(()) => {
                debug!(?outcome, "reply sent");
                outcome
            }
            Err(err) => {
                error!(error = %err, "failed to send message");
                Outcome::SendFailed
            }
        }
    }
}

fn error_reply(command: &Command, err: &WeatherError) -> (Reply, Outcome) {
    error!(location = %command.location, error = %err, "failed to get weather");
    let text = format!("Failed to get weather for {}: {err}", command.location);
    (Reply::Text(text), Outcome::Failed)
}

fn render(command: &Command, payload: WeatherPayload) -> Result<Reply, WeatherError> {
    let reply = match (command.kind, payload) {
        (CommandKind::Current, WeatherPayload::Report(report)) => {
            Reply::Text(format_current(&report))
        }
        (CommandKind::Forecast, WeatherPayload::Report(report)) => {
            Reply::Text(format_forecast(&report))
        }
        (CommandKind::OneLine, WeatherPayload::Line(line)) => Reply::Text(line),
        (CommandKind::Image(_), WeatherPayload::Image(bytes)) => Reply::File {
            name: command.attachment_name(),
            bytes,
        },
        (kind, _) => {
            return Err(WeatherError::Decode(format!(
                "unexpected payload for {kind}"
            )));
        }
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chat::{Channel, Guild},
        error::ChatError,
        model::{Area, CurrentConditions, RequestKind, WeatherReport, WeatherRequest},
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct FakeProvider {
        result: fn() -> Result<WeatherPayload, WeatherError>,
        calls: Mutex<Vec<WeatherRequest>>,
    }

    impl FakeProvider {
        fn new(result: fn() -> Result<WeatherPayload, WeatherError>) -> Arc<Self> {
            Arc::new(Self { result, calls: Mutex::new(Vec::new()) })
        }

        fn calls(&self) -> Vec<WeatherRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_weather(
            &self,
            request: &WeatherRequest,
        ) -> Result<WeatherPayload, WeatherError> {
            self.calls.lock().unwrap().push(request.clone());
            (self.result)()
        }
    }

    #[derive(Debug, PartialEq)]
    enum Sent {
        Text(String, String),
        File(String, String, usize),
    }

    #[derive(Default)]
    struct FakeChat {
        known_channel: bool,
        known_guild: bool,
        fail_sends: bool,
        sent: Mutex<Vec<Sent>>,
    }

    impl FakeChat {
        fn healthy() -> Self {
            Self { known_channel: true, known_guild: true, ..Self::default() }
        }

        fn sent(&self) -> Vec<Sent> {
            std::mem::take(&mut *self.sent.lock().unwrap())
        }
    }

    #[async_trait]
    impl ChatPlatform for FakeChat {
        fn bot_username(&self) -> &str {
            "wttrbot"
        }

        fn channel(&self, channel_id: &str) -> Result<Channel, ChatError> {
            if !self.known_channel {
                return Err(ChatError::UnknownChannel(channel_id.into()));
            }
            Ok(Channel { id: channel_id.into(), guild_id: "g1".into(), name: "general".into() })
        }

        fn guild(&self, guild_id: &str) -> Result<Guild, ChatError> {
            if !self.known_guild {
                return Err(ChatError::UnknownGuild(guild_id.into()));
            }
            Ok(Guild { id: guild_id.into(), name: "Weather Fans".into() })
        }

        async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), ChatError> {
            self.sent.lock().unwrap().push(Sent::Text(channel_id.into(), text.into()));
            if self.fail_sends {
                return Err(ChatError::Send { channel_id: channel_id.into(), reason: "403".into() });
            }
            Ok(())
        }

        async fn send_file(
            &self,
            channel_id: &str,
            file_name: &str,
            bytes: &[u8],
        ) -> Result<(), ChatError> {
            self.sent
                .lock()
                .unwrap()
                .push(Sent::File(channel_id.into(), file_name.into(), bytes.len()));
            if self.fail_sends {
                return Err(ChatError::Send { channel_id: channel_id.into(), reason: "403".into() });
            }
            Ok(())
        }
    }

    fn message(content: &str) -> InboundMessage {
        InboundMessage {
            id: "m1".into(),
            channel_id: "c1".into(),
            author: "someone".into(),
            content: content.into(),
        }
    }

    fn report() -> Result<WeatherPayload, WeatherError> {
        Ok(WeatherPayload::Report(WeatherReport {
            current: CurrentConditions {
                temp_c: 20.0,
                temp_f: 68.0,
                feels_like_c: 19.0,
                feels_like_f: 66.0,
                humidity_pct: 40,
                wind_speed_kmph: 7.0,
                wind_compass: "S".into(),
                wind_degree: 180,
                condition_code: 113,
                description: "Sunny".into(),
            },
            area: Area { name: "Madrid".into(), country: "Spain".into(), region: String::new() },
            days: Vec::new(),
        }))
    }

    fn png() -> Result<WeatherPayload, WeatherError> {
        Ok(WeatherPayload::Image(vec![1, 2, 3, 4]))
    }

    fn not_found() -> Result<WeatherPayload, WeatherError> {
        Err(WeatherError::NotFound { location: "Atlantis".into() })
    }

    #[tokio::test]
    async fn current_command_replies_with_formatted_block() {
        let provider = FakeProvider::new(report);
        let chat = FakeChat::healthy();
        let dispatcher = Dispatcher::new(provider.clone());

        let outcome = dispatcher.handle_message(&chat, &message("!wttr Madrid")).await;

        assert_eq!(outcome, Outcome::Replied);
        assert_eq!(provider.calls(), vec![WeatherRequest::new("Madrid", RequestKind::Report)]);
        let sent = chat.sent();
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            Sent::Text(channel, text) => {
                assert_eq!(channel, "c1");
                assert!(text.starts_with("```📍 Madrid, Spain\n"));
            }
            other => panic!("expected text reply, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn command_without_location_does_nothing() {
        let provider = FakeProvider::new(report);
        let chat = FakeChat::healthy();

        let outcome = Dispatcher::new(provider.clone())
            .handle_message(&chat, &message("!wttr"))
            .await;

        assert_eq!(outcome, Outcome::Ignored);
        assert!(provider.calls().is_empty());
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn unrelated_chatter_is_ignored() {
        let provider = FakeProvider::new(report);
        let chat = FakeChat::healthy();

        let outcome = Dispatcher::new(provider.clone())
            .handle_message(&chat, &message("nice weather today"))
            .await;

        assert_eq!(outcome, Outcome::Ignored);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_channel_aborts_without_reply() {
        let provider = FakeProvider::new(report);
        let chat = FakeChat::default();

        let outcome = Dispatcher::new(provider.clone())
            .handle_message(&chat, &message("!wttr Madrid"))
            .await;

        assert_eq!(outcome, Outcome::Aborted);
        assert!(provider.calls().is_empty());
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn unknown_guild_aborts_without_reply() {
        let provider = FakeProvider::new(report);
        let chat = FakeChat { known_channel: true, ..FakeChat::default() };

        let outcome = Dispatcher::new(provider)
            .handle_message(&chat, &message("!wttrf Madrid"))
            .await;

        assert_eq!(outcome, Outcome::Aborted);
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_sends_one_error_reply() {
        let chat = FakeChat::healthy();

        let outcome = Dispatcher::new(FakeProvider::new(not_found))
            .handle_message(&chat, &message("!wttr Atlantis"))
            .await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(
            chat.sent(),
            vec![Sent::Text(
                "c1".into(),
                "Failed to get weather for Atlantis: location not found: Atlantis".into()
            )]
        );
    }

    #[tokio::test]
    async fn image_command_sends_named_attachment() {
        let provider = FakeProvider::new(png);
        let chat = FakeChat::healthy();

        let outcome = Dispatcher::new(provider.clone())
            .handle_message(&chat, &message("!wttrp2 Rio de Janeiro?2"))
            .await;

        assert_eq!(outcome, Outcome::Replied);
        assert_eq!(
            chat.sent(),
            vec![Sent::File("c1".into(), "!wttrp2RiodeJaneiro?2.png".into(), 4)]
        );
        assert_eq!(provider.calls()[0].location, "Rio de Janeiro");
    }

    #[tokio::test]
    async fn send_failure_is_not_retried() {
        let chat = FakeChat { fail_sends: true, ..FakeChat::healthy() };

        let outcome = Dispatcher::new(FakeProvider::new(not_found))
            .handle_message(&chat, &message("!wttr Atlantis"))
            .await;

        assert_eq!(outcome, Outcome::SendFailed);
        assert_eq!(chat.sent().len(), 1);
    }

    #[tokio::test]
    async fn mismatched_payload_is_reported_as_error() {
        let chat = FakeChat::healthy();

        let outcome = Dispatcher::new(FakeProvider::new(png))
            .handle_message(&chat, &message("!wttr Madrid"))
            .await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(chat.sent().len(), 1);
    }
}
