//! # Poll Plugin
//!
//! Per-room yes/no polls, one vote per user (the last one counts).
//!
//! ```text
//! #general | Me: poll start lunch at noon?
//! #general | Botty: *POLL STARTED:* lunch at noon? ...
//! #general | Me: poll yep
//! #general | Me: poll status
//! #general | Botty: *POLL STATUS:* lunch at noon? of the 1 people who voted, 1 people agree (100%) ...
//! #general | Me: poll end
//! ```
//!
//! Each running poll is a flow instance keyed by room, so votes can also be
//! sent from elsewhere with `poll y #room`. That is how anonymous polls
//! (`poll secret ...`) are meant to be voted on; their tallies never list
//! who voted what.

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::application::flow::{Flow, Suspender};
use crate::domain::traits::{ChatProvider, Plugin};
use crate::domain::types::IncomingMessage;
use crate::interface::plugins::Reply;
use crate::strings::messages;

static START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*\bpoll\s+(?:start|begin|create)\b(?:\s+(.+))?").unwrap());
static SECRET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*\bpoll\s+(?:private|privately|secret|secretly|anon|anonymous|anonymously)\b(?:\s+(.+))?",
    )
    .unwrap()
});
static YES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\bpoll\s+(?:y|ye+s+|yeah?|su+re+|ye+p|yee+|yah?)\b(?:\s+(\S+))?").unwrap()
});
static NO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*\bpoll\s+(?:n|no+|na+h?|no+pe|nay)\b(?:\s+(\S+))?").unwrap());
static STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*\bpoll\s+(?:check|status|ready)\b").unwrap());
static END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*\bpoll\s+(?:end|stop|close|finish)\b").unwrap());

/// Input of a running poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollInput {
    Vote { user: String, agree: bool },
    Status,
    End,
}

/// Start arguments of a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollArgs {
    pub question: String,
    pub channel: String,
    pub anonymous: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Start { question: String, anonymous: bool },
    Vote { agree: bool, channel: Option<String> },
    Status,
    End,
}

fn parse(text: &str) -> Option<Command> {
    for (pattern, anonymous) in [(&*START, false), (&*SECRET, true)] {
        if let Some(caps) = pattern.captures(text) {
            let question = caps.get(1).map(|m| m.as_str().trim().to_string());
            return Some(Command::Start {
                question: question.unwrap_or_default(),
                anonymous,
            });
        }
    }
    for (pattern, agree) in [(&*YES, true), (&*NO, false)] {
        if let Some(caps) = pattern.captures(text) {
            let channel = caps.get(1).map(|m| m.as_str().to_string());
            return Some(Command::Vote { agree, channel });
        }
    }
    if STATUS.is_match(text) {
        return Some(Command::Status);
    }
    if END.is_match(text) {
        return Some(Command::End);
    }
    None
}

async fn run_poll(co: Suspender<PollInput, Reply>, args: PollArgs) -> anyhow::Result<Reply> {
    let PollArgs {
        question,
        channel,
        anonymous,
    } = args;
    let (started, status, result) = if anonymous {
        (
            messages::anonymous_poll_started(&question, &channel),
            "ANONYMOUS POLL STATUS",
            "ANONYMOUS POLL RESULT",
        )
    } else {
        (messages::poll_started(&question), "POLL STATUS", "POLL RESULT")
    };

    let mut votes = BTreeMap::new();
    let mut input = co.suspend(Reply::say(started)).await;
    loop {
        let reply = match input {
            PollInput::Vote { user, agree } => {
                votes.insert(user, agree);
                Reply::handled()
            }
            PollInput::Status => Reply::say(messages::poll_tally(status, &question, &votes, anonymous)),
            PollInput::End => {
                return Ok(Reply::say(messages::poll_tally(result, &question, &votes, anonymous)));
            }
        };
        input = co.suspend(reply).await;
    }
}

pub struct PollPlugin {
    flow: Flow<String, PollInput, Reply, PollArgs>,
}

impl Default for PollPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl PollPlugin {
    pub fn new() -> Self {
        Self {
            flow: Flow::new("poll", run_poll),
        }
    }

    /// Steps the poll running in `channel`, telling the user when there is none.
    async fn forward(&mut self, chat: &dyn ChatProvider, channel: String, input: PollInput) -> Result<bool> {
        match self.flow.step(&channel, input).await? {
            Some(reply) => reply.deliver(chat).await,
            None => Reply::say(messages::no_poll_running(&channel)).deliver(chat).await,
        }
    }
}

#[async_trait]
impl Plugin for PollPlugin {
    fn name(&self) -> &'static str {
        "poll"
    }

    async fn on_message(&mut self, chat: &dyn ChatProvider, message: &IncomingMessage) -> Result<bool> {
        let Some(command) = parse(&message.text) else {
            return Ok(false);
        };
        let channel = message.channel.clone();

        match command {
            Command::Start { question, anonymous } => {
                if self.flow.is_running(&channel) {
                    return Reply::say(messages::poll_already_running(&channel)).deliver(chat).await;
                }
                let args = PollArgs {
                    question,
                    channel: channel.clone(),
                    anonymous,
                };
                let step = self.flow.start(channel, args).await?;
                step.value().deliver(chat).await?;
                Ok(true)
            }
            Command::Vote { agree, channel: target } => {
                let input = PollInput::Vote {
                    user: message.sender.clone(),
                    agree,
                };
                self.forward(chat, target.unwrap_or(channel), input).await
            }
            Command::Status => self.forward(chat, channel, PollInput::Status).await,
            Command::End => self.forward(chat, channel, PollInput::End).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::RecordingChat;

    async fn say(plugin: &mut PollPlugin, chat: &RecordingChat, sender: &str, text: &str) -> bool {
        plugin
            .on_message(chat, &IncomingMessage::new(chat.room_id(), sender, text))
            .await
            .unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            parse("poll start lunch?"),
            Some(Command::Start { question: "lunch?".to_string(), anonymous: false })
        );
        assert_eq!(
            parse("POLL begin"),
            Some(Command::Start { question: String::new(), anonymous: false })
        );
        assert_eq!(
            parse("poll anonymously raise?"),
            Some(Command::Start { question: "raise?".to_string(), anonymous: true })
        );
        assert_eq!(parse("poll yeees"), Some(Command::Vote { agree: true, channel: None }));
        assert_eq!(
            parse("poll nope #random"),
            Some(Command::Vote { agree: false, channel: Some("#random".to_string()) })
        );
        assert_eq!(parse("poll status"), Some(Command::Status));
        assert_eq!(parse("poll close"), Some(Command::End));
        assert_eq!(parse("pollster start"), None);
        assert_eq!(parse("what is a poll"), None);
    }

    #[tokio::test]
    async fn test_poll_lifecycle() {
        let mut plugin = PollPlugin::new();
        let chat = RecordingChat::new("#general");

        assert!(say(&mut plugin, &chat, "alice", "poll start lunch?").await);
        assert_eq!(chat.last(), Some(messages::poll_started("lunch?")));

        assert!(say(&mut plugin, &chat, "alice", "poll y").await);
        assert!(say(&mut plugin, &chat, "bob", "poll y").await);
        assert!(say(&mut plugin, &chat, "bob", "poll n").await);
        assert_eq!(chat.sent().len(), 1);

        assert!(say(&mut plugin, &chat, "carol", "poll status").await);
        let votes = BTreeMap::from([("alice".to_string(), true), ("bob".to_string(), false)]);
        assert_eq!(chat.last(), Some(messages::poll_tally("POLL STATUS", "lunch?", &votes, false)));

        assert!(say(&mut plugin, &chat, "carol", "poll end").await);
        assert_eq!(chat.last(), Some(messages::poll_tally("POLL RESULT", "lunch?", &votes, false)));

        assert!(say(&mut plugin, &chat, "alice", "poll status").await);
        assert_eq!(chat.last(), Some(messages::no_poll_running("#general")));
    }

    #[tokio::test]
    async fn test_second_start_is_refused() {
        let mut plugin = PollPlugin::new();
        let chat = RecordingChat::new("#general");

        say(&mut plugin, &chat, "alice", "poll start first").await;
        say(&mut plugin, &chat, "alice", "poll y").await;
        assert!(say(&mut plugin, &chat, "bob", "poll start second").await);
        assert_eq!(chat.last(), Some(messages::poll_already_running("#general")));

        say(&mut plugin, &chat, "bob", "poll end").await;
        let votes = BTreeMap::from([("alice".to_string(), true)]);
        assert_eq!(chat.last(), Some(messages::poll_tally("POLL RESULT", "first", &votes, false)));
    }

    #[tokio::test]
    async fn test_rooms_are_independent_and_votes_can_target_a_room() {
        let mut plugin = PollPlugin::new();
        let general = RecordingChat::new("#general");
        let random = RecordingChat::new("#random");

        say(&mut plugin, &general, "alice", "poll start tea?").await;
        assert!(say(&mut plugin, &random, "bob", "poll status").await);
        assert_eq!(random.last(), Some(messages::no_poll_running("#random")));

        assert!(say(&mut plugin, &random, "bob", "poll nah #general").await);
        say(&mut plugin, &general, "alice", "poll status").await;
        let votes = BTreeMap::from([("bob".to_string(), false)]);
        assert_eq!(general.last(), Some(messages::poll_tally("POLL STATUS", "tea?", &votes, false)));
    }

    #[tokio::test]
    async fn test_unrelated_messages_pass_through() {
        let mut plugin = PollPlugin::new();
        let chat = RecordingChat::new("#general");

        assert!(!say(&mut plugin, &chat, "alice", "hello").await);
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_poll_hides_voters() {
        let mut plugin = PollPlugin::new();
        let general = RecordingChat::new("#general");
        let direct = RecordingChat::new("!dm-alice");

        assert!(say(&mut plugin, &general, "alice", "poll secret raise?").await);
        assert_eq!(general.last(), Some(messages::anonymous_poll_started("raise?", "#general")));

        assert!(say(&mut plugin, &direct, "alice", "poll y #general").await);
        assert!(say(&mut plugin, &general, "bob", "poll n").await);
        assert!(direct.sent().is_empty());

        assert!(say(&mut plugin, &general, "carol", "poll end").await);
        let votes = BTreeMap::from([("alice".to_string(), true), ("bob".to_string(), false)]);
        let result = general.last().unwrap();
        assert_eq!(result, messages::poll_tally("ANONYMOUS POLL RESULT", "raise?", &votes, true));
        assert!(!result.contains("alice"));
    }
}
