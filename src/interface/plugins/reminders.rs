//! # Reminders Plugin
//!
//! One-off and recurring reminders, delivered on step ticks.
//!
//! ```text
//! #general | Me: botty remind us in 10 seconds: pineapple
//! #general | Botty: Me's reminder for "pineapple" set at 2015-09-01 22:13:58 UTC
//! (10-20 seconds later)
//! #general | Botty: *REMINDER:* pineapple
//! #general | Me: botty remind #random every 5 minutes: green
//! #general | Me: botty unremind green
//! ```
//!
//! Reminders are checked at most once per check interval, so nothing fires
//! more often than that. `me`, `us` and `here` all mean the current room.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use crate::domain::traits::{ChatProvider, Plugin, Rooms};
use crate::domain::types::IncomingMessage;
use crate::interface::plugins::Reply;
use crate::strings::{logs, messages};

static SET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*\bbotty[\s,\.]+remind\s+(\S+)\s+(in|every)\s+(\d+)\s*(seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d)\s*:\s+(.+)",
    )
    .unwrap()
});
static UNSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*\bbotty[\s,\.]+(?:unremind|stop\s+reminding\s+(?:(?:us|me|them)\s+)?about|stop\s+reminders?\s+for)\s+(.+)",
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
struct Reminder {
    due: DateTime<Utc>,
    /// Set for recurring reminders.
    every: Option<TimeDelta>,
    channel: String,
    description: String,
}

fn parse_delta(amount: &str, unit: &str) -> Option<TimeDelta> {
    let amount: i64 = amount.parse().ok()?;
    let seconds = match unit.chars().next()?.to_ascii_lowercase() {
        's' => 1,
        'm' => 60,
        'h' => 3_600,
        'd' => 86_400,
        _ => return None,
    };
    TimeDelta::try_seconds(amount.checked_mul(seconds)?)
}

fn timestamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub struct RemindersPlugin {
    reminders: Vec<Reminder>,
    check_interval: Duration,
    last_check: Option<Instant>,
}

impl RemindersPlugin {
    pub fn new(check_interval: Duration) -> Self {
        Self {
            reminders: Vec::new(),
            check_interval,
            last_check: None,
        }
    }

    /// Delivers every reminder due at `now`. Recurring ones are rescheduled.
    async fn fire_due(&mut self, rooms: &Rooms, now: DateTime<Utc>) -> bool {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.reminders)
            .into_iter()
            .partition(|reminder| reminder.due <= now);
        self.reminders = waiting;
        let fired = !due.is_empty();

        for mut reminder in due {
            let next = reminder.every.and_then(|every| now.checked_add_signed(every));
            let text = match next {
                Some(next) => messages::recurring_reminder(&timestamp(next), &reminder.description),
                None => messages::reminder(&reminder.description),
            };

            match rooms.get(&reminder.channel) {
                Some(chat) => {
                    if let Err(e) = chat.send_notification(&text).await {
                        tracing::warn!("{}", logs::reminder_failed(&reminder.channel, &e));
                    }
                }
                None => tracing::warn!(
                    "{}",
                    logs::reminder_room_unknown(&reminder.channel, &reminder.description)
                ),
            }

            if let Some(next) = next {
                reminder.due = next;
                self.reminders.push(reminder);
            }
        }
        fired
    }
}

#[async_trait]
impl Plugin for RemindersPlugin {
    fn name(&self) -> &'static str {
        "reminders"
    }

    async fn on_step(&mut self, rooms: &Rooms) -> Result<bool> {
        if let Some(last) = self.last_check
            && last.elapsed() < self.check_interval
        {
            return Ok(false);
        }
        self.last_check = Some(Instant::now());
        Ok(self.fire_due(rooms, Utc::now()).await)
    }

    async fn on_message(&mut self, chat: &dyn ChatProvider, message: &IncomingMessage) -> Result<bool> {
        let text = message.text.as_str();

        if let Some(caps) = SET.captures(text) {
            let target = match &caps[1] {
                t if ["me", "us", "here"].iter().any(|alias| t.eq_ignore_ascii_case(alias)) => {
                    message.channel.clone()
                }
                t => t.to_string(),
            };
            let recurring = caps[2].eq_ignore_ascii_case("every");
            let description = caps[5].trim().to_string();

            let now = Utc::now();
            let Some((delta, due)) = parse_delta(&caps[3], &caps[4])
                .and_then(|delta| Some((delta, now.checked_add_signed(delta)?)))
            else {
                let when = &text[caps.get(2).map_or(0, |m| m.start())..caps.get(4).map_or(0, |m| m.end())];
                return Reply::say(messages::bad_reminder_time(when)).deliver(chat).await;
            };

            tracing::info!("{}", logs::reminder_set(&target, &description, &timestamp(due)));
            let confirmation = if recurring {
                messages::recurring_reminder_set(&message.sender, &description, &timestamp(due))
            } else {
                messages::reminder_set(&message.sender, &description, &timestamp(due))
            };
            self.reminders.push(Reminder {
                due,
                every: recurring.then_some(delta),
                channel: target,
                description,
            });
            return Reply::say(confirmation).deliver(chat).await;
        }

        if let Some(caps) = UNSET.captures(text) {
            let description = caps[1].trim();
            let before = self.reminders.len();
            self.reminders.retain(|reminder| reminder.description != description);
            let reply = if self.reminders.len() < before {
                messages::reminder_removed(description)
            } else {
                messages::no_reminders_for(description)
            };
            return Reply::say(reply).deliver(chat).await;
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::RecordingChat;
    use std::collections::HashMap;
    use std::sync::Arc;

    async fn say(plugin: &mut RemindersPlugin, chat: &RecordingChat, text: &str) -> bool {
        plugin
            .on_message(chat, &IncomingMessage::new(chat.room_id(), "Me", text))
            .await
            .unwrap()
    }

    fn rooms(chats: &[&Arc<RecordingChat>]) -> Rooms {
        let mut rooms: Rooms = HashMap::new();
        for chat in chats {
            rooms.insert(chat.room_id(), Arc::clone(*chat) as Arc<dyn ChatProvider>);
        }
        rooms
    }

    #[test]
    fn test_parse_delta() {
        assert_eq!(parse_delta("10", "seconds"), TimeDelta::try_seconds(10));
        assert_eq!(parse_delta("5", "MIN"), TimeDelta::try_seconds(300));
        assert_eq!(parse_delta("2", "h"), TimeDelta::try_seconds(7_200));
        assert_eq!(parse_delta("1", "days"), TimeDelta::try_seconds(86_400));
        assert_eq!(parse_delta("99999999999999999999", "s"), None);
        assert_eq!(parse_delta("9223372036854775807", "d"), None);
    }

    #[tokio::test]
    async fn test_one_off_reminder() {
        let mut plugin = RemindersPlugin::new(Duration::from_secs(10));
        let general = Arc::new(RecordingChat::new("#general"));
        let rooms = rooms(&[&general]);

        assert!(say(&mut plugin, &general, "botty remind us in 10 seconds: pineapple").await);
        assert!(general.last().unwrap().starts_with("Me's reminder for \"pineapple\" set at "));

        let now = Utc::now();
        assert!(!plugin.fire_due(&rooms, now).await);
        assert!(plugin.fire_due(&rooms, now + TimeDelta::seconds(11)).await);
        assert_eq!(general.last(), Some(messages::reminder("pineapple")));

        assert!(!plugin.fire_due(&rooms, now + TimeDelta::seconds(60)).await);
        assert_eq!(general.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_recurring_reminder_in_another_room() {
        let mut plugin = RemindersPlugin::new(Duration::from_secs(10));
        let general = Arc::new(RecordingChat::new("#general"));
        let random = Arc::new(RecordingChat::new("#random"));
        let rooms = rooms(&[&general, &random]);

        assert!(say(&mut plugin, &general, "botty, remind #random every 30 seconds: green").await);
        assert!(general.last().unwrap().starts_with("Me's recurring reminder for \"green\" set"));

        let now = Utc::now();
        assert!(plugin.fire_due(&rooms, now + TimeDelta::seconds(31)).await);
        assert!(plugin.fire_due(&rooms, now + TimeDelta::seconds(62)).await);
        let sent = random.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|text| text.starts_with("*REMINDER (NEXT REMINDER SET TO ")));
        assert!(sent[0].ends_with("):* green"));

        assert!(say(&mut plugin, &general, "botty stop reminding us about green").await);
        assert_eq!(general.last(), Some(messages::reminder_removed("green")));
        assert!(!plugin.fire_due(&rooms, now + TimeDelta::hours(1)).await);
        assert_eq!(random.sent().len(), 2);

        assert!(say(&mut plugin, &general, "botty unremind green").await);
        assert_eq!(general.last(), Some(messages::no_reminders_for("green")));
    }

    #[tokio::test]
    async fn test_unknown_room_does_not_stop_other_reminders() {
        let mut plugin = RemindersPlugin::new(Duration::from_secs(10));
        let general = Arc::new(RecordingChat::new("#general"));
        let rooms = rooms(&[&general]);

        say(&mut plugin, &general, "botty remind #nowhere in 1 second: lost").await;
        say(&mut plugin, &general, "botty remind me in 1 second: found").await;

        assert!(plugin.fire_due(&rooms, Utc::now() + TimeDelta::seconds(2)).await);
        assert_eq!(general.last(), Some(messages::reminder("found")));
        assert!(plugin.reminders.is_empty());
    }

    #[tokio::test]
    async fn test_step_checks_at_most_once_per_interval() {
        let mut plugin = RemindersPlugin::new(Duration::from_secs(3600));
        let general = Arc::new(RecordingChat::new("#general"));
        let rooms = rooms(&[&general]);

        say(&mut plugin, &general, "botty remind us in 0 seconds: first").await;
        assert!(plugin.on_step(&rooms).await.unwrap());
        assert_eq!(general.last(), Some(messages::reminder("first")));

        say(&mut plugin, &general, "botty remind us in 0 seconds: second").await;
        assert!(!plugin.on_step(&rooms).await.unwrap());
        assert_eq!(plugin.reminders.len(), 1);
    }

    #[tokio::test]
    async fn test_bad_times_and_unrelated_messages() {
        let mut plugin = RemindersPlugin::new(Duration::from_secs(10));
        let general = RecordingChat::new("#general");

        assert!(say(&mut plugin, &general, "botty remind me in 99999999999999999999 seconds: never").await);
        assert_eq!(
            general.last(),
            Some(messages::bad_reminder_time("in 99999999999999999999 seconds"))
        );
        assert!(plugin.reminders.is_empty());

        assert!(!say(&mut plugin, &general, "remind me to buy milk").await);
        assert!(!say(&mut plugin, &general, "botty remind me tomorrow: milk").await);
        assert_eq!(general.sent().len(), 1);
    }
}
