//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.

use std::collections::BTreeMap;

pub const THANKS_REPLY: &str = "np";

/// `*TITLE:* question`, or just `*TITLE*` for a poll without a question.
fn heading(title: &str, question: &str) -> String {
    if question.is_empty() {
        format!("*{title}*")
    } else {
        format!("*{title}:* {question}")
    }
}

pub fn poll_started(question: &str) -> String {
    format!(
        "{}\n\
         • Say `poll y` to agree\n\
         • Say `poll n` to disagree\n\
         • Say `poll status` to check results, `poll end` to close it",
        heading("POLL STARTED", question)
    )
}

pub fn anonymous_poll_started(question: &str, channel: &str) -> String {
    format!(
        "{}\n\
         • Message me `poll y {channel}` to secretly agree\n\
         • Message me `poll n {channel}` to secretly disagree\n\
         • Say `poll status` to check results, `poll end` to close it",
        heading("ANONYMOUS POLL STARTED", question)
    )
}

pub fn poll_already_running(channel: &str) -> String {
    format!("there's already a poll going on in {channel}, say `poll end` first")
}

pub fn no_poll_running(channel: &str) -> String {
    format!("there's no poll going on right now in {channel}")
}

/// Tally of `votes` (user -> agrees) as a short report with a 100-column bar.
/// Individual votes are listed unless `anonymous`.
pub fn poll_tally(title: &str, question: &str, votes: &BTreeMap<String, bool>, anonymous: bool) -> String {
    if votes.is_empty() {
        return format!("{}\nNobody voted :(", heading(title, question));
    }

    let total = votes.len();
    let agree = votes.values().filter(|v| **v).count();
    let disagree = total - agree;
    let agree_percent = (100.0 * agree as f64 / total as f64).round() as usize;
    let disagree_percent = 100 - agree_percent;

    let mut output = format!(
        "{}\n\
         of the {total} people who voted, {agree} people agree ({agree_percent}%), \
         and {disagree} disagree ({disagree_percent}%)\n\
         `|{}{}|`",
        heading(title, question),
        "#".repeat(agree_percent),
        "-".repeat(disagree_percent),
    );
    if anonymous {
        return output;
    }
    for (user, vote) in votes {
        output.push_str(&format!("\n> *{user}* votes {}", if *vote { "yes" } else { "no" }));
    }
    output
}

pub fn reminder_set(user: &str, description: &str, due: &str) -> String {
    format!("{user}'s reminder for \"{description}\" set at {due}")
}

pub fn recurring_reminder_set(user: &str, description: &str, next: &str) -> String {
    format!("{user}'s recurring reminder for \"{description}\" set, next reminder is at {next}")
}

pub fn reminder(description: &str) -> String {
    format!("*REMINDER:* {description}")
}

pub fn recurring_reminder(next: &str, description: &str) -> String {
    format!("*REMINDER (NEXT REMINDER SET TO {next}):* {description}")
}

pub fn reminder_removed(description: &str) -> String {
    format!("removed reminder for \"{description}\"")
}

pub fn no_reminders_for(description: &str) -> String {
    format!("there were already no reminders for \"{description}\"")
}

pub fn bad_reminder_time(when: &str) -> String {
    format!("what's \"{when}\" supposed to mean")
}
