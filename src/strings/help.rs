//! # Help Text
//!
//! Displayed to the user via `botty help`.

pub const MAIN: &str = concat!(
    "**🤖 Botty Help**\n",
    "* `botty help`: this text\n",
    "* `.new`: start the project wizard (`.ok` to finish a step, `.cancel` to abort)\n",
    "* `poll start QUESTION`: start a poll in this room\n",
    "* `poll secret QUESTION`: start an anonymous poll, votes are never listed\n",
    "* `poll y` / `poll n` [#room]: vote, optionally in another room's poll\n",
    "* `poll status`: current tally\n",
    "* `poll end`: close the poll and show the result\n",
    "* `botty remind me in N seconds: TEXT`: one-off reminder (`minutes`, `hours`, `days` work too)\n",
    "* `botty remind #room every N minutes: TEXT`: recurring reminder in another room\n",
    "* `botty unremind TEXT`: drop reminders for TEXT\n",
    "* `thanks botty`, just because you should\n",
);
