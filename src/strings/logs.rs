//! # Log Strings

pub const STARTING: &str = "Starting Botty...";
pub const DISPATCH_LOOP_START: &str = "Dispatch loop started";
pub const SHUTDOWN: &str = "Shutting down...";
pub const CONSOLE_MODE: &str = "No chat service configured (or --console given), starting console mode";
pub const CONSOLE_CLOSED: &str = "Console input closed";
pub const SYNC_LOOP_START: &str = "Starting sync loop...";

pub fn config_loaded(path: &str) -> String {
    format!("Loaded configuration from {path}")
}

pub fn plugin_registered(name: &str) -> String {
    format!("Registered plugin {name}")
}

pub fn message_handled(plugin: &str, text: &str) -> String {
    format!("Message handled by {plugin}: {text}")
}

pub fn message_failed(plugin: &str, err: &str, text: &str) -> String {
    format!("Message processing in {plugin} failed: {err}\n\nmessage contents:\n{text}")
}

pub fn step_failed(plugin: &str, err: &str) -> String {
    format!("Step processing in {plugin} failed: {err}")
}

pub fn logged_in(user: &str) -> String {
    format!("Logged in as {user}")
}

pub fn set_display_name_fail(err: &str) -> String {
    format!("Failed to set display name: {err}")
}

pub fn invite_received(room_id: &str) -> String {
    format!("💌 Received invite for room {room_id:?}")
}

pub fn join_invite_fail(err: &str) -> String {
    format!("Failed to join room after invite: {err}")
}

pub fn inbox_closed(room_id: &str) -> String {
    format!("Dispatcher gone, dropping message from {room_id}")
}

pub fn room_tracked(room_id: &str) -> String {
    format!("Tracking room {room_id}")
}

pub fn reminder_set(channel: &str, description: &str, due: &str) -> String {
    format!("Reminder for {description:?} in {channel} due at {due}")
}

pub fn reminder_room_unknown(channel: &str, description: &str) -> String {
    format!("No chat handle for {channel}, reminder {description:?} not delivered")
}

pub fn reminder_failed(channel: &str, err: &str) -> String {
    format!("Failed to deliver reminder to {channel}: {err}")
}
