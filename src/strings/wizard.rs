//! # Wizard Strings
//!
//! Prompts used by the interactive project wizard.

pub const NAME_PROMPT: &str =
    "### 🧙 New Project Wizard\n**Step 1: Project Name**\nPlease enter a name for your new project.";
pub const CANCELLED: &str = "❌ Wizard Cancelled";
pub const ALREADY_RUNNING: &str = "🧙 A wizard is already running here. Finish it or `.cancel` it first.";

pub fn description_prompt(name: &str) -> String {
    format!(
        "### 📝 Project Description\n**Step 2: Description** for `{name}`\n\
         Describe your project, one or more messages.\n `.ok` to confirm."
    )
}

pub fn summary(name: &str, description: &str) -> String {
    let description = if description.is_empty() {
        "(no description)"
    } else {
        description
    };
    format!("### ✅ Project ready\n**Name:** {name}\n**Description:**\n```\n{description}\n```")
}
