//! Reminder slash commands

use serenity::builder::CreateApplicationCommand;

/// Creates reminder management commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        command("createreminder", "Create a new reminder"),
        command("listreminders", "List your reminders"),
        command("editreminder", "Edit one of your reminders"),
        command("deletereminder", "Delete one of your reminders"),
    ]
}

// None of the reminder commands take options; input comes from modals and selects
fn command(name: &str, description: &str) -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name(name)
        .description(description)
        .to_owned()
}
