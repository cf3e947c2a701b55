//! Task completion statistics command

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![CreateApplicationCommand::default()
        .name("stats")
        .description("See your task completion stats")
        .to_owned()]
}
