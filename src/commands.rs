use teloxide::utils::command::BotCommands;

#[derive(Debug, Clone, PartialEq, Eq, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "register as a student.")]
    Start,
    #[command(description = "start a 10 question arithmetic quiz.")]
    Quiz,
    #[command(description = "display help.")]
    Help,
}

pub fn help_text() -> String {
    format!(
        "📚 How to use this bot:\n{}\n\nAnswer each question with a number only (for example, 4). \
         When the quiz is over you will see your result and can start again with /quiz.\n\
         If something goes wrong, leave your teacher a message!",
        Command::descriptions()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert!(matches!(Command::parse("/start", "mathbot"), Ok(Command::Start)));
        assert!(matches!(Command::parse("/quiz", "mathbot"), Ok(Command::Quiz)));
        assert!(matches!(
            Command::parse("/help@mathbot", "mathbot"),
            Ok(Command::Help)
        ));
        assert!(Command::parse("/unknown", "mathbot").is_err());
        assert!(Command::parse("42", "mathbot").is_err());
    }

    #[test]
    fn help_lists_every_command() {
        let text = help_text();
        for command in ["/start", "/quiz", "/help"] {
            assert!(text.contains(command), "{command} missing from help");
        }
    }
}
