//! Recognizing command invocations in message text.
//!
//! A message is an invocation when it reads `<prefix><bot> <command> [args...]`,
//! for example `!parley say hello`. Anything else is ordinary chat and is
//! ignored without a reply.

use command_parser::Parser;
use log::debug;

/// A recognized command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Command name, first word after the bot name
    pub name: String,
    /// Remaining words
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Invocation {
            name: name.into(),
            args,
        }
    }

    /// Parses a message body.
    ///
    /// Returns `None` when the message is not a command, is addressed to
    /// another bot, or names no command.
    pub fn parse(parser: &Parser, bot_name: &str, body: &str) -> Option<Self> {
        // For an unknown reason the parser ignores the last word, so we add a dummy word at the end
        let body = body.to_string() + " dummy";

        // This is normal to fail if the message is not a command
        let command = parser.parse(&body).ok()?;

        // Ignore commands that are not for the bot
        if command.name != bot_name {
            return None;
        }

        debug!("parsing invocation: {:?}", command);

        let mut words = command.arguments.into_iter();
        let name = words.next()?;

        Some(Invocation::new(name, words.collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_parser() -> Parser {
        Parser::new('!', '-')
    }

    #[test]
    fn test_parse_command_without_args() {
        let parser = create_parser();
        let result = Invocation::parse(&parser, "parley", "!parley ping");
        assert_eq!(result, Some(Invocation::new("ping", vec![])));
    }

    #[test]
    fn test_parse_command_with_args() {
        let parser = create_parser();
        let result = Invocation::parse(&parser, "parley", "!parley say hello world");
        assert_eq!(
            result,
            Some(Invocation::new(
                "say",
                vec!["hello".to_owned(), "world".to_owned()]
            ))
        );
    }

    #[test]
    fn test_parse_unknown_command_is_still_an_invocation() {
        let parser = create_parser();
        let result = Invocation::parse(&parser, "parley", "!parley nope");
        assert_eq!(result.map(|i| i.name), Some("nope".to_owned()));
    }

    #[test]
    fn test_parse_bot_name_alone() {
        let parser = create_parser();
        assert_eq!(Invocation::parse(&parser, "parley", "!parley"), None);
    }

    #[test]
    fn test_parse_other_bot() {
        let parser = create_parser();
        assert_eq!(Invocation::parse(&parser, "parley", "!other_bot ping"), None);
    }

    #[test]
    fn test_parse_plain_chat() {
        let parser = create_parser();
        assert_eq!(
            Invocation::parse(&parser, "parley", "This is not a command"),
            None
        );
    }

    #[test]
    fn test_parse_custom_prefix() {
        let parser = Parser::new('?', '-');
        assert!(Invocation::parse(&parser, "herald", "?herald ping").is_some());
        assert!(Invocation::parse(&parser, "herald", "!herald ping").is_none());
    }
}
