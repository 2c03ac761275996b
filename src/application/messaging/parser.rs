//! Command parser - Parses raw message bodies into typed commands

use crate::domain::entities::{CommandKind, ParsedCommand};

/// Parses inbound message bodies into `ParsedCommand`s.
///
/// Grammar: `VERB arg1 arg2 ...`, split on whitespace. Only the verb is
/// uppercased; arguments keep their case because paths are case-sensitive.
/// There is no quoting, so arguments cannot contain spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandParser;

impl CommandParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw body. Never fails; unrecognized verbs yield `CommandKind::Unknown`.
    pub fn parse(&self, raw: &str) -> ParsedCommand {
        let mut tokens = raw.split_whitespace();
        let verb = tokens.next().unwrap_or("").to_uppercase();
        let mut arguments: Vec<String> = tokens.map(str::to_string).collect();

        let kind = CommandKind::from_verb(&verb);

        // Short commands still parse; handlers reject the empty slots
        if arguments.len() < kind.arity() {
            arguments.resize(kind.arity(), String::new());
        }

        ParsedCommand::new(kind, verb, arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ParsedCommand {
        CommandParser::new().parse(raw)
    }

    #[test]
    fn test_parse_upload() {
        let cmd = parse("UPLOAD /Reports file.pdf");
        assert_eq!(cmd.kind, CommandKind::Upload);
        assert_eq!(cmd.arguments, vec!["/Reports", "file.pdf"]);
    }

    #[test]
    fn test_verb_is_uppercased_but_arguments_keep_case() {
        let cmd = parse("  list   /Documents/Q3  ");
        assert_eq!(cmd.kind, CommandKind::List);
        assert_eq!(cmd.verb, "LIST");
        assert_eq!(cmd.arguments, vec!["/Documents/Q3"]);

        let cmd = parse("Rename Draft.docx Final.DOCX");
        assert_eq!(cmd.kind, CommandKind::Rename);
        assert_eq!(cmd.arguments, vec!["Draft.docx", "Final.DOCX"]);
    }

    #[test]
    fn test_unknown_verb() {
        let cmd = parse("FOO bar");
        assert_eq!(cmd.kind, CommandKind::Unknown);
        assert_eq!(cmd.verb, "FOO");
        assert_eq!(cmd.arguments, vec!["bar"]);
    }

    #[test]
    fn test_empty_and_blank_bodies_are_unknown() {
        for raw in ["", "   ", "\n\t"] {
            let cmd = parse(raw);
            assert_eq!(cmd.kind, CommandKind::Unknown);
            assert_eq!(cmd.verb, "");
            assert!(cmd.arguments.is_empty());
        }
    }

    #[test]
    fn test_missing_arguments_are_padded() {
        let cmd = parse("MOVE /a.pdf");
        assert_eq!(cmd.kind, CommandKind::Move);
        assert_eq!(cmd.arguments, vec!["/a.pdf", ""]);

        let cmd = parse("delete");
        assert_eq!(cmd.kind, CommandKind::Delete);
        assert_eq!(cmd.arguments, vec![""]);
    }

    #[test]
    fn test_extra_arguments_are_kept() {
        let cmd = parse("LIST /Documents extra");
        assert_eq!(cmd.arguments, vec!["/Documents", "extra"]);
    }

    #[test]
    fn test_verb_must_be_whole_token() {
        assert_eq!(parse("LISTING /x").kind, CommandKind::Unknown);
        assert_eq!(parse("/LIST /x").kind, CommandKind::Unknown);
    }

    #[test]
    fn test_spaces_in_names_split_into_extra_arguments() {
        let cmd = parse("RENAME my file.txt other.txt");
        assert_eq!(cmd.arguments, vec!["my", "file.txt", "other.txt"]);
    }
}
