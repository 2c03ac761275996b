use std::fmt;

/// Kind of a parsed command, selected by its verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    List,
    Delete,
    Move,
    Rename,
    Upload,
    Summary,
    Unknown,
}

impl CommandKind {
    /// Every kind that maps to a handler, in help-text order
    pub const KNOWN: [CommandKind; 6] = [
        CommandKind::List,
        CommandKind::Delete,
        CommandKind::Move,
        CommandKind::Rename,
        CommandKind::Upload,
        CommandKind::Summary,
    ];

    /// Look up a kind from an already-uppercased verb
    pub fn from_verb(verb: &str) -> Self {
        match verb {
            "LIST" => CommandKind::List,
            "DELETE" => CommandKind::Delete,
            "MOVE" => CommandKind::Move,
            "RENAME" => CommandKind::Rename,
            "UPLOAD" => CommandKind::Upload,
            "SUMMARY" => CommandKind::Summary,
            _ => CommandKind::Unknown,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            CommandKind::List => "LIST",
            CommandKind::Delete => "DELETE",
            CommandKind::Move => "MOVE",
            CommandKind::Rename => "RENAME",
            CommandKind::Upload => "UPLOAD",
            CommandKind::Summary => "SUMMARY",
            CommandKind::Unknown => "UNKNOWN",
        }
    }

    /// Minimum number of positional arguments
    pub fn arity(&self) -> usize {
        match self {
            CommandKind::List | CommandKind::Delete | CommandKind::Summary => 1,
            CommandKind::Move | CommandKind::Rename | CommandKind::Upload => 2,
            CommandKind::Unknown => 0,
        }
    }

    /// Usage line shown in help output
    pub fn usage(&self) -> &'static str {
        match self {
            CommandKind::List => "LIST <folder>",
            CommandKind::Delete => "DELETE <file>",
            CommandKind::Move => "MOVE <source> <destination>",
            CommandKind::Rename => "RENAME <old name> <new name>",
            CommandKind::Upload => "UPLOAD <folder> <filename>",
            CommandKind::Summary => "SUMMARY <folder>",
            CommandKind::Unknown => "",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, CommandKind::Unknown)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// A command parsed from an inbound message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    /// First token, uppercased. Empty when the body was blank.
    pub verb: String,
    pub arguments: Vec<String>,
}

impl ParsedCommand {
    pub fn new(kind: CommandKind, verb: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            kind,
            verb: verb.into(),
            arguments,
        }
    }

    /// Argument at `index`, or "" when absent
    pub fn arg(&self, index: usize) -> &str {
        self.arguments.get(index).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_verb_round_trips_known_kinds() {
        for kind in CommandKind::KNOWN {
            assert_eq!(CommandKind::from_verb(kind.verb()), kind);
        }
    }

    #[test]
    fn test_from_verb_is_case_sensitive() {
        // The parser uppercases before lookup
        assert_eq!(CommandKind::from_verb("list"), CommandKind::Unknown);
        assert_eq!(CommandKind::from_verb(""), CommandKind::Unknown);
    }

    #[test]
    fn test_arity_table() {
        assert_eq!(CommandKind::List.arity(), 1);
        assert_eq!(CommandKind::Delete.arity(), 1);
        assert_eq!(CommandKind::Move.arity(), 2);
        assert_eq!(CommandKind::Rename.arity(), 2);
        assert_eq!(CommandKind::Upload.arity(), 2);
        assert_eq!(CommandKind::Summary.arity(), 1);
        assert_eq!(CommandKind::Unknown.arity(), 0);
    }

    #[test]
    fn test_arg_out_of_range_is_empty() {
        let cmd = ParsedCommand::new(CommandKind::Move, "MOVE", vec!["/a.pdf".to_string()]);
        assert_eq!(cmd.arg(0), "/a.pdf");
        assert_eq!(cmd.arg(5), "");
    }
}
