use std::fmt::Display;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedComment,
    UnknownCharacter(char),
    InvalidNumber(String),
    /// A rewrite replacement token is neither a reserved word nor a separator.
    Preprocessing(String),
}

impl Display for LexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErrorKind::UnterminatedComment => f.write_str("unterminated comment"),
            LexErrorKind::UnknownCharacter(c) => {
                write!(f, "unknown character `{}`", c.escape_debug())
            }
            LexErrorKind::InvalidNumber(text) => write!(f, "invalid number `{text}`"),
            LexErrorKind::Preprocessing(token) => write!(
                f,
                "preprocessing failed, `{token}` is neither a reserved word nor a separator"
            ),
        }
    }
}

/// Fatal tokenization error, positioned at the character where it was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: u32,
    pub column: u32,
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lexical error at line {}, column {}: {}",
            self.line, self.column, self.kind
        )
    }
}

impl std::error::Error for LexError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GrammarError {
    UnknownTerminal { rule: String, token: String },
    IncorrectRule { rule: String, reason: &'static str },
    DuplicateRule { rule: String },
    UnknownNonTerminal { rule: String, name: String },
    MainRuleNotFound { name: String },
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::UnknownTerminal { rule, token } => {
                write!(f, "unknown terminal: `{token}` (in rule `{rule}`)")
            }
            GrammarError::IncorrectRule { rule, reason } => {
                write!(f, "rule `{rule}` is incorrect: {reason}")
            }
            GrammarError::DuplicateRule { rule } => write!(f, "duplicate rule `{rule}`"),
            GrammarError::UnknownNonTerminal { rule, name } => {
                write!(f, "unknown nonterminal `{{{name}}}` (in rule `{rule}`)")
            }
            GrammarError::MainRuleNotFound { name } => {
                write!(f, "main rule not found: `{name}`")
            }
        }
    }
}

impl std::error::Error for GrammarError {}
