//! In-memory configuration handed to the lexer and the grammar compiler.
//!
//! Every type derives serde traits so that a collaborator can load a
//! language description from whatever format it likes.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRule {
    pub begin: String,
    pub end: String,
}

impl CommentRule {
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> CommentRule {
        CommentRule {
            begin: begin.into(),
            end: end.into(),
        }
    }
}

/// Token rewrite applied after lexing. Both sides are whitespace separated
/// lists of token texts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub if_found: String,
    pub replace_by: String,
}

impl RewriteRule {
    pub fn new(if_found: impl Into<String>, replace_by: impl Into<String>) -> RewriteRule {
        RewriteRule {
            if_found: if_found.into(),
            replace_by: replace_by.into(),
        }
    }
    pub fn pattern(&self) -> impl Iterator<Item = &str> + '_ {
        self.if_found.split_whitespace()
    }
    pub fn replacement(&self) -> impl Iterator<Item = &str> + '_ {
        self.replace_by.split_whitespace()
    }
    pub fn is_identity(&self) -> bool {
        self.pattern().eq(self.replacement())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerConfig {
    pub reserved_words: Vec<String>,
    pub separators: Vec<String>,
    pub comments: Vec<CommentRule>,
    pub rewrites: Vec<RewriteRule>,
}

/// One nonterminal and its right-hand side, e.g. `"a" {Expr} | [ "," ]`
/// written without the quotes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub non_terminal: String,
    pub can_be: String,
}

impl RuleSpec {
    pub fn new(non_terminal: impl Into<String>, can_be: impl Into<String>) -> RuleSpec {
        RuleSpec {
            non_terminal: non_terminal.into(),
            can_be: can_be.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarConfig {
    pub main_rule: String,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageConfig {
    #[serde(default)]
    pub lexer: LexerConfig,
    pub grammar: GrammarConfig,
}
