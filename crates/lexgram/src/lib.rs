//! A grammar-driven lexer and backtracking parser.
//!
//! A [`LanguageConfig`] names the reserved words, separators, comment
//! delimiters and token rewrites of a language together with a BNF-like
//! grammar. Source text is lexed into [`Lexeme`]s and matched against the
//! grammar, producing a [`ParseTree`] that records which variants matched,
//! which failed and why.
//!
//! Grammar rules are written as `|` separated variants. A variant is a
//! sequence of literal tokens, `{Rule}` references, the built-in classes
//! `{Number}` and `{Identifier}`, and `[ ... ]` groups repeated zero or more
//! times.

pub mod comment;
pub mod config;
pub mod error;
pub mod grammar;
pub mod language;
pub mod lexer;
pub mod rewrite;
pub mod syntax;
pub mod table;
pub mod tree;

pub use config::{CommentRule, GrammarConfig, LanguageConfig, LexerConfig, RewriteRule, RuleSpec};
pub use error::{GrammarError, LexError, LexErrorKind};
pub use grammar::{Grammar, RuleHandle};
pub use language::Language;
pub use lexer::{tokenize, Lexeme};
pub use syntax::{analyze, parse, Analysis};
pub use table::{Category, SymbolId, SymbolTable, Tables};
pub use tree::{LexemeSpan, Node, NodeKind, ParseTree, SourceRange};
