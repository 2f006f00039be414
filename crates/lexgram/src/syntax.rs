//! Backtracking recursive descent over a compiled [`Grammar`].
//!
//! Every rule tries its variants in declaration order and keeps the first
//! one that matches completely. A variant is built in its own [`Node`]; when
//! it fails the node is kept as a diagnostic and the cursor is reset, there
//! is no other state to roll back.

use crate::{
    config::LexerConfig,
    error::LexError,
    grammar::{Grammar, Item, RuleHandle},
    lexer::{tokenize_partial, Lexeme},
    table::Tables,
    tree::{LexemeSpan, Node, NodeKind, ParseTree},
};

pub const IGNORED_TEXT: &str = "Ignored text";

/// A recoverable failure to match, with the lexeme index where matching stopped.
#[derive(Clone, PartialEq, Eq, Debug)]
struct Mismatch {
    message: String,
    reached: usize,
}

/// A rule that failed in every variant; `node` holds the failed attempts.
struct Rejected {
    node: Node,
    mismatch: Mismatch,
}

struct Analyzer<'a> {
    lexemes: &'a [Lexeme],
    grammar: &'a Grammar,
    tables: &'a Tables,
    cursor: usize,
}

impl<'a> Analyzer<'a> {
    fn current(&self) -> Option<&'a Lexeme> {
        self.lexemes.get(self.cursor)
    }

    fn found(&self) -> &'a str {
        self.current().map_or("EOF", |l| l.text.as_str())
    }

    fn expected(&self, item: &Item) -> String {
        match item {
            Item::Terminal(text) => text.clone(),
            Item::Class(class) => class.name().to_owned(),
            Item::Rule(handle) => handle.name(self.grammar).to_owned(),
            Item::Repetition(items) => items
                .first()
                .map_or_else(String::new, |item| self.expected(item)),
        }
    }

    fn mismatch(&self, item: &Item) -> Mismatch {
        Mismatch {
            message: format!("{} expected but {} found", self.expected(item), self.found()),
            reached: self.cursor,
        }
    }

    /// Cheap check of the first item against the current lexeme. Rule
    /// references always pass, and so does everything at the end of input so
    /// that the variant can report what it expected.
    fn admits(&self, first: Option<&Item>) -> bool {
        let Some(lexeme) = self.current() else {
            return true;
        };
        match first {
            Some(Item::Terminal(text)) => self.tables.text(lexeme) == Some(text.as_str()),
            Some(Item::Class(class)) => class.matches(lexeme.category),
            _ => true,
        }
    }

    /// Span of a failed attempt, from `begin` up to the lexeme that stopped it.
    fn failure_span(&self, begin: usize, reached: usize) -> Option<LexemeSpan> {
        let last = self.lexemes.len().checked_sub(1)?;
        let end = reached.min(last);
        (begin <= end).then(|| LexemeSpan::new(begin, end))
    }

    fn inspect(&mut self, handle: RuleHandle) -> Result<Node, Rejected> {
        let grammar = self.grammar;
        let rule = &grammar[handle];
        let begin = self.cursor;

        let mut node = Node::new(rule.name.as_str());
        let mut reached = begin;
        let mut last_message = None;

        for variant in &rule.variants {
            self.cursor = begin;
            if !self.admits(variant.first()) {
                continue;
            }
            log::trace!("Trying `{} ::= {variant}` at lexeme {begin}", rule.name);

            let mut attempt = Node::new(format!("{} ::= {variant}", rule.name));
            match self.sequence(&variant.items, &mut attempt) {
                Ok(()) => {
                    if !variant.is_bare_terminal() {
                        attempt.kind = NodeKind::Success;
                    }
                    attempt.span = LexemeSpan::consumed(begin, self.cursor);
                    node.kind = NodeKind::Success;
                    node.span = attempt.span;
                    node.children.clear();
                    node.children.push(attempt);
                    return Ok(node);
                }
                Err(mismatch) => {
                    attempt.kind = NodeKind::Failure;
                    attempt.span = self.failure_span(begin, mismatch.reached);
                    attempt.error = Some(mismatch.message.clone());
                    node.children.push(attempt);
                    reached = reached.max(mismatch.reached);
                    last_message = Some(mismatch.message);
                }
            }
        }

        self.cursor = begin;
        let message = last_message
            .unwrap_or_else(|| format!("{} expected but {} found", rule.name, self.found()));
        node.kind = NodeKind::Failure;
        node.span = self.failure_span(begin, reached);
        node.error = Some(message.clone());
        Err(Rejected {
            node,
            mismatch: Mismatch { message, reached },
        })
    }

    fn sequence(&mut self, items: &[Item], node: &mut Node) -> Result<(), Mismatch> {
        for item in items {
            match item {
                Item::Repetition(inner) => self.repeat(inner, node)?,
                _ if self.current().is_none() => return Err(self.mismatch(item)),
                _ => self.single(item, node)?,
            }
        }
        Ok(())
    }

    fn single(&mut self, item: &Item, node: &mut Node) -> Result<(), Mismatch> {
        let matched = match (item, self.current()) {
            (Item::Rule(handle), _) => {
                return match self.inspect(*handle) {
                    Ok(child) => {
                        node.children.push(child);
                        Ok(())
                    }
                    Err(Rejected { node: child, mismatch }) => {
                        node.children.push(child);
                        Err(mismatch)
                    }
                };
            }
            (Item::Terminal(text), Some(lexeme)) => {
                self.tables.text(lexeme) == Some(text.as_str())
            }
            (Item::Class(class), Some(lexeme)) => class.matches(lexeme.category),
            _ => false,
        };

        if !matched {
            return Err(self.mismatch(item));
        }
        node.children.push(Node::leaf(self.lexemes, self.cursor));
        self.cursor += 1;
        Ok(())
    }

    /// Matches `items` greedily zero or more times. An iteration that got past
    /// its first lexeme is committed and its failure is the caller's failure.
    fn repeat(&mut self, items: &[Item], node: &mut Node) -> Result<(), Mismatch> {
        let first = items.first().and_then(Item::first);
        while self.current().is_some() && self.admits(first) {
            let start = self.cursor;
            let mark = node.children.len();
            match self.sequence(items, node) {
                Ok(()) if self.cursor == start => break,
                Ok(()) => {}
                // a nested rule that could not even start ends the repetition
                Err(mismatch) if mismatch.reached == start => {
                    node.children.truncate(mark);
                    self.cursor = start;
                    break;
                }
                Err(mismatch) => return Err(mismatch),
            }
        }
        Ok(())
    }
}

/// Matches the grammar's main rule against `lexemes`. Never fails; mismatches
/// are recorded in the returned tree.
pub fn parse(lexemes: &[Lexeme], grammar: &Grammar, tables: &Tables) -> ParseTree {
    let mut analyzer = Analyzer {
        lexemes,
        grammar,
        tables,
        cursor: 0,
    };

    let root = match analyzer.inspect(grammar.main()) {
        Ok(node) => node,
        Err(Rejected { node, .. }) => node,
    };

    let unconsumed = root.span.map_or(0, |span| span.end + 1);
    let ignored = (unconsumed < lexemes.len()).then(|| Node {
        description: IGNORED_TEXT.to_owned(),
        kind: NodeKind::Failure,
        span: Some(LexemeSpan::new(unconsumed, lexemes.len() - 1)),
        children: Vec::new(),
        error: Some(format!("EOF expected but {} found", lexemes[unconsumed].text)),
    });

    log::debug!(
        "Parsed {} lexemes: main rule {:?}, {} ignored",
        lexemes.len(),
        root.kind,
        lexemes.len() - unconsumed.min(lexemes.len())
    );
    ParseTree { root, ignored }
}

/// Result of running the lexer and the parser over one source text.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub lexemes: Vec<Lexeme>,
    pub tree: ParseTree,
    pub lex_error: Option<LexError>,
}

impl Analysis {
    pub fn is_success(&self) -> bool {
        self.lex_error.is_none() && self.tree.is_success()
    }
}

/// Tokenizes and parses `source`. A lexical error does not abort the
/// analysis: whatever was lexed before it is parsed and the error is attached
/// to the root.
pub fn analyze(
    source: &str,
    config: &LexerConfig,
    grammar: &Grammar,
    tables: &mut Tables,
) -> Analysis {
    let (lexemes, lex_error) = tokenize_partial(source, config, tables);
    let mut tree = parse(&lexemes, grammar, tables);
    if let Some(err) = &lex_error {
        tree.root.kind = NodeKind::Failure;
        tree.root.error = Some(err.to_string());
    }
    Analysis {
        lexemes,
        tree,
        lex_error,
    }
}
