use std::fmt::Display;

use crate::lexer::Lexeme;

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum NodeKind {
    /// Not resolved, or a pass-through that carries no verdict of its own.
    #[default]
    Pending,
    Success,
    Failure,
}

/// Inclusive range of lexeme indices.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LexemeSpan {
    pub begin: usize,
    pub end: usize,
}

impl LexemeSpan {
    pub fn new(begin: usize, end: usize) -> LexemeSpan {
        debug_assert!(begin <= end);
        LexemeSpan { begin, end }
    }
    pub fn single(index: usize) -> LexemeSpan {
        LexemeSpan::new(index, index)
    }
    /// Span of the lexemes in `begin..end`, `None` when nothing was consumed.
    pub fn consumed(begin: usize, end: usize) -> Option<LexemeSpan> {
        (end > begin).then(|| LexemeSpan::new(begin, end - 1))
    }
    pub fn len(self) -> usize {
        self.end - self.begin + 1
    }
}

impl Display for LexemeSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.begin, self.end)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SourceRange {
    pub begin_line: u32,
    pub begin_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}..{}:{}",
            self.begin_line, self.begin_column, self.end_line, self.end_column
        )
    }
}

#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Node {
    pub description: String,
    pub kind: NodeKind,
    pub span: Option<LexemeSpan>,
    pub children: Vec<Node>,
    pub error: Option<String>,
}

impl Node {
    pub fn new(description: impl Into<String>) -> Node {
        Node {
            description: description.into(),
            ..Default::default()
        }
    }

    /// A node standing for the single lexeme at `index`.
    pub fn leaf(lexemes: &[Lexeme], index: usize) -> Node {
        Node {
            description: lexemes[index].text.clone(),
            span: Some(LexemeSpan::single(index)),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NodeKind::Success
    }
    pub fn is_failure(&self) -> bool {
        self.kind == NodeKind::Failure
    }

    /// Source coordinates covered by this node, from the first character of
    /// its first lexeme to the last character of its last lexeme.
    pub fn location(&self, lexemes: &[Lexeme]) -> Option<SourceRange> {
        let span = self.span?;
        let begin = lexemes.get(span.begin)?.begin();
        let end = lexemes.get(span.end)?.end();
        Some(SourceRange {
            begin_line: begin.line,
            begin_column: begin.column,
            end_line: end.line,
            end_column: end.column,
        })
    }

    /// The covered lexeme texts joined by spaces.
    pub fn text(&self, lexemes: &[Lexeme]) -> Option<String> {
        let span = self.span?;
        let covered = lexemes.get(span.begin..=span.end)?;
        let texts: Vec<&str> = covered.iter().map(|l| l.text.as_str()).collect();
        Some(texts.join(" "))
    }

    /// Visits this node and its descendants in preorder together with their depth.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node, usize)) {
        fn go<'a>(node: &'a Node, depth: usize, visit: &mut impl FnMut(&'a Node, usize)) {
            visit(node, depth);
            for child in &node.children {
                go(child, depth + 1, visit);
            }
        }
        go(self, 0, visit);
    }

    pub fn find(&self, description: &str) -> Option<&Node> {
        if self.description == description {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(description))
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParseTree {
    /// Node of the main rule. Carries the lexical error, if any.
    pub root: Node,
    /// Lexemes left over after the main rule, as an "Ignored text" failure.
    pub ignored: Option<Node>,
}

impl ParseTree {
    /// True when the main rule matched and every lexeme was consumed.
    pub fn is_success(&self) -> bool {
        self.root.is_success() && self.ignored.is_none()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        std::iter::once(&self.root).chain(&self.ignored)
    }
}
