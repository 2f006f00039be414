use std::fmt::Display;

use lexgram::{Analysis, Lexeme, Node, NodeKind};

/// Indented plain-text dump of an analysis, one node per line:
/// `+` success, `!` failure, `-` pass-through, then the node's source range
/// and error message.
pub struct TreeDump<'a> {
    analysis: &'a Analysis,
}

impl<'a> TreeDump<'a> {
    pub fn new(analysis: &'a Analysis) -> TreeDump<'a> {
        TreeDump { analysis }
    }
}

impl Display for TreeDump<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lexemes = &self.analysis.lexemes;
        let mut result = Ok(());
        for top in self.analysis.tree.nodes() {
            top.walk(&mut |node, depth| {
                if result.is_ok() {
                    result = write_node(f, node, depth, lexemes);
                }
            });
        }
        result
    }
}

fn write_node(
    f: &mut std::fmt::Formatter<'_>,
    node: &Node,
    depth: usize,
    lexemes: &[Lexeme],
) -> std::fmt::Result {
    let marker = match node.kind {
        NodeKind::Pending => '-',
        NodeKind::Success => '+',
        NodeKind::Failure => '!',
    };
    write!(f, "{:indent$}{marker} {}", "", node.description, indent = depth * 2)?;
    if let Some(range) = node.location(lexemes) {
        write!(f, " @ {range}")?;
    }
    if let Some(error) = &node.error {
        write!(f, ": {error}")?;
    }
    writeln!(f)
}
