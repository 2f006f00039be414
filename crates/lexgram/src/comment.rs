use std::ops::Range;

use crate::{
    config::CommentRule,
    error::{LexError, LexErrorKind},
};

/// Replaces every non-whitespace character inside a comment with a space.
///
/// Whitespace is kept, so the lines and columns of the remaining tokens are
/// the same as in `source`. Comments are located in the original text; a
/// begin delimiter inside an earlier comment never opens a new one.
pub fn strip_comments(source: &str, comments: &[CommentRule]) -> Result<String, LexError> {
    let mut blanked: Vec<Range<usize>> = Vec::new();
    let mut from = 0;

    while let Some((begin, rule)) = earliest_begin(source, from, comments) {
        // the end delimiter may start right after the first character of the begin delimiter
        let search = begin + source[begin..].chars().next().map_or(1, char::len_utf8);
        let Some(offset) = source[search..].find(rule.end.as_str()) else {
            let (line, column) = position_of(source, begin);
            return Err(LexError {
                kind: LexErrorKind::UnterminatedComment,
                line,
                column,
            });
        };

        let end = (search + offset + rule.end.len()).max(begin + rule.begin.len());
        blanked.push(begin..end);
        from = end;
    }

    if blanked.is_empty() {
        return Ok(source.to_owned());
    }

    let mut out = String::with_capacity(source.len());
    let mut ranges = blanked.iter().peekable();
    for (i, c) in source.char_indices() {
        while ranges.peek().is_some_and(|r| r.end <= i) {
            ranges.next();
        }
        let inside = ranges.peek().is_some_and(|r| r.start <= i);
        out.push(if inside && !c.is_whitespace() { ' ' } else { c });
    }
    Ok(out)
}

/// Leftmost begin delimiter at or after `from`; ties go to the rule declared first.
fn earliest_begin<'a>(
    source: &str,
    from: usize,
    comments: &'a [CommentRule],
) -> Option<(usize, &'a CommentRule)> {
    comments
        .iter()
        .filter(|rule| !rule.begin.is_empty())
        .filter_map(|rule| {
            let at = source[from..].find(rule.begin.as_str())?;
            Some((from + at, rule))
        })
        .min_by_key(|&(at, _)| at)
}

/// 1-based line and column of the character at byte offset `at`.
fn position_of(source: &str, at: usize) -> (u32, u32) {
    let before = &source[..at];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line as u32, column as u32)
}
