use crate::{
    config::RewriteRule,
    error::{LexError, LexErrorKind},
    lexer::Lexeme,
    table::Tables,
};

/// Applies every rewrite rule, in order, to the whole lexeme stream.
pub fn apply(
    lexemes: &mut Vec<Lexeme>,
    rules: &[RewriteRule],
    tables: &Tables,
) -> Result<(), LexError> {
    for rule in rules {
        if rule.is_identity() {
            continue;
        }
        let pattern: Vec<&str> = rule.pattern().collect();
        let replacement: Vec<&str> = rule.replacement().collect();

        if pattern.is_empty() {
            log::warn!(
                "Skipping rewrite rule with an empty pattern (replace by `{}`)",
                rule.replace_by
            );
            continue;
        }

        let mut i = 0;
        let mut applied = 0;
        while i + pattern.len() <= lexemes.len() {
            let matches = lexemes[i..i + pattern.len()]
                .iter()
                .zip(&pattern)
                .all(|(lexeme, &text)| lexeme.text == text);

            if !matches {
                i += 1;
                continue;
            }

            replace_at(lexemes, i, &pattern, &replacement, tables)?;
            applied += 1;
            // resume after the inserted tokens, an empty replacement rescans the same index
            i += replacement.len();
        }

        if applied > 0 {
            log::trace!(
                "Rewrote `{}` -> `{}` {applied} times",
                rule.if_found.trim(),
                rule.replace_by.trim()
            );
        }
    }
    Ok(())
}

/// Replaces the match at `at` by splicing only the tokens that differ between
/// the pattern and the replacement.
fn replace_at(
    lexemes: &mut Vec<Lexeme>,
    at: usize,
    pattern: &[&str],
    replacement: &[&str],
    tables: &Tables,
) -> Result<(), LexError> {
    let shorter = pattern.len().min(replacement.len());
    let prefix = pattern
        .iter()
        .zip(replacement)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = pattern
        .iter()
        .rev()
        .zip(replacement.iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
        .min(shorter - prefix);

    let origin = (at + pattern.len() - suffix).saturating_sub(1).max(at);
    let (line, column) = (lexemes[origin].line, lexemes[origin].begin_column);

    let inserted = replacement[prefix..replacement.len() - suffix]
        .iter()
        .map(|&text| {
            let Some((category, symbol)) = tables.find_terminal(text) else {
                return Err(LexError {
                    kind: LexErrorKind::Preprocessing(text.to_owned()),
                    line,
                    column,
                });
            };
            Ok(Lexeme {
                category,
                symbol,
                text: text.to_owned(),
                line,
                begin_column: column,
                end_column: column,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    lexemes.splice(at + prefix..at + pattern.len() - suffix, inserted);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::LexerConfig, lexer::tokenize, table::Category};

    fn lex(src: &str, rewrites: &[RewriteRule]) -> Result<Vec<Lexeme>, LexError> {
        let config = LexerConfig {
            reserved_words: ["if", "then", "begin", "end"].map(String::from).to_vec(),
            separators: ["<", "=", "<=", ";", ":", ":="].map(String::from).to_vec(),
            rewrites: rewrites.to_vec(),
            ..Default::default()
        };
        let mut tables = Tables::from_config(&config);
        tokenize(src, &config, &mut tables)
    }

    fn texts(lexemes: &[Lexeme]) -> Vec<&str> {
        lexemes.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn identity_rule_changes_nothing() {
        let plain = lex("if a < = b", &[]).unwrap();
        let rewritten = lex("if a < = b", &[RewriteRule::new("< =", "< =")]).unwrap();
        assert_eq!(plain, rewritten);
    }

    #[test]
    fn joins_two_separators() {
        let lexemes = lex("a < = b; c<=d", &[RewriteRule::new("< =", "<=")]).unwrap();
        assert_eq!(texts(&lexemes), ["a", "<=", "b", ";", "c", "<=", "d"]);
        assert_eq!(lexemes[1].category, Category::Separators);
        // inserted lexemes take the position of the last replaced one
        assert_eq!((lexemes[1].line, lexemes[1].begin_column), (1, 5));
    }

    #[test]
    fn removes_middle_keeping_common_prefix() {
        let lexemes = lex("x if then y", &[RewriteRule::new("if then", "if")]).unwrap();
        assert_eq!(texts(&lexemes), ["x", "if", "y"]);
        assert_eq!((lexemes[1].line, lexemes[1].begin_column), (1, 3));
        assert_eq!(lexemes[1].end_column, 4);
    }

    #[test]
    fn non_contiguous_tokens_do_not_match() {
        let lexemes = lex("if x then y", &[RewriteRule::new("if then", "if")]).unwrap();
        assert_eq!(texts(&lexemes), ["if", "x", "then", "y"]);
    }

    #[test]
    fn adjacent_matches_in_one_pass() {
        let lexemes = lex(": = : =", &[RewriteRule::new(": =", ":=")]).unwrap();
        assert_eq!(texts(&lexemes), [":=", ":="]);
    }

    #[test]
    fn overlapping_prefix_and_suffix() {
        let lexemes = lex("end end end", &[RewriteRule::new("end end", "end")]).unwrap();
        // the first pair collapses, then scanning resumes after the survivor
        assert_eq!(texts(&lexemes), ["end", "end"]);
    }

    #[test]
    fn deletion_rescans_same_position() {
        let lexemes = lex("a ; ; b", &[RewriteRule::new(";", "")]).unwrap();
        assert_eq!(texts(&lexemes), ["a", "b"]);
    }

    #[test]
    fn rules_apply_in_order() {
        let rules = [RewriteRule::new(": =", ":="), RewriteRule::new(":=", "=")];
        let lexemes = lex("a : = b", &rules).unwrap();
        assert_eq!(texts(&lexemes), ["a", "=", "b"]);
    }

    #[test]
    fn unknown_replacement_token_fails() {
        let err = lex("a < = b", &[RewriteRule::new("< =", "le")]).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::Preprocessing("le".into()));
        assert_eq!((err.line, err.column), (1, 5));
    }

    #[test]
    fn identifiers_cannot_be_synthesized() {
        assert!(lex("begin", &[RewriteRule::new("begin", "start")]).is_err());
        let lexemes = lex("begin", &[RewriteRule::new("begin", "begin end")]).unwrap();
        assert_eq!(texts(&lexemes), ["begin", "end"]);
    }
}
