mod render;

use std::{io::Read, path::Path, str::FromStr};

use anyhow::{bail, Context};
use lexgram::{Language, LanguageConfig};
use render::TreeDump;

fn main() {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "WARN".to_owned());
    let level = log::LevelFilter::from_str(&level).unwrap_or(log::LevelFilter::Warn);

    // only fails when a logger is already installed
    _ = simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    );

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::exit(2);
        }
    }
}

/// Returns whether the whole source was accepted.
fn run() -> anyhow::Result<bool> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let (language, source) = match args.as_slice() {
        [language] => (language, None),
        [language, source] => (language, Some(source)),
        _ => bail!("usage: lexgram <language.json> [source]"),
    };

    let language = read_language(Path::new(language))?;
    let source = match source {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read source `{path}`"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read source from stdin")?;
            buf
        }
    };

    let (analysis, tables) = language.analyze(&source);
    log::debug!(
        "{} lexemes, {} identifiers, {} integers, {} reals",
        analysis.lexemes.len(),
        tables.identifiers.len(),
        tables.integers.len(),
        tables.reals.len()
    );

    print!("{}", TreeDump::new(&analysis));
    Ok(analysis.is_success())
}

fn read_language(path: &Path) -> anyhow::Result<Language> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read language `{}`", path.display()))?;
    parse_language(&json).with_context(|| format!("Invalid language `{}`", path.display()))
}

fn parse_language(json: &str) -> anyhow::Result<Language> {
    let config: LanguageConfig = serde_json::from_str(json)?;
    log::debug!(
        "Loaded {} words, {} separators, {} rules",
        config.lexer.reserved_words.len(),
        config.lexer.separators.len(),
        config.grammar.rules.len()
    );
    let language = Language::new(config)?;
    for (_, rule) in language.grammar().iter() {
        log::trace!("{rule}");
    }
    Ok(language)
}

#[cfg(test)]
mod tests {
    use lexgram::{GrammarError, RewriteRule};

    use super::*;

    const PASCAL: &str = include_str!("../demo/pascal.json");
    const SUM: &str = include_str!("../demo/sum.pas");

    #[test]
    fn demo_program_is_accepted() {
        let language = parse_language(PASCAL).unwrap();
        assert_eq!(language.grammar().len(), 8);
        assert_eq!(
            language.lexer().rewrites[0],
            RewriteRule::new(": =", ":=")
        );

        let (analysis, _) = language.analyze(SUM);
        assert!(analysis.is_success(), "{}", TreeDump::new(&analysis));
    }

    #[test]
    fn optional_sections_default() {
        let language = parse_language(
            r#"{ "grammar": { "main_rule": "Main", "rules": [
                { "non_terminal": "Main", "can_be": "{Identifier} [ {Identifier} ]" }
            ] } }"#,
        )
        .unwrap();
        let (analysis, _) = language.analyze("a b c");
        assert!(analysis.is_success());
    }

    #[test]
    fn config_round_trips() {
        let config: LanguageConfig = serde_json::from_str(PASCAL).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: LanguageConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn grammar_errors_keep_their_cause() {
        let err = parse_language(
            r#"{ "grammar": { "main_rule": "Main", "rules": [
                { "non_terminal": "Main", "can_be": "while" }
            ] } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GrammarError>(),
            Some(GrammarError::UnknownTerminal { .. })
        ));
    }

    #[test]
    fn malformed_json() {
        assert!(parse_language(r#"{ "grammar": 1 }"#).is_err());
        assert!(parse_language(r#"{ "lexer": {} }"#).is_err());
    }
}
