//! Property-based tests for the lexer and the parser.

use lexgram::{
    comment::strip_comments, CommentRule, Grammar, GrammarConfig, LexerConfig, NodeKind,
    RewriteRule, RuleSpec, SymbolTable, Tables,
};
use proptest::prelude::*;

fn c_comments() -> Vec<CommentRule> {
    vec![
        CommentRule::new("/*", "*/"),
        CommentRule::new("//", "\n"),
        CommentRule::new("{", "}"),
    ]
}

fn lexer_config(rewrites: Vec<RewriteRule>) -> LexerConfig {
    LexerConfig {
        reserved_words: ["if", "then", "else"].map(String::from).to_vec(),
        separators: [";", "<", "=", "(", ")"].map(String::from).to_vec(),
        comments: c_comments(),
        rewrites,
    }
}

fn numeral_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,9}",
        "[0-9]{1,5}\\.[0-9]{0,4}",
        "[0-9]{1,3}[eE][+-]?[0-9]{1,2}",
        "[0-9]{1,3}\\.[0-9]{1,3}[eE][+-]?[0-9]{1,2}",
    ]
}

fn token_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["if", "then", "else", "x", "y", ";", "<", "=", "(", ")"])
}

proptest! {
    #[test]
    fn stripping_without_markers_is_identity(source in "[a-z0-9 ;=\n\t]{0,60}") {
        prop_assert_eq!(strip_comments(&source, &c_comments()).unwrap(), source);
    }

    #[test]
    fn stripping_preserves_layout(
        before in "[a-z ]{0,10}",
        inside in "[a-z ;\n]{0,20}",
        after in "[a-z ]{0,10}",
    ) {
        let source = format!("{before}/*{inside}*/{after}");
        let stripped = strip_comments(&source, &c_comments()).unwrap();
        prop_assert_eq!(stripped.len(), source.len());
        prop_assert_eq!(stripped.lines().count(), source.lines().count());
        prop_assert!(stripped.ends_with(&after));
    }

    #[test]
    fn numerals_keep_their_columns(numerals in prop::collection::vec(numeral_strategy(), 1..8)) {
        let source = numerals.join(" ");
        let config = lexer_config(Vec::new());
        let mut tables = Tables::from_config(&config);
        let lexemes = lexgram::tokenize(&source, &config, &mut tables).unwrap();

        prop_assert_eq!(lexemes.len(), numerals.len());
        let mut column = 1;
        for (lexeme, numeral) in lexemes.iter().zip(&numerals) {
            let len = numeral.chars().count() as u32;
            prop_assert!(lexeme.category.is_number());
            prop_assert_eq!(&lexeme.text, numeral);
            prop_assert_eq!(lexeme.begin_column, column);
            prop_assert_eq!(lexeme.end_column, column + len - 1);
            column += len + 1;
        }
    }

    #[test]
    fn identity_rewrite_changes_nothing(
        tokens in prop::collection::vec(token_strategy(), 0..20),
        pattern in prop::collection::vec(token_strategy(), 1..3),
    ) {
        let source = tokens.join(" ");
        let pattern = pattern.join(" ");

        let plain = lexer_config(Vec::new());
        let identity = lexer_config(vec![RewriteRule::new(pattern.clone(), pattern)]);
        let a = lexgram::tokenize(&source, &plain, &mut Tables::from_config(&plain)).unwrap();
        let b = lexgram::tokenize(&source, &identity, &mut Tables::from_config(&identity)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn registering_twice_is_stable(atoms in prop::collection::vec("[a-c]{1,3}", 0..30)) {
        let mut table = SymbolTable::new();
        let first: Vec<_> = atoms.iter().map(|a| table.register(a.clone())).collect();
        let len = table.len();
        let second: Vec<_> = atoms.iter().map(|a| table.register(a.clone())).collect();

        prop_assert_eq!(first, second);
        prop_assert_eq!(table.len(), len);
        let distinct: std::collections::HashSet<_> = atoms.iter().collect();
        prop_assert_eq!(len, distinct.len());
    }

    #[test]
    fn first_matching_variant_wins(
        variants in prop::collection::vec(
            prop::collection::vec(prop::sample::select(vec!["a", "b", "c"]), 1..4),
            1..5,
        ),
        pick in any::<prop::sample::Index>(),
    ) {
        let input = &variants[pick.index(variants.len())];
        let can_be: Vec<String> = variants.iter().map(|v| v.join(" ")).collect();

        let config = LexerConfig {
            reserved_words: ["a", "b", "c"].map(String::from).to_vec(),
            ..Default::default()
        };
        let tables = Tables::from_config(&config);
        let grammar = Grammar::compile(
            &GrammarConfig {
                main_rule: "Main".into(),
                rules: vec![RuleSpec::new("Main", can_be.join(" | "))],
            },
            &tables,
        )
        .unwrap();

        let analysis = lexgram::analyze(&input.join(" "), &config, &grammar, &mut tables.clone());
        let root = &analysis.tree.root;

        // without repetitions a variant matches exactly when it is a prefix of the input
        let winner = variants.iter().position(|v| input.starts_with(v)).unwrap();
        prop_assert_eq!(root.kind, NodeKind::Success);
        let chosen = root.children.last().unwrap();
        prop_assert_eq!(&chosen.description, &format!("Main ::= {}", can_be[winner]));
        prop_assert_eq!(
            analysis.tree.ignored.is_some(),
            variants[winner].len() < input.len()
        );
    }

    #[test]
    fn analysis_is_deterministic(tokens in prop::collection::vec(token_strategy(), 0..12)) {
        let config = lexer_config(vec![RewriteRule::new("< =", "<")]);
        let tables = Tables::from_config(&config);
        let grammar = Grammar::compile(
            &GrammarConfig {
                main_rule: "Stmt".into(),
                rules: vec![
                    RuleSpec::new("Stmt", "if {Cond} then {Stmt} [ else {Stmt} ] | {Identifier} ;"),
                    RuleSpec::new("Cond", "{Identifier} < {Identifier} | ( {Cond} )"),
                ],
            },
            &tables,
        )
        .unwrap();

        let source = tokens.join(" ");
        let a = lexgram::analyze(&source, &config, &grammar, &mut tables.clone());
        let b = lexgram::analyze(&source, &config, &grammar, &mut tables.clone());
        prop_assert_eq!(a.tree, b.tree);
        prop_assert_eq!(a.lexemes, b.lexemes);
    }
}
