use crate::{
    config::{LanguageConfig, LexerConfig},
    error::GrammarError,
    grammar::Grammar,
    syntax::{self, Analysis},
    table::Tables,
};

/// A lexer configuration together with its seeded tables and compiled grammar.
#[derive(Clone, Debug)]
pub struct Language {
    lexer: LexerConfig,
    tables: Tables,
    grammar: Grammar,
}

impl Language {
    pub fn new(config: LanguageConfig) -> Result<Language, GrammarError> {
        let tables = Tables::from_config(&config.lexer);
        let grammar = Grammar::compile(&config.grammar, &tables)?;
        Ok(Language {
            lexer: config.lexer,
            tables,
            grammar,
        })
    }

    pub fn lexer(&self) -> &LexerConfig {
        &self.lexer
    }
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
    /// Tables holding only the reserved words and separators.
    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Analyzes one source text. Identifiers and numbers are registered in a
    /// fresh copy of the tables, which is returned alongside the analysis.
    pub fn analyze(&self, source: &str) -> (Analysis, Tables) {
        let mut tables = self.tables.clone();
        let analysis = syntax::analyze(source, &self.lexer, &self.grammar, &mut tables);
        (analysis, tables)
    }
}
