use crate::{
    comment::strip_comments,
    config::LexerConfig,
    error::{LexError, LexErrorKind},
    rewrite,
    table::{Category, Real, SymbolId, Tables},
};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn start() -> Position {
        Position { line: 1, column: 1 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexeme {
    pub category: Category,
    pub symbol: SymbolId,
    pub text: String,
    pub line: u32,
    /// Inclusive, 1-based.
    pub begin_column: u32,
    /// Inclusive, 1-based.
    pub end_column: u32,
}

impl Lexeme {
    /// Builds a lexeme whose last character sits at `end`.
    fn ending_at(category: Category, symbol: SymbolId, text: String, end: Position) -> Lexeme {
        let len = text.chars().count() as u32;
        Lexeme {
            category,
            symbol,
            line: end.line,
            begin_column: (end.column + 1).saturating_sub(len),
            end_column: end.column,
            text,
        }
    }

    pub fn begin(&self) -> Position {
        Position {
            line: self.line,
            column: self.begin_column,
        }
    }

    pub fn end(&self) -> Position {
        Position {
            line: self.line,
            column: self.end_column,
        }
    }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    /// Position of the character under the cursor.
    at: Position,
    /// Position of the last consumed character; tokens are reported here
    /// rather than at the lookahead.
    anchor: Position,
}

impl Scanner {
    fn new(source: &str) -> Scanner {
        Scanner {
            chars: source.chars().collect(),
            pos: 0,
            at: Position::start(),
            anchor: Position::start(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.anchor = self.at;
        self.pos += 1;
        if c == '\n' {
            self.at.line += 1;
            self.at.column = 1;
        } else {
            self.at.column += 1;
        }
        Some(c)
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool, buf: &mut String) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            buf.push(c);
            self.bump();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError {
            kind,
            line: self.at.line,
            column: self.at.column,
        }
    }
}

/// Lexes `source` into lexemes, registering identifiers and numbers in `tables`.
///
/// `tables` must already hold the reserved words and separators.
pub fn tokenize(
    source: &str,
    config: &LexerConfig,
    tables: &mut Tables,
) -> Result<Vec<Lexeme>, LexError> {
    match tokenize_partial(source, config, tables) {
        (lexemes, None) => Ok(lexemes),
        (_, Some(err)) => Err(err),
    }
}

/// Like [`tokenize`], but also hands back whatever was lexed before an error.
pub fn tokenize_partial(
    source: &str,
    config: &LexerConfig,
    tables: &mut Tables,
) -> (Vec<Lexeme>, Option<LexError>) {
    let source = source.lines().collect::<Vec<_>>().join("\n");

    let source = match strip_comments(&source, &config.comments) {
        Ok(stripped) => stripped,
        Err(err) => return (Vec::new(), Some(err)),
    };

    let mut lexemes = Vec::new();
    if let Err(err) = scan(&source, tables, &mut lexemes) {
        log::debug!("Lexing stopped after {} lexemes: {err}", lexemes.len());
        return (lexemes, Some(err));
    }

    if let Err(err) = rewrite::apply(&mut lexemes, &config.rewrites, tables) {
        return (lexemes, Some(err));
    }

    log::debug!(
        "Lexed {} lexemes ({} identifiers, {} integers, {} reals)",
        lexemes.len(),
        tables.identifiers.len(),
        tables.integers.len(),
        tables.reals.len()
    );
    (lexemes, None)
}

fn scan(source: &str, tables: &mut Tables, out: &mut Vec<Lexeme>) -> Result<(), LexError> {
    let mut s = Scanner::new(source);

    loop {
        s.skip_whitespace();
        let Some(c) = s.peek() else {
            return Ok(());
        };

        if c.is_alphabetic() {
            let mut text = String::new();
            s.take_while(char::is_alphanumeric, &mut text);
            let lexeme = match tables.words.find(text.as_str()) {
                Some(id) => Lexeme::ending_at(Category::Words, id, text, s.anchor),
                None => {
                    let id = tables.identifiers.register(text.clone());
                    Lexeme::ending_at(Category::Identifiers, id, text, s.anchor)
                }
            };
            out.push(lexeme);
        } else if c.is_ascii_digit() {
            out.push(scan_number(&mut s, tables)?);
        } else {
            let text = c.to_string();
            let Some(id) = tables.separators.find(text.as_str()) else {
                return Err(s.error(LexErrorKind::UnknownCharacter(c)));
            };
            s.bump();
            out.push(Lexeme::ending_at(Category::Separators, id, text, s.anchor));
        }
    }
}

fn scan_number(s: &mut Scanner, tables: &mut Tables) -> Result<Lexeme, LexError> {
    let mut text = String::new();
    s.take_while(|c| c.is_ascii_digit(), &mut text);

    let lexeme = if matches!(s.peek(), Some('.' | 'e' | 'E')) {
        if s.peek() == Some('.') {
            text.push('.');
            s.bump();
            s.take_while(|c| c.is_ascii_digit(), &mut text);
        }
        if let Some(marker @ ('e' | 'E')) = s.peek() {
            text.push(marker);
            s.bump();
            if let Some(sign @ ('+' | '-')) = s.peek() {
                text.push(sign);
                s.bump();
            }
            s.take_while(|c| c.is_ascii_digit(), &mut text);
        }

        let Ok(value) = text.parse::<f64>() else {
            return Err(s.error(LexErrorKind::InvalidNumber(text)));
        };
        let id = tables.reals.register(Real(value));
        Lexeme::ending_at(Category::Reals, id, text, s.anchor)
    } else {
        let Ok(value) = text.parse::<i64>() else {
            return Err(s.error(LexErrorKind::InvalidNumber(text)));
        };
        let id = tables.integers.register(value);
        Lexeme::ending_at(Category::Integers, id, text, s.anchor)
    };

    // a numeral must be followed by whitespace, the end of input or a separator
    match s.peek() {
        None => {}
        Some(c) if c.is_whitespace() => {}
        Some(c) if tables.separators.find(c.to_string().as_str()).is_some() => {}
        Some(c) => return Err(s.error(LexErrorKind::UnknownCharacter(c))),
    }

    Ok(lexeme)
}
