use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::Display,
    hash::{Hash, Hasher},
};

use cranelift_entity::{entity_impl, PrimaryMap};

use crate::{config::LexerConfig, lexer::Lexeme};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SymbolId(u32);

entity_impl! { SymbolId }

/// The table a lexeme was classified into.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    Words,
    Separators,
    Identifiers,
    Integers,
    Reals,
}

impl Category {
    pub fn is_number(self) -> bool {
        matches!(self, Category::Integers | Category::Reals)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Words => "word",
            Category::Separators => "separator",
            Category::Identifiers => "identifier",
            Category::Integers => "integer",
            Category::Reals => "real",
        };
        f.write_str(name)
    }
}

/// Real literal compared by bit pattern, so that it can key a [`SymbolTable`].
#[derive(Clone, Copy, Debug)]
pub struct Real(pub f64);

impl PartialEq for Real {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Real {}

impl Hash for Real {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Display for Real {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Append-only registry of unique atoms.
///
/// Registering an atom that is already present returns its existing index,
/// so indices are stable for the lifetime of the table.
#[derive(Clone, Debug)]
pub struct SymbolTable<T> {
    atoms: PrimaryMap<SymbolId, T>,
    lookup: HashMap<T, SymbolId>,
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        Self {
            atoms: PrimaryMap::new(),
            lookup: HashMap::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> SymbolTable<T> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn register(&mut self, atom: T) -> SymbolId {
        if let Some(&id) = self.lookup.get(&atom) {
            return id;
        }
        let id = self.atoms.push(atom.clone());
        self.lookup.insert(atom, id);
        id
    }
    pub fn find<Q>(&self, atom: &Q) -> Option<SymbolId>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup.get(atom).copied()
    }
    pub fn get(&self, id: SymbolId) -> Option<&T> {
        self.atoms.get(id)
    }
    pub fn len(&self) -> usize {
        self.atoms.len()
    }
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
    pub fn iter(&self) -> cranelift_entity::Iter<'_, SymbolId, T> {
        self.atoms.iter()
    }
}

impl<T: Clone + Eq + Hash> FromIterator<T> for SymbolTable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut table = SymbolTable::new();
        for atom in iter {
            table.register(atom);
        }
        table
    }
}

/// The five tables a lexer run reads from and registers into.
///
/// `words` and `separators` are seeded from configuration and never grow,
/// the remaining tables are filled while lexing.
#[derive(Clone, Debug, Default)]
pub struct Tables {
    pub words: SymbolTable<String>,
    pub separators: SymbolTable<String>,
    pub identifiers: SymbolTable<String>,
    pub integers: SymbolTable<i64>,
    pub reals: SymbolTable<Real>,
}

impl Tables {
    pub fn seeded<W, S>(words: W, separators: S) -> Tables
    where
        W: IntoIterator,
        W::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Tables {
            words: words.into_iter().map(Into::into).collect(),
            separators: separators.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn from_config(config: &LexerConfig) -> Tables {
        Tables::seeded(
            config.reserved_words.iter().cloned(),
            config.separators.iter().cloned(),
        )
    }

    /// Resolves a lexeme to the text its table entry holds. Numeric tables
    /// have no text and yield `None`.
    pub fn text(&self, lexeme: &Lexeme) -> Option<&str> {
        let table = match lexeme.category {
            Category::Words => &self.words,
            Category::Separators => &self.separators,
            Category::Identifiers => &self.identifiers,
            Category::Integers | Category::Reals => return None,
        };
        table.get(lexeme.symbol).map(String::as_str)
    }

    /// Looks up a reserved word first, then a separator.
    pub fn find_terminal(&self, text: &str) -> Option<(Category, SymbolId)> {
        if let Some(id) = self.words.find(text) {
            return Some((Category::Words, id));
        }
        self.separators
            .find(text)
            .map(|id| (Category::Separators, id))
    }
}
