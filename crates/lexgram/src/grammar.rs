use std::{collections::HashMap, fmt::Display, ops::Index};

use cranelift_entity::{entity_impl, PrimaryMap};

use crate::{
    config::{GrammarConfig, RuleSpec},
    error::GrammarError,
    table::{Category, Tables},
};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RuleHandle(u32);

entity_impl! { RuleHandle }

impl RuleHandle {
    pub fn name(self, grammar: &Grammar) -> &str {
        &grammar[self].name
    }
}

/// Built-in nonterminals matched by lexeme category instead of by a rule.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Class {
    Number,
    Identifier,
}

impl Class {
    pub fn from_name(name: &str) -> Option<Class> {
        match name {
            "Number" => Some(Class::Number),
            "Identifier" => Some(Class::Identifier),
            _ => None,
        }
    }
    pub fn name(self) -> &'static str {
        match self {
            Class::Number => "Number",
            Class::Identifier => "Identifier",
        }
    }
    pub fn matches(self, category: Category) -> bool {
        match self {
            Class::Number => category.is_number(),
            Class::Identifier => category == Category::Identifiers,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Item {
    Terminal(String),
    Class(Class),
    Rule(RuleHandle),
    /// Zero or more repetitions of a non-empty item sequence.
    Repetition(Vec<Item>),
}

impl Item {
    /// The item that has to match the first lexeme, looking through repetitions.
    pub fn first(&self) -> Option<&Item> {
        match self {
            Item::Repetition(items) => items.first()?.first(),
            item => Some(item),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Variant {
    pub items: Vec<Item>,
    /// Normalized source text, used in diagnostics.
    pub text: String,
}

impl Variant {
    pub fn first(&self) -> Option<&Item> {
        self.items.first()?.first()
    }
    /// A variant consisting of a single literal token only passes it through.
    pub fn is_bare_terminal(&self) -> bool {
        matches!(self.items.as_slice(), [Item::Terminal(_)])
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Rule {
    pub name: String,
    pub variants: Vec<Variant>,
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ::=", self.name)?;
        for (i, variant) in self.variants.iter().enumerate() {
            if i > 0 {
                f.write_str(" |")?;
            }
            write!(f, " {variant}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Grammar {
    rules: PrimaryMap<RuleHandle, Rule>,
    names: HashMap<String, RuleHandle>,
    main: RuleHandle,
}

impl Grammar {
    /// Compiles textual rule definitions, validating every terminal against
    /// the reserved words and separators in `tables`.
    pub fn compile(config: &GrammarConfig, tables: &Tables) -> Result<Grammar, GrammarError> {
        let mut rules = PrimaryMap::new();
        let mut names = HashMap::new();

        // register every rule first so that references may point forward
        for spec in &config.rules {
            let name = spec.non_terminal.trim();
            if names.contains_key(name) {
                return Err(GrammarError::DuplicateRule {
                    rule: name.to_owned(),
                });
            }
            let handle = rules.push(Rule {
                name: name.to_owned(),
                variants: Vec::new(),
            });
            names.insert(name.to_owned(), handle);
        }

        for (handle, spec) in rules.keys().zip(&config.rules).collect::<Vec<_>>() {
            let cx = CompileCx {
                rule: &rules[handle].name,
                names: &names,
                tables,
            };
            let variants = cx.variants(spec)?;
            rules[handle].variants = variants;
        }

        let main_name = config.main_rule.trim();
        let Some(&main) = names.get(main_name) else {
            return Err(GrammarError::MainRuleNotFound {
                name: main_name.to_owned(),
            });
        };

        log::debug!("Compiled {} rules, main rule `{main_name}`", rules.len());
        Ok(Grammar { rules, names, main })
    }

    pub fn main(&self) -> RuleHandle {
        self.main
    }
    pub fn main_rule(&self) -> &Rule {
        &self.rules[self.main]
    }
    pub fn rule(&self, handle: RuleHandle) -> Option<&Rule> {
        self.rules.get(handle)
    }
    pub fn find(&self, name: &str) -> Option<RuleHandle> {
        self.names.get(name).copied()
    }
    pub fn iter(&self) -> cranelift_entity::Iter<'_, RuleHandle, Rule> {
        self.rules.iter()
    }
    pub fn len(&self) -> usize {
        self.rules.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Index<RuleHandle> for Grammar {
    type Output = Rule;

    fn index(&self, handle: RuleHandle) -> &Rule {
        &self.rules[handle]
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (_, rule) in self.rules.iter() {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}

struct CompileCx<'a> {
    rule: &'a str,
    names: &'a HashMap<String, RuleHandle>,
    tables: &'a Tables,
}

impl CompileCx<'_> {
    fn incorrect(&self, reason: &'static str) -> GrammarError {
        GrammarError::IncorrectRule {
            rule: self.rule.to_owned(),
            reason,
        }
    }

    fn variants(&self, spec: &RuleSpec) -> Result<Vec<Variant>, GrammarError> {
        spec.can_be
            .split('|')
            .map(|variant| {
                let tokens = split_tokens(variant);
                if tokens.is_empty() {
                    return Err(self.incorrect("empty variant"));
                }
                Ok(Variant {
                    items: self.items(&tokens)?,
                    text: tokens.join(" "),
                })
            })
            .collect()
    }

    fn items(&self, tokens: &[&str]) -> Result<Vec<Item>, GrammarError> {
        let mut items = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            match token {
                "[" => {
                    let Some(close) = matching_bracket(tokens, i) else {
                        return Err(self.incorrect("unbalanced `[`"));
                    };
                    let inner = &tokens[i + 1..close];
                    if inner.is_empty() {
                        return Err(self.incorrect("empty repetition"));
                    }
                    items.push(Item::Repetition(self.items(inner)?));
                    i = close + 1;
                    continue;
                }
                "]" => return Err(self.incorrect("unbalanced `]`")),
                _ => {}
            }

            let item = match token
                .strip_prefix('{')
                .and_then(|t| t.strip_suffix('}'))
                .filter(|name| !name.is_empty())
            {
                Some(name) => self.non_terminal(name)?,
                None => {
                    if self.tables.find_terminal(token).is_none() {
                        return Err(GrammarError::UnknownTerminal {
                            rule: self.rule.to_owned(),
                            token: token.to_owned(),
                        });
                    }
                    Item::Terminal(token.to_owned())
                }
            };
            items.push(item);
            i += 1;
        }
        Ok(items)
    }

    fn non_terminal(&self, name: &str) -> Result<Item, GrammarError> {
        if let Some(class) = Class::from_name(name) {
            return Ok(Item::Class(class));
        }
        match self.names.get(name) {
            Some(&handle) => Ok(Item::Rule(handle)),
            None => Err(GrammarError::UnknownNonTerminal {
                rule: self.rule.to_owned(),
                name: name.to_owned(),
            }),
        }
    }
}

/// Splits a variant into tokens; brackets always stand alone and `{Name}`
/// references are detached from their neighbours.
fn split_tokens(variant: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for word in variant.split_whitespace() {
        let mut start = 0;
        for (i, c) in word.char_indices() {
            let (cut, next) = match c {
                '[' | ']' => (i, i + 1),
                '{' => (i, i),
                '}' => (i + 1, i + 1),
                _ => continue,
            };
            if cut > start {
                tokens.push(&word[start..cut]);
            }
            if next > cut {
                tokens.push(&word[cut..next]);
            }
            start = next;
        }
        if start < word.len() {
            tokens.push(&word[start..]);
        }
    }
    tokens
}

/// Index of the `]` closing the `[` at `open`.
fn matching_bracket(tokens: &[&str], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &token) in tokens.iter().enumerate().skip(open) {
        match token {
            "[" => depth += 1,
            "]" => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
