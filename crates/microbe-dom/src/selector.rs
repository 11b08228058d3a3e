//! Selector matching
//!
//! Small selector engine backing collection construction from strings:
//! selector lists (`a, b`), the descendant combinator, and compound
//! selectors built from tag, `*`, `#id`, `.class`, `[attr]` and
//! `[attr=value]`.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::{DomTree, NodeId};

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Unsupported combinator {0:?}")]
    UnsupportedCombinator(char),

    #[error("Unterminated attribute selector")]
    UnterminatedAttribute,
}

/// A single simple selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
}

impl SimpleSelector {
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(elem) = tree.get(id).and_then(|n| n.as_element()) else {
            return false;
        };
        match self {
            Self::Universal => true,
            Self::Tag(tag) => tree.resolve(elem.name.local).eq_ignore_ascii_case(tag),
            Self::Id(want) => elem.id.is_some_and(|v| tree.resolve(v) == want),
            Self::Class(class) => elem.classes.iter().any(|&c| tree.resolve(c) == class),
            Self::Attribute { name, value } => match (tree.get_attribute(id, name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
        }
    }
}

/// Compound selector: every part must match the same element
type Compound = Vec<SimpleSelector>;

/// Parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Each alternative is a chain of compounds joined by descendant
    /// combinators, left to right.
    alternatives: Vec<Vec<Compound>>,
}

impl Selector {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        for part in input.split(',') {
            alternatives.push(parse_complex(part)?);
        }
        Ok(Self { alternatives })
    }

    /// Whether element `id` matches any alternative
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|chain| matches_chain(tree, id, chain))
    }
}

/// All elements under `scope` matching `selector`, in document order
pub fn query_selector_all(
    tree: &DomTree,
    scope: NodeId,
    selector: &str,
) -> Result<Vec<NodeId>, SelectorError> {
    let selector = Selector::parse(selector)?;
    Ok(tree
        .descendants(scope)
        .into_iter()
        .filter(|&id| tree.is_element(id) && selector.matches(tree, id))
        .collect())
}

fn matches_chain(tree: &DomTree, id: NodeId, chain: &[Compound]) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    if !last.iter().all(|s| s.matches(tree, id)) {
        return false;
    }

    // Descendant-only chains can be matched greedily from the right
    let mut current = tree.parent(id);
    for compound in ancestors.iter().rev() {
        loop {
            let Some(ancestor) = current else {
                return false;
            };
            current = tree.parent(ancestor);
            if compound.iter().all(|s| s.matches(tree, ancestor)) {
                break;
            }
        }
    }
    true
}

fn parse_complex(input: &str) -> Result<Vec<Compound>, SelectorError> {
    let mut chars = input.char_indices().peekable();
    let mut chain = Vec::new();

    loop {
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        let Some(&(offset, ch)) = chars.peek() else {
            break;
        };
        if matches!(ch, '>' | '+' | '~') {
            return Err(SelectorError::UnsupportedCombinator(ch));
        }
        let compound = parse_compound(&mut chars)?;
        if compound.is_empty() {
            return Err(SelectorError::UnexpectedChar { ch, offset });
        }
        chain.push(compound);
    }

    if chain.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(chain)
}

fn parse_compound(chars: &mut Peekable<CharIndices<'_>>) -> Result<Compound, SelectorError> {
    let mut compound = Vec::new();

    while let Some(&(offset, ch)) = chars.peek() {
        match ch {
            '*' => {
                chars.next();
                compound.push(SimpleSelector::Universal);
            }
            '#' | '.' => {
                chars.next();
                let name = read_ident(chars);
                if name.is_empty() {
                    return Err(SelectorError::UnexpectedChar { ch, offset });
                }
                compound.push(if ch == '#' {
                    SimpleSelector::Id(name)
                } else {
                    SimpleSelector::Class(name)
                });
            }
            '[' => {
                chars.next();
                compound.push(parse_attribute(chars)?);
            }
            c if is_ident_char(c) => {
                compound.push(SimpleSelector::Tag(read_ident(chars).to_ascii_lowercase()));
            }
            c if c.is_whitespace() => break,
            _ => return Err(SelectorError::UnexpectedChar { ch, offset }),
        }
    }

    Ok(compound)
}

fn parse_attribute(chars: &mut Peekable<CharIndices<'_>>) -> Result<SimpleSelector, SelectorError> {
    while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    let name = read_ident(chars);
    if name.is_empty() {
        return Err(SelectorError::UnterminatedAttribute);
    }
    while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

    let value = match chars.next() {
        Some((_, ']')) => return Ok(SimpleSelector::Attribute { name, value: None }),
        Some((_, '=')) => read_attribute_value(chars)?,
        Some((offset, ch)) => return Err(SelectorError::UnexpectedChar { ch, offset }),
        None => return Err(SelectorError::UnterminatedAttribute),
    };

    while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    match chars.next() {
        Some((_, ']')) => Ok(SimpleSelector::Attribute { name, value: Some(value) }),
        Some((offset, ch)) => Err(SelectorError::UnexpectedChar { ch, offset }),
        None => Err(SelectorError::UnterminatedAttribute),
    }
}

fn read_attribute_value(chars: &mut Peekable<CharIndices<'_>>) -> Result<String, SelectorError> {
    while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    let quote = chars.next_if(|(_, c)| *c == '"' || *c == '\'').map(|(_, c)| c);
    let Some(quote) = quote else {
        return Ok(read_ident(chars));
    };

    let mut value = String::new();
    for (_, c) in chars.by_ref() {
        if c == quote {
            return Ok(value);
        }
        value.push(c);
    }
    Err(SelectorError::UnterminatedAttribute)
}

fn read_ident(chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut ident = String::new();
    while let Some((_, c)) = chars.next_if(|(_, c)| is_ident_char(*c)) {
        ident.push(c);
    }
    ident
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}
