//! Content arguments and their resolution
//!
//! Insertion operations accept an element, a list of elements, or a
//! string. Strings are either raw markup (append/prepend only, detected by a
//! `/`) or a selector / creation string handed to the collection
//! constructor.

use microbe_dom::{Document, NodeId};

use crate::microbe::{construct_nodes, Settings};
use crate::{Microbe, MicrobeResult};

/// Content argument of an insertion operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Element(NodeId),
    Elements(Vec<NodeId>),
    Str(String),
}

/// Resolved content nodes; a bare element stays distinguishable from a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nodes {
    Single(NodeId),
    Sequence(Vec<NodeId>),
}

impl Nodes {
    pub fn as_slice(&self) -> &[NodeId] {
        match self {
            Self::Single(id) => std::slice::from_ref(id),
            Self::Sequence(ids) => ids,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// Outcome of resolving content for append/prepend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Raw HTML concatenated into each target's innerHTML
    Markup(String),
    Nodes(Nodes),
}

impl Content {
    /// Whether a string argument is treated as raw markup
    pub fn is_markup(s: &str) -> bool {
        s.contains('/')
    }

    /// Resolve for append/prepend: `/`-containing strings take the markup path
    pub(crate) fn resolve(self, doc: &mut Document, settings: Settings) -> MicrobeResult<Resolved> {
        match self {
            Self::Str(s) if Self::is_markup(&s) => Ok(Resolved::Markup(s)),
            other => other.resolve_nodes(doc, settings).map(Resolved::Nodes),
        }
    }

    /// Resolve to nodes only; every string goes through the constructor
    pub(crate) fn resolve_nodes(self, doc: &mut Document, settings: Settings) -> MicrobeResult<Nodes> {
        match self {
            Self::Element(id) => Ok(Nodes::Single(id)),
            Self::Elements(ids) => Ok(Nodes::Sequence(ids)),
            Self::Str(s) => construct_nodes(doc, &s, settings).map(Nodes::Sequence),
        }
    }
}

impl From<NodeId> for Content {
    fn from(id: NodeId) -> Self {
        Self::Element(id)
    }
}

impl From<Vec<NodeId>> for Content {
    fn from(ids: Vec<NodeId>) -> Self {
        Self::Elements(ids)
    }
}

impl From<&[NodeId]> for Content {
    fn from(ids: &[NodeId]) -> Self {
        Self::Elements(ids.to_vec())
    }
}

impl From<&Microbe> for Content {
    fn from(microbe: &Microbe) -> Self {
        Self::Elements(microbe.nodes().to_vec())
    }
}

impl From<Microbe> for Content {
    fn from(microbe: Microbe) -> Self {
        Self::Elements(microbe.into_vec())
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
