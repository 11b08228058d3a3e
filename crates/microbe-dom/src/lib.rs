//! Microbe DOM - Document Object Model
//!
//! Arena-backed DOM tree used by the Microbe insertion engine. Nodes are
//! addressed by [`NodeId`] and linked through parent/child/sibling ids, so
//! moving or cloning a node never invalidates other handles.

mod document;
mod events;
mod interner;
mod node;
mod operations;
mod selector;
mod tree;

pub use document::{Document, ReadyCallback, ReadyState};
pub use events::{DomEvent, EventHandler, EventListeners, HandlerId};
pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Node, NodeData, QualName, TextData};
pub use operations::{DomError, DomResult, NodeOperations};
pub use selector::{query_selector_all, Selector, SelectorError, SimpleSelector};
pub use tree::{ChildIter, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this id points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Convert a sentinel-encoded link into an `Option`
    #[inline]
    pub fn get(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}
