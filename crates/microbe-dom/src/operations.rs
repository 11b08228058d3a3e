//! DOM Node Operations
//!
//! Core node manipulation: appendChild, insertBefore, removeChild,
//! remove (detach self) and cloneNode.

use crate::{DomTree, Node, NodeData, NodeId};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0:?}")]
    NotFound(NodeId),

    #[error("Hierarchy request error")]
    HierarchyRequest,

    #[error("Invalid node type")]
    InvalidNodeType,

    #[error("Node is not a child")]
    NotAChild,

    #[error("Node {0:?} has no parent")]
    NoParent(NodeId),
}

/// Node operations trait
pub trait NodeOperations {
    /// Append a child node, moving it if it is already attached
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId>;

    /// Insert before a reference node (`None` appends)
    fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId>;

    /// Remove a child node
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId>;

    /// Remove a node from its parent; no-op if it has none
    fn detach(&mut self, node: NodeId) -> DomResult<()>;

    /// Clone a node; `deep` also clones all descendants
    fn clone_node(&mut self, node: NodeId, deep: bool) -> DomResult<NodeId>;
}

impl DomTree {
    /// Checks shared by every insertion path
    fn ensure_pre_insert(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        if !matches!(parent_node.data, NodeData::Element(_) | NodeData::Document) {
            return Err(DomError::HierarchyRequest);
        }
        if matches!(self.node(child)?.data, NodeData::Document) {
            return Err(DomError::InvalidNodeType);
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        Ok(())
    }

    fn clone_subtree(&mut self, source: NodeId) -> DomResult<NodeId> {
        let data = self.node(source)?.data.clone();
        let copy = self.push_node(Node::new(data));
        for child in self.child_ids(source) {
            let child_copy = self.clone_subtree(child)?;
            self.link(copy, child_copy, None);
        }
        Ok(copy)
    }
}

impl NodeOperations for DomTree {
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.ensure_pre_insert(parent, new_child)?;

        let mut reference = ref_child;
        if let Some(r) = reference {
            if self.node(r)?.parent != parent {
                return Err(DomError::NotAChild);
            }
            // Inserting a node before itself keeps it in place
            if r == new_child {
                reference = self.node(new_child)?.next_sibling.get();
            }
        }

        self.unlink(new_child);
        self.link(parent, new_child, reference);
        tracing::trace!(?parent, child = ?new_child, ?reference, "inserted node");
        Ok(new_child)
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.node(parent)?;
        if self.node(child)?.parent != parent {
            return Err(DomError::NotAChild);
        }
        self.unlink(child);
        Ok(child)
    }

    fn detach(&mut self, node: NodeId) -> DomResult<()> {
        match self.node(node)?.parent.get() {
            Some(parent) => self.remove_child(parent, node).map(|_| ()),
            None => Ok(()),
        }
    }

    fn clone_node(&mut self, node: NodeId, deep: bool) -> DomResult<NodeId> {
        if deep {
            return self.clone_subtree(node);
        }
        let data = self.node(node)?.data.clone();
        Ok(self.push_node(Node::new(data)))
    }
}
