//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: removing a node only unlinks it, so a detached
//! node keeps its id and can be re-inserted later.

use crate::{
    DomError, DomResult, InternedString, Node, NodeData, NodeId, QualName, StringInterner,
};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    pub(crate) nodes: Vec<Node>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            interner: StringInterner::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub(crate) fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    /// Number of nodes ever allocated (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut StringInterner {
        &mut self.interner
    }

    /// Resolve an interned string
    #[inline]
    pub fn resolve(&self, s: InternedString) -> &str {
        self.interner.get(s)
    }

    /// Allocate an unlinked node
    pub fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let local = self.interner.intern(&tag.to_ascii_lowercase());
        self.push_node(Node::element(QualName::local(local)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(Node::text(text.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push_node(Node::new(NodeData::Comment(text.to_string())))
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        let elem = self.get(id)?.as_element()?;
        Some(self.resolve(elem.name.local))
    }

    /// Whether `id` is an element node
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Set an attribute, keeping the id/class caches current
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let local = self.interner.intern(name);
        let cached_id = (name == "id").then(|| self.interner.intern(value));
        let classes: Option<Vec<InternedString>> = (name == "class").then(|| {
            value
                .split_whitespace()
                .map(|c| self.interner.intern(c))
                .collect()
        });

        let elem = self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)?;
        elem.set_attr(QualName::local(local), value.to_string());
        if let Some(cached) = cached_id {
            elem.id = Some(cached);
        }
        if let Some(classes) = classes {
            elem.classes = classes;
        }
        Ok(())
    }

    /// Get an attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let local = self.interner.lookup(name)?;
        self.get(id)?.as_element()?.get_attr(local)
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.get()
    }

    /// Iterate over all children of a node (any node type)
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        let first = self.get(parent).map_or(NodeId::NONE, |n| n.first_child);
        ChildIter { tree: self, current: first }
    }

    /// Ids of all children
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).map(|(id, _)| id).collect()
    }

    /// Element children only (the DOM `children` collection)
    pub fn element_children(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent)
            .filter(|(_, node)| node.is_element())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn first_element_child(&self, parent: NodeId) -> Option<NodeId> {
        self.children(parent)
            .find(|(_, node)| node.is_element())
            .map(|(id, _)| id)
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.get(id)?.next_sibling;
        while let Some(next) = current.get() {
            let node = self.get(next)?;
            if node.is_element() {
                return Some(next);
            }
            current = node.next_sibling;
        }
        None
    }

    /// All descendants of `id` in document (pre-)order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_ids(id).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.child_ids(next).into_iter().rev());
        }
        out
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            out.push_str(text);
        }
        for child in self.descendants(id) {
            if let Some(text) = self.get(child).and_then(Node::as_text) {
                out.push_str(text);
            }
        }
        out
    }

    /// Link `child` under `parent`, before `reference` (or last when `None`).
    /// `child` must already be unlinked.
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let (prev, next) = match reference {
            Some(r) => (self.nodes[r.index()].prev_sibling, r),
            None => (self.nodes[parent.index()].last_child, NodeId::NONE),
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }

        match prev.get() {
            Some(p) => self.nodes[p.index()].next_sibling = child,
            None => self.nodes[parent.index()].first_child = child,
        }
        match next.get() {
            Some(n) => self.nodes[n.index()].prev_sibling = child,
            None => self.nodes[parent.index()].last_child = child,
        }
    }

    /// Unlink `child` from its parent and siblings. No-op when detached.
    pub(crate) fn unlink(&mut self, child: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[child.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        let Some(parent) = parent.get() else {
            return;
        };

        match prev.get() {
            Some(p) => self.nodes[p.index()].next_sibling = next,
            None => self.nodes[parent.index()].first_child = next,
        }
        match next.get() {
            Some(n) => self.nodes[n.index()].prev_sibling = prev,
            None => self.nodes[parent.index()].last_child = prev,
        }

        let node = &mut self.nodes[child.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Approximate heap usage in bytes
    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node>() + self.interner.memory_usage()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct ChildIter<'a> {
    tree: &'a DomTree,
    current: NodeId,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current.get()?;
        let node = self.tree.get(id)?;
        self.current = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_has_document_root() {
        let tree = DomTree::new();
        assert_eq!(tree.len(), 1);
        assert!(matches!(tree.get(tree.root()).unwrap().data, NodeData::Document));
    }

    #[test]
    fn test_link_and_unlink_keep_siblings_consistent() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("i");
        tree.link(div, a, None);
        tree.link(div, c, None);
        tree.link(div, b, Some(c));
        assert_eq!(tree.child_ids(div), vec![a, b, c]);

        tree.unlink(b);
        assert_eq!(tree.child_ids(div), vec![a, c]);
        assert_eq!(tree.get(a).unwrap().next_sibling, c);
        assert_eq!(tree.get(c).unwrap().prev_sibling, a);
        assert_eq!(tree.parent(b), None);

        tree.unlink(a);
        tree.unlink(c);
        assert!(tree.child_ids(div).is_empty());
        assert!(!tree.get(div).unwrap().last_child.is_valid());
    }

    #[test]
    fn test_element_navigation_skips_text() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let text = tree.create_text("lead");
        let a = tree.create_element("a");
        let gap = tree.create_text(" ");
        let b = tree.create_element("b");
        for child in [text, a, gap, b] {
            tree.link(div, child, None);
        }

        assert_eq!(tree.first_element_child(div), Some(a));
        assert_eq!(tree.next_element_sibling(a), Some(b));
        assert_eq!(tree.next_element_sibling(b), None);
        assert_eq!(tree.element_children(div), vec![a, b]);
    }

    #[test]
    fn test_set_attribute_updates_caches() {
        let mut tree = DomTree::new();
        let div = tree.create_element("DIV");
        tree.set_attribute(div, "class", "card  active").unwrap();
        tree.set_attribute(div, "id", "main").unwrap();

        assert_eq!(tree.tag_name(div), Some("div"));
        let elem = tree.get(div).unwrap().as_element().unwrap();
        assert_eq!(elem.classes.len(), 2);
        assert_eq!(elem.id.map(|id| tree.resolve(id)), Some("main"));
        assert_eq!(tree.get_attribute(div, "class"), Some("card  active"));
    }

    #[test]
    fn test_set_attribute_on_text_fails() {
        let mut tree = DomTree::new();
        let text = tree.create_text("x");
        assert_eq!(tree.set_attribute(text, "id", "a"), Err(DomError::InvalidNodeType));
    }
}
