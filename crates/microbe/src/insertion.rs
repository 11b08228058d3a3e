//! Insertion engine: append, prepend, insert_after and remove.
//!
//! Replication rule: the first target receives the original content nodes,
//! every later target receives deep clones. The returned collection lists
//! every inserted node, target-major then content-minor, so its length is
//! `targets * content` on the node path.

use microbe_dom::{Document, DomError, DomTree, NodeId, NodeOperations};
use microbe_html::inner_html;

use crate::content::{Content, Resolved};
use crate::{Microbe, MicrobeResult};

/// Where content goes inside each target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Append,
    Prepend,
}

impl Microbe {
    /// Append content as the last children of every target.
    ///
    /// Strings containing `/` are appended to each target's innerHTML and
    /// the original collection is returned; otherwise the inserted nodes
    /// are returned.
    pub fn append(&self, doc: &mut Document, content: impl Into<Content>) -> MicrobeResult<Microbe> {
        self.insert_children(doc, content.into(), Placement::Append)
    }

    /// Insert content before the first element child of every target.
    ///
    /// Same markup rule and return value as [`Microbe::append`].
    pub fn prepend(&self, doc: &mut Document, content: impl Into<Content>) -> MicrobeResult<Microbe> {
        self.insert_children(doc, content.into(), Placement::Prepend)
    }

    /// Insert content directly after every target, as siblings.
    ///
    /// Strings are always selector or creation strings here; there is no
    /// markup branch.
    pub fn insert_after(
        &self,
        doc: &mut Document,
        content: impl Into<Content>,
    ) -> MicrobeResult<Microbe> {
        let content = content.into().resolve_nodes(doc, self.settings())?;
        let content = content.as_slice();
        tracing::debug!(targets = self.len(), content = content.len(), "insert_after");

        let mut inserted = Vec::with_capacity(self.len() * content.len());
        for (i, &target) in self.iter().enumerate() {
            let parent = doc.tree.parent(target).ok_or(DomError::NoParent(target))?;
            let next = doc.tree.next_element_sibling(target);

            for &source in content {
                let node = replicate(&mut doc.tree, source, i)?;
                inserted.push(node);
                doc.tree.insert_before(parent, node, next)?;
            }
        }

        Ok(self.rewrap(inserted))
    }

    /// Detach every target from the tree.
    ///
    /// Collections with the event-teardown capability drop their listeners
    /// first. The same collection is returned; its nodes are now detached.
    pub fn remove(&self, doc: &mut Document) -> MicrobeResult<&Self> {
        if self.has_event_teardown() {
            self.off(doc);
        }
        for &node in self {
            doc.tree.detach(node)?;
        }
        tracing::debug!(removed = self.len(), "remove");
        Ok(self)
    }

    fn insert_children(
        &self,
        doc: &mut Document,
        content: Content,
        placement: Placement,
    ) -> MicrobeResult<Microbe> {
        let content = match content.resolve(doc, self.settings())? {
            Resolved::Markup(markup) => {
                self.insert_markup(doc, &markup, placement)?;
                return Ok(self.clone());
            }
            Resolved::Nodes(nodes) => nodes,
        };
        let content = content.as_slice();
        tracing::debug!(targets = self.len(), content = content.len(), ?placement, "insert nodes");

        let mut inserted = Vec::with_capacity(self.len() * content.len());
        for (i, &target) in self.iter().enumerate() {
            // Captured once so multi-node content keeps its order
            let reference = match placement {
                Placement::Append => None,
                Placement::Prepend => doc.tree.first_element_child(target),
            };

            for &source in content {
                let node = replicate(&mut doc.tree, source, i)?;
                inserted.push(node);
                doc.tree.insert_before(target, node, reference)?;
            }
        }

        Ok(self.rewrap(inserted))
    }

    /// Textual innerHTML concatenation; existing children are re-created
    fn insert_markup(&self, doc: &mut Document, markup: &str, placement: Placement) -> MicrobeResult<()> {
        tracing::debug!(targets = self.len(), ?placement, "insert markup");
        let parser = self.settings().parser();

        for &target in self {
            let current = inner_html(&doc.tree, target);
            let combined = match placement {
                Placement::Prepend => format!("{markup}{current}"),
                Placement::Append => current + markup,
            };

            let replaced = doc.tree.descendants(target);
            parser.set_inner_html(&mut doc.tree, target, &combined)?;
            doc.listeners.off(&replaced);
        }
        Ok(())
    }
}

/// Original node for the first target, a deep clone for every other one
fn replicate(tree: &mut DomTree, source: NodeId, target_index: usize) -> MicrobeResult<NodeId> {
    if target_index == 0 {
        return Ok(source);
    }
    Ok(tree.clone_node(source, true)?)
}
