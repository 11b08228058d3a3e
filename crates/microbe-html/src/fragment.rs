//! innerHTML assignment
//!
//! Replacing an element's markup detaches every existing child (their ids
//! stay valid but are no longer in the tree) and appends freshly parsed
//! nodes in their place.

use microbe_dom::{DomTree, NodeId, NodeOperations};

use crate::{HtmlParser, HtmlResult};

impl HtmlParser {
    /// Replace the children of `node` with the parsed `markup`.
    ///
    /// Returns the new top-level child ids.
    pub fn set_inner_html(
        &self,
        tree: &mut DomTree,
        node: NodeId,
        markup: &str,
    ) -> HtmlResult<Vec<NodeId>> {
        // Parsed against `node` itself, so table and list content keeps its shape
        let fragment = self.parse_fragment_for(tree, node, markup)?;

        for child in tree.child_ids(node) {
            tree.remove_child(node, child)?;
        }

        for &child in &fragment {
            tree.append_child(node, child)?;
        }
        Ok(fragment)
    }
}

/// Replace the children of `node` with `markup`, keeping whitespace text
pub fn set_inner_html(tree: &mut DomTree, node: NodeId, markup: &str) -> HtmlResult<Vec<NodeId>> {
    HtmlParser::new()
        .preserve_whitespace(true)
        .set_inner_html(tree, node, markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inner_html;

    #[test]
    fn test_set_inner_html_replaces_children() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let old = tree.create_element("p");
        tree.append_child(div, old).unwrap();

        let fresh = set_inner_html(&mut tree, div, "<em>new</em> text").unwrap();

        assert_eq!(fresh.len(), 2);
        assert_eq!(tree.parent(old), None);
        assert_eq!(inner_html(&tree, div), "<em>new</em> text");
    }

    #[test]
    fn test_set_inner_html_on_text_node() {
        let mut tree = DomTree::new();
        let text = tree.create_text("x");
        assert!(set_inner_html(&mut tree, text, "<b></b>").is_err());
    }

    #[test]
    fn test_set_inner_html_in_table_section() {
        let mut tree = DomTree::new();
        let tbody = tree.create_element("tbody");

        set_inner_html(&mut tree, tbody, "<tr><td>a</td></tr><tr><td>b</td></tr>").unwrap();

        assert_eq!(tree.element_children(tbody).len(), 2);
        assert_eq!(inner_html(&tree, tbody), "<tr><td>a</td></tr><tr><td>b</td></tr>");
    }
}
