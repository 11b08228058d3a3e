//! HTML5 Parser implementation
//!
//! Parses with html5ever into its RcDom and converts the result into the
//! arena tree. Fragments go through the HTML fragment algorithm with a
//! context element, the same way an innerHTML assignment does, and come
//! back as detached top-level nodes.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment as parse_html_fragment};
use html5ever::{LocalName, Namespace, QualName as HtmlName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use microbe_dom::{Document, DomError, DomTree, Node, NodeData, NodeId, NodeOperations, QualName};

use crate::HtmlResult;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// HTML5 parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    preserve_whitespace: bool,
}

impl HtmlParser {
    /// Create a parser that drops whitespace-only text nodes
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep whitespace-only text nodes (needed for faithful innerHTML)
    pub fn preserve_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = preserve;
        self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> HtmlResult<Document> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> HtmlResult<Document> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty(url);
        let root = document.tree().root();
        for child in dom.document.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, document.tree_mut())? {
                document.tree_mut().append_child(root, id)?;
            }
        }
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse `markup` in `<body>` context into detached nodes owned by `tree`
    pub fn parse_fragment(&self, tree: &mut DomTree, markup: &str) -> HtmlResult<Vec<NodeId>> {
        let context = HtmlName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
        self.parse_in_context(tree, context, markup)
    }

    /// Parse `markup` as the content of the element `context`.
    ///
    /// Table sections, rows and other context-sensitive markup survive
    /// only when parsed against the element they will live in.
    pub fn parse_fragment_for(
        &self,
        tree: &mut DomTree,
        context: NodeId,
        markup: &str,
    ) -> HtmlResult<Vec<NodeId>> {
        let elem = tree
            .get(context)
            .ok_or(DomError::NotFound(context))?
            .as_element()
            .ok_or(DomError::InvalidNodeType)?;
        let ns = match tree.resolve(elem.name.ns) {
            "" => HTML_NAMESPACE,
            ns => ns,
        };
        let name = HtmlName::new(
            None,
            Namespace::from(ns),
            LocalName::from(tree.resolve(elem.name.local)),
        );
        self.parse_in_context(tree, name, markup)
    }

    fn parse_in_context(
        &self,
        tree: &mut DomTree,
        context: HtmlName,
        markup: &str,
    ) -> HtmlResult<Vec<NodeId>> {
        tracing::trace!(context = &*context.local, "parsing fragment");
        let dom = parse_html_fragment(RcDom::default(), Default::default(), context, Vec::new(), false)
            .one(markup);

        let mut nodes = Vec::new();
        let document_children = dom.document.children.borrow();
        // Fragment content hangs off a synthetic <html> root
        let Some(root) = document_children.iter().find(|h| is_element(h, "html")) else {
            return Ok(nodes);
        };

        for child in root.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, tree)? {
                nodes.push(id);
            }
        }

        tracing::trace!(top_level = nodes.len(), "parsed fragment");
        Ok(nodes)
    }

    /// Convert an RcDom node (and its subtree) into a detached arena node
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree) -> HtmlResult<Option<NodeId>> {
        let id = match &handle.data {
            RcNodeData::Doctype { name, public_id, system_id } => {
                let name = tree.interner_mut().intern(name);
                tree.push_node(Node::new(NodeData::Doctype {
                    name,
                    public_id: public_id.to_string(),
                    system_id: system_id.to_string(),
                }))
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if !self.preserve_whitespace && text.trim().is_empty() {
                    return Ok(None);
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let ns = tree.interner_mut().intern(&name.ns);
                let local = tree.interner_mut().intern(&name.local);
                let id = tree.push_node(Node::element(QualName::new(ns, local)));

                for attr in attrs.borrow().iter() {
                    tree.set_attribute(id, &attr.name.local, &attr.value)?;
                }

                for child in handle.children.borrow().iter() {
                    if let Some(child_id) = self.convert_node(child, tree)? {
                        tree.append_child(id, child_id)?;
                    }
                }
                id
            }
            // Documents are unwrapped by the callers; PIs are not kept
            RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return Ok(None),
        };
        Ok(Some(id))
    }
}

fn is_element(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, RcNodeData::Element { name, .. } if &*name.local == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert_eq!(doc.title(), "Test");
        assert_eq!(doc.tree().element_children(doc.body()).len(), 1);
    }

    #[test]
    fn test_parse_fragment_returns_detached_nodes() {
        let mut tree = DomTree::new();
        let nodes = HtmlParser::new()
            .parse_fragment(&mut tree, "<span>a</span><b>b</b>")
            .unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(tree.tag_name(nodes[0]), Some("span"));
        assert_eq!(tree.tag_name(nodes[1]), Some("b"));
        assert!(nodes.iter().all(|&n| tree.parent(n).is_none()));
    }

    #[test]
    fn test_fragment_whitespace_policy() {
        let mut tree = DomTree::new();
        let markup = "<i>x</i> <i>y</i>";

        let dropped = HtmlParser::new().parse_fragment(&mut tree, markup).unwrap();
        assert_eq!(dropped.len(), 2);

        let kept = HtmlParser::new()
            .preserve_whitespace(true)
            .parse_fragment(&mut tree, markup)
            .unwrap();
        assert_eq!(kept.len(), 3);
        assert_eq!(tree.get(kept[1]).and_then(|n| n.as_text()), Some(" "));
    }

    #[test]
    fn test_attributes_populate_caches() {
        let mut tree = DomTree::new();
        let nodes = HtmlParser::new()
            .parse_fragment(&mut tree, r#"<div id="main" class="a b"></div>"#)
            .unwrap();

        let elem = tree.get(nodes[0]).and_then(|n| n.as_element()).unwrap();
        assert_eq!(elem.classes.len(), 2);
        assert_eq!(tree.get_attribute(nodes[0], "id"), Some("main"));
    }

    #[test]
    fn test_fragment_keeps_leading_whitespace() {
        let mut tree = DomTree::new();
        let nodes = HtmlParser::new()
            .preserve_whitespace(true)
            .parse_fragment(&mut tree, "\n  <p></p>")
            .unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(tree.get(nodes[0]).and_then(|n| n.as_text()), Some("\n  "));
    }

    #[test]
    fn test_fragment_for_table_context() {
        let mut tree = DomTree::new();
        let table = tree.create_element("table");
        let parser = HtmlParser::new();

        let in_body = parser.parse_fragment(&mut tree, "<tr><td>a</td></tr>").unwrap();
        assert!(in_body.iter().all(|&n| !tree.is_element(n)));

        let in_table = parser
            .parse_fragment_for(&mut tree, table, "<tr><td>a</td></tr>")
            .unwrap();
        assert_eq!(in_table.len(), 1);
        assert_eq!(tree.tag_name(in_table[0]), Some("tbody"));
    }

    #[test]
    fn test_fragment_for_requires_element() {
        let mut tree = DomTree::new();
        let text = tree.create_text("x");
        assert!(HtmlParser::new().parse_fragment_for(&mut tree, text, "<b></b>").is_err());
    }
}
