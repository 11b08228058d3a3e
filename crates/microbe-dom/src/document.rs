//! Document - High-level document API
//!
//! Owns the node arena, the listener registry and the readiness queue.

use std::fmt;

use crate::{DomTree, EventListeners, NodeId};

/// Callback deferred until the document finishes loading
pub type ReadyCallback = Box<dyn FnOnce(&mut Document)>;

/// Document loading state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}

/// HTML Document
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Listeners bound through the wrapper API
    pub listeners: EventListeners,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    ready_state: ReadyState,
    ready_queue: Vec<ReadyCallback>,
}

impl Document {
    /// Create a document with an `html > (head, body)` skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        let root = tree.root();
        tree.link(root, html, None);
        tree.link(html, head, None);
        tree.link(html, body, None);

        Self {
            html_element: html,
            head_element: head,
            body_element: body,
            ..Self::empty(url).with_tree(tree)
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            listeners: EventListeners::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            ready_state: ReadyState::Loading,
            ready_queue: Vec::new(),
        }
    }

    fn with_tree(mut self, tree: DomTree) -> Self {
        self.tree = tree;
        self
    }

    /// Locate `<html>`, `<head>` and `<body>` after the tree was filled in
    pub fn finalize(&mut self) {
        let find = |tree: &DomTree, parent: NodeId, tag: &str| {
            tree.element_children(parent)
                .into_iter()
                .find(|&id| tree.tag_name(id) == Some(tag))
                .unwrap_or(NodeId::NONE)
        };

        self.html_element = find(&self.tree, self.tree.root(), "html");
        if self.html_element.is_valid() {
            self.head_element = find(&self.tree, self.html_element, "head");
            self.body_element = find(&self.tree, self.html_element, "body");
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        self.tree
            .element_children(self.head_element)
            .into_iter()
            .find(|&id| self.tree.tag_name(id) == Some("title"))
            .map(|id| self.tree.text_content(id))
            .unwrap_or_default()
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get `<head>` element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let wanted = self.tree.interner().lookup(id)?;
        self.tree.descendants(self.tree.root()).into_iter().find(|&node| {
            self.tree
                .get(node)
                .and_then(|n| n.as_element())
                .is_some_and(|e| e.id == Some(wanted))
        })
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Run `callback` once the document is complete.
    ///
    /// Runs immediately when already complete; otherwise queued and run in
    /// registration order by [`Document::set_ready_state`].
    pub fn ready(&mut self, callback: impl FnOnce(&mut Document) + 'static) {
        if self.ready_state == ReadyState::Complete {
            callback(self);
            return;
        }
        self.ready_queue.push(Box::new(callback));
    }

    /// Advance the loading state, flushing ready callbacks on completion
    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
        if state != ReadyState::Complete {
            return;
        }

        // Callbacks may register further callbacks; those run immediately
        let queued = std::mem::take(&mut self.ready_queue);
        tracing::debug!(callbacks = queued.len(), "document complete");
        for callback in queued {
            callback(self);
        }
    }

    /// Approximate heap usage in bytes
    pub fn memory_usage(&self) -> usize {
        self.tree.memory_usage() + self.url.capacity()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("nodes", &self.tree.len())
            .field("ready_state", &self.ready_state)
            .field("pending_ready", &self.ready_queue.len())
            .finish()
    }
}
