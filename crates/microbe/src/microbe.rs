//! Microbe - ordered target collection
//!
//! A `Microbe` is a plain list of node ids into a [`Document`]; it owns no
//! nodes. Every operation takes the document explicitly, and collections
//! produced by an operation inherit the settings of the one they came from.

use std::ops::Index;
use std::rc::Rc;

use microbe_dom::{query_selector_all, DomEvent, Document, HandlerId, NodeId};
use microbe_html::HtmlParser;

use crate::{Config, MicrobeError, MicrobeResult};

/// Per-collection behaviour flags, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Settings {
    /// Collection can detach listeners (`off`) before removal
    pub(crate) event_teardown: bool,
    pub(crate) preserve_whitespace: bool,
}

impl Settings {
    pub(crate) fn parser(self) -> HtmlParser {
        HtmlParser::new().preserve_whitespace(self.preserve_whitespace)
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            event_teardown: config.event_teardown,
            preserve_whitespace: config.preserve_whitespace,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Ordered collection of target nodes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Microbe {
    nodes: Vec<NodeId>,
    settings: Settings,
}

impl Microbe {
    /// Wrap node ids with the default configuration
    pub fn wrap(nodes: Vec<NodeId>) -> Self {
        Self {
            nodes,
            settings: Settings::default(),
        }
    }

    /// Wrap node ids with an explicit configuration
    pub fn with_config(nodes: Vec<NodeId>, config: &Config) -> Self {
        Self {
            nodes,
            settings: Settings::from(config),
        }
    }

    /// Build a collection from a selector or an element creation string.
    ///
    /// Strings starting with `<` (after trimming) create new detached
    /// elements; anything else is matched against the whole document.
    pub fn construct(doc: &mut Document, input: &str) -> MicrobeResult<Self> {
        Self::construct_with(doc, input, &Config::default())
    }

    /// [`Microbe::construct`] with an explicit configuration
    pub fn construct_with(doc: &mut Document, input: &str, config: &Config) -> MicrobeResult<Self> {
        let settings = Settings::from(config);
        let nodes = construct_nodes(doc, input, settings)?;
        Ok(Self { nodes, settings })
    }

    /// Wrap `nodes` with this collection's settings
    pub(crate) fn rewrap(&self, nodes: Vec<NodeId>) -> Self {
        Self {
            nodes,
            settings: self.settings,
        }
    }

    pub(crate) fn settings(&self) -> Settings {
        self.settings
    }

    /// Drop the event-teardown capability for this collection
    pub fn without_event_teardown(mut self) -> Self {
        self.settings.event_teardown = false;
        self
    }

    pub fn has_event_teardown(&self) -> bool {
        self.settings.event_teardown
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.get(0)
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeId> {
        self.nodes.iter()
    }

    pub fn into_vec(self) -> Vec<NodeId> {
        self.nodes
    }

    /// Bind `handler` to `event_type` on every node
    pub fn on(
        &self,
        doc: &mut Document,
        event_type: &str,
        handler: impl Fn(&DomEvent) + 'static,
    ) -> Vec<HandlerId> {
        let handler: microbe_dom::EventHandler = Rc::new(handler);
        self.nodes
            .iter()
            .map(|&node| doc.listeners.on(node, event_type, Rc::clone(&handler)))
            .collect()
    }

    /// Detach every listener bound to the nodes of this collection
    pub fn off(&self, doc: &mut Document) -> usize {
        doc.listeners.off(&self.nodes)
    }

    /// Run `callback` once the document has finished loading
    pub fn ready(doc: &mut Document, callback: impl FnOnce(&mut Document) + 'static) {
        doc.ready(callback);
    }
}

pub(crate) fn construct_nodes(
    doc: &mut Document,
    input: &str,
    settings: Settings,
) -> MicrobeResult<Vec<NodeId>> {
    if input.trim_start().starts_with('<') {
        let created = settings.parser().parse_fragment(doc.tree_mut(), input)?;
        let elements: Vec<NodeId> = created
            .into_iter()
            .filter(|&id| doc.tree().is_element(id))
            .collect();
        tracing::debug!(created = elements.len(), "constructed elements from markup");
        return Ok(elements);
    }

    let root = doc.tree().root();
    query_selector_all(doc.tree(), root, input).map_err(|source| {
        tracing::warn!(selector = input, error = %source, "selector rejected");
        MicrobeError::Selector {
            selector: input.to_string(),
            source,
        }
    })
}

impl Index<usize> for Microbe {
    type Output = NodeId;

    fn index(&self, index: usize) -> &NodeId {
        &self.nodes[index]
    }
}

impl<'a> IntoIterator for &'a Microbe {
    type Item = &'a NodeId;
    type IntoIter = std::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl From<Vec<NodeId>> for Microbe {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::wrap(nodes)
    }
}

impl FromIterator<NodeId> for Microbe {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self::wrap(iter.into_iter().collect())
    }
}
