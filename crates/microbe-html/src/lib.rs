//! Microbe HTML
//!
//! HTML5 parsing built on html5ever, converted into the arena DOM, plus the
//! innerHTML/outerHTML serializer the markup insertion path relies on.

mod fragment;
mod parser;
mod serializer;

pub use fragment::set_inner_html;
pub use microbe_dom::{Document, DomTree, Node, NodeId};
pub use parser::HtmlParser;
pub use serializer::{inner_html, outer_html, HtmlSerializer};

/// Result type for parsing and markup mutation
pub type HtmlResult<T> = Result<T, HtmlError>;

/// HTML layer errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("DOM error while building tree: {0}")]
    Dom(#[from] microbe_dom::DomError),
}

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> HtmlResult<Document> {
    HtmlParser::new().parse(html)
}

/// Parse an HTML string with a base URL
pub fn parse_with_url(html: &str, url: &str) -> HtmlResult<Document> {
    HtmlParser::new().parse_with_url(html, url)
}

/// Parse a fragment into detached nodes, preserving whitespace text
pub fn parse_fragment(tree: &mut DomTree, markup: &str) -> HtmlResult<Vec<NodeId>> {
    HtmlParser::new().preserve_whitespace(true).parse_fragment(tree, markup)
}
