//! Microbe Configuration

use microbe_dom::Document;

use crate::microbe::Settings;

/// Library configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// URL given to documents created through [`Config::document`]
    pub url: String,

    /// Whether collections tear down bound listeners before removal
    pub event_teardown: bool,

    /// Keep whitespace-only text when parsing markup and creation strings
    pub preserve_whitespace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            event_teardown: true,
            preserve_whitespace: true,
        }
    }
}

impl Config {
    /// Create an empty `html > (head, body)` document
    pub fn document(&self) -> Document {
        Document::new(&self.url)
    }

    /// Parse a full HTML page with this configuration's URL
    pub fn parse_document(&self, html: &str) -> microbe_html::HtmlResult<Document> {
        Settings::from(self).parser().parse_with_url(html, &self.url)
    }
}
